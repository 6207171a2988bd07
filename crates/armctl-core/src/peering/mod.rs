//! Peer ASN lookups

pub mod adapter;
pub mod model;

pub use adapter::{HttpPeeringCommunicator, PeerAsnAdapter, PeeringCommunicator};
pub use model::{ContactDetail, PeerAsn};
