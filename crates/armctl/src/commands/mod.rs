//! Command implementations

pub mod async_utils;
pub mod cluster;
pub mod gateway;
pub mod peer_asn;
pub mod profile;
pub mod sql;
