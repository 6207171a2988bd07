//! Service fabric cluster node types

pub mod adapter;
pub mod communicator;
pub mod model;

pub use adapter::ClusterAdapter;
pub use communicator::{ClusterCommunicator, HttpClusterCommunicator};
pub use model::{Cluster, ClusterProperties, ClusterUpdate, DurabilityLevel, NodeType};
