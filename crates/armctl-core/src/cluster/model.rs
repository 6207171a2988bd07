//! Service fabric cluster documents

use crate::mutation::NamedChild;
use crate::operation::{OperationTracking, Tracked};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Durability tier of a node type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DurabilityLevel {
    #[default]
    Bronze,
    Silver,
    Gold,
}

impl FromStr for DurabilityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bronze" => Ok(DurabilityLevel::Bronze),
            "silver" => Ok(DurabilityLevel::Silver),
            "gold" => Ok(DurabilityLevel::Gold),
            _ => Err(format!("unknown durability level '{}'", s)),
        }
    }
}

/// A node type of a cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeType {
    pub name: String,
    #[serde(default)]
    pub is_primary: bool,
    pub vm_instance_count: u32,
    #[serde(default)]
    pub durability_level: DurabilityLevel,
    #[serde(default = "default_client_port")]
    pub client_connection_endpoint_port: u16,
    #[serde(default = "default_http_gateway_port")]
    pub http_gateway_endpoint_port: u16,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_client_port() -> u16 {
    19000
}

fn default_http_gateway_port() -> u16 {
    19080
}

impl NodeType {
    pub fn new(name: impl Into<String>, vm_instance_count: u32) -> Self {
        Self {
            name: name.into(),
            is_primary: false,
            vm_instance_count,
            durability_level: DurabilityLevel::default(),
            client_connection_endpoint_port: default_client_port(),
            http_gateway_endpoint_port: default_http_gateway_port(),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    #[must_use]
    pub fn with_durability(mut self, durability_level: DurabilityLevel) -> Self {
        self.durability_level = durability_level;
        self
    }
}

impl NamedChild for NodeType {
    const KIND: &'static str = "NodeType";

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterProperties {
    #[serde(default)]
    pub node_types: Vec<NodeType>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Cluster resource; unmanaged properties are carried through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: ClusterProperties,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cluster {
    pub fn node_types(&self) -> &[NodeType] {
        &self.properties.node_types
    }
}

/// Result of a node type change: the cluster as submitted plus its status
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterUpdate {
    pub cluster: Cluster,
    #[serde(flatten)]
    pub tracking: OperationTracking,
}

impl Tracked for ClusterUpdate {
    fn tracking(&self) -> &OperationTracking {
        &self.tracking
    }

    fn tracking_mut(&mut self) -> &mut OperationTracking {
        &mut self.tracking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cluster_document_round_trip_keeps_unknown_fields() {
        let doc = json!({
            "name": "sf1",
            "location": "westus",
            "properties": {
                "reliabilityLevel": "Silver",
                "nodeTypes": [
                    {"name": "nt1", "isPrimary": true, "vmInstanceCount": 5,
                     "durabilityLevel": "Silver", "applicationPorts": {"startPort": 20000}}
                ]
            }
        });

        let cluster: Cluster = serde_json::from_value(doc).unwrap();
        let node = &cluster.node_types()[0];
        assert!(node.is_primary);
        assert_eq!(node.durability_level, DurabilityLevel::Silver);
        assert_eq!(node.client_connection_endpoint_port, 19000);

        let written = serde_json::to_value(&cluster).unwrap();
        assert_eq!(written["location"], "westus");
        assert_eq!(written["properties"]["reliabilityLevel"], "Silver");
        assert_eq!(
            written["properties"]["nodeTypes"][0]["applicationPorts"]["startPort"],
            20000
        );
    }
}
