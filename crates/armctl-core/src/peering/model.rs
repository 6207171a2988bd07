//! Peer ASN resource and its flat user-facing form

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PeerAsnProperties {
    #[serde(default)]
    pub peer_asn: Option<u32>,
    #[serde(default)]
    pub peer_contact_detail: Vec<ContactDetail>,
    #[serde(default)]
    pub peer_name: Option<String>,
    #[serde(default)]
    pub validation_state: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Peer ASN as returned by the service
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PeerAsnResource {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: PeerAsnProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PeerAsnList {
    #[serde(default)]
    pub value: Vec<PeerAsnResource>,
    #[serde(default)]
    pub next_link: Option<String>,
}

/// Peer ASN with its properties lifted to the top level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerAsn {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_asn: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_state: Option<String>,
    pub peer_contact_detail: Vec<ContactDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<PeerAsnResource> for PeerAsn {
    fn from(resource: PeerAsnResource) -> Self {
        let properties = resource.properties;
        Self {
            name: resource.name,
            id: resource.id,
            peer_asn: properties.peer_asn,
            peer_name: properties.peer_name,
            validation_state: properties.validation_state,
            peer_contact_detail: properties.peer_contact_detail,
            error_message: properties.error_message,
        }
    }
}
