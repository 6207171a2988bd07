//! Get and list peer ASNs of a subscription

use super::model::{PeerAsn, PeerAsnList, PeerAsnResource};
use crate::context::OperationContext;
use crate::envelope::normalize_error;
use crate::error::{CoreError, Result};
use crate::transport::{RawResponse, RestClient};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use url::Url;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PeeringCommunicator: Send + Sync {
    async fn get(&self, name: &str) -> Result<RawResponse>;

    /// First page when `next_link` is `None`, otherwise the given page
    async fn list(&self, next_link: Option<String>) -> Result<RawResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpPeeringCommunicator {
    client: RestClient,
    subscription_id: String,
    api_version: String,
}

impl HttpPeeringCommunicator {
    pub fn new(
        client: RestClient,
        subscription_id: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            client,
            subscription_id: subscription_id.into(),
            api_version: api_version.into(),
        }
    }

    fn peer_asns_url(&self, name: Option<&str>) -> Result<Url> {
        let mut segments = vec![
            "subscriptions",
            self.subscription_id.as_str(),
            "providers",
            "Microsoft.Peering",
            "peerAsns",
        ];
        segments.extend(name);
        self.client.resource_url(&segments, &self.api_version)
    }
}

#[async_trait]
impl PeeringCommunicator for HttpPeeringCommunicator {
    async fn get(&self, name: &str) -> Result<RawResponse> {
        let url = self.peer_asns_url(Some(name))?;
        self.client.get(url).await
    }

    async fn list(&self, next_link: Option<String>) -> Result<RawResponse> {
        let url = match next_link {
            Some(link) => Url::parse(&link)
                .map_err(|e| CoreError::Decode(format!("invalid nextLink '{}': {}", link, e)))?,
            None => self.peer_asns_url(None)?,
        };
        self.client.get(url).await
    }
}

pub struct PeerAsnAdapter<C = HttpPeeringCommunicator> {
    communicator: C,
}

impl PeerAsnAdapter<HttpPeeringCommunicator> {
    pub fn new(context: Arc<OperationContext>) -> Result<Self> {
        Ok(Self {
            communicator: HttpPeeringCommunicator::new(
                context.rest_client()?,
                context.subscription_id.clone(),
                context.api_versions.peering.clone(),
            ),
        })
    }
}

impl<C: PeeringCommunicator> PeerAsnAdapter<C> {
    pub fn with_communicator(communicator: C) -> Self {
        Self { communicator }
    }

    pub async fn get(&self, name: &str) -> Result<PeerAsn> {
        let response = self
            .communicator
            .get(name)
            .await
            .map_err(normalize_error)?;
        let resource: PeerAsnResource = response.json()?;
        Ok(resource.into())
    }

    /// Every peer ASN of the subscription, following `nextLink` pages
    pub async fn list_by_subscription(&self) -> Result<Vec<PeerAsn>> {
        let mut peer_asns = Vec::new();
        let mut next_link = None;

        loop {
            let response = self
                .communicator
                .list(next_link.take())
                .await
                .map_err(normalize_error)?;
            let page: PeerAsnList = response.json()?;
            debug!("Fetched {} peer ASNs", page.value.len());
            peer_asns.extend(page.value.into_iter().map(PeerAsn::from));

            match page.next_link {
                Some(link) if !link.is_empty() => next_link = Some(link),
                _ => break,
            }
        }

        Ok(peer_asns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PEER_ASNS: &str = "/subscriptions/sub-1/providers/Microsoft.Peering/peerAsns";

    fn adapter_for(server: &MockServer) -> PeerAsnAdapter {
        let context = OperationContext::new("sub-1", server.uri(), None);
        PeerAsnAdapter::new(Arc::new(context)).unwrap()
    }

    #[tokio::test]
    async fn test_get_flattens_properties() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{}/contoso", PEER_ASNS)))
            .and(query_param("api-version", "2022-10-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "contoso",
                "id": "/subscriptions/sub-1/providers/Microsoft.Peering/peerAsns/contoso",
                "properties": {
                    "peerAsn": 65000,
                    "peerName": "Contoso",
                    "validationState": "Approved",
                    "peerContactDetail": [{"role": "Noc", "email": "noc@contoso.com"}]
                }
            })))
            .mount(&server)
            .await;

        let peer = adapter_for(&server).get("contoso").await.unwrap();
        assert_eq!(peer.peer_asn, Some(65000));
        assert_eq!(peer.validation_state.as_deref(), Some("Approved"));
        assert_eq!(peer.peer_contact_detail[0].email.as_deref(), Some("noc@contoso.com"));
    }

    #[tokio::test]
    async fn test_get_nested_error_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"PeerAsn": {"code": "NotFound", "message": "Peer ASN 'x' was not found"}}
            })))
            .mount(&server)
            .await;

        let err = adapter_for(&server).get("x").await.unwrap_err();
        assert_eq!(err.to_string(), "Code: NotFound, Message: Peer ASN 'x' was not found");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_follows_next_link() {
        let server = MockServer::start().await;
        let next = format!("{}/page2?api-version=2022-10-01", server.uri());

        Mock::given(method("GET"))
            .and(path(PEER_ASNS))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{"name": "a", "properties": {"peerAsn": 1}}],
                "nextLink": next
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{"name": "b", "properties": {"peerAsn": 2}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let peers = adapter_for(&server).list_by_subscription().await.unwrap();
        let names: Vec<_> = peers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_list_empty_subscription() {
        let mut communicator = MockPeeringCommunicator::new();
        communicator.expect_list().times(1).returning(|_| {
            Ok(RawResponse {
                status: 200,
                headers: Default::default(),
                body: r#"{"value": []}"#.to_string(),
            })
        });

        let peers = PeerAsnAdapter::with_communicator(communicator)
            .list_by_subscription()
            .await
            .unwrap();
        assert!(peers.is_empty());
    }
}
