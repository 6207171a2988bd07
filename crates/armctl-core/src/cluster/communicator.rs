//! Transport calls for cluster documents

use super::model::Cluster;
use crate::error::{CoreError, Result};
use crate::operation::OperationHandle;
use crate::transport::{RawResponse, RestClient};
use async_trait::async_trait;
use url::Url;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterCommunicator: Send + Sync {
    async fn get(&self, resource_group: &str, cluster: &str) -> Result<RawResponse>;

    async fn put(&self, resource_group: &str, cluster: &Cluster) -> Result<RawResponse>;

    async fn poll(&self, handle: &OperationHandle) -> Result<RawResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpClusterCommunicator {
    client: RestClient,
    subscription_id: String,
    api_version: String,
}

impl HttpClusterCommunicator {
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

    fn cluster_url(&self, resource_group: &str, cluster: &str) -> Result<Url> {
        self.client.resource_url(
            &[
                "subscriptions",
                &self.subscription_id,
                "resourceGroups",
                resource_group,
                "providers",
                "Microsoft.ServiceFabric",
                "clusters",
                cluster,
            ],
            &self.api_version,
        )
    }
}

#[async_trait]
impl ClusterCommunicator for HttpClusterCommunicator {
    async fn get(&self, resource_group: &str, cluster: &str) -> Result<RawResponse> {
        let url = self.cluster_url(resource_group, cluster)?;
        self.client.get(url).await
    }

    async fn put(&self, resource_group: &str, cluster: &Cluster) -> Result<RawResponse> {
        let url = self.cluster_url(resource_group, &cluster.name)?;
        self.client.put(url, cluster).await
    }

    async fn poll(&self, handle: &OperationHandle) -> Result<RawResponse> {
        let url = Url::parse(handle.as_str()).map_err(|e| {
            CoreError::Validation(format!("invalid operation status link '{}': {}", handle, e))
        })?;
        self.client.get(url).await
    }
}
