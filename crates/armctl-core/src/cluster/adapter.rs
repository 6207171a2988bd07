//! Node type changes on a cluster
//!
//! Each change reads the cluster, applies the change locally and writes the
//! whole document back. Name clashes and missing names are detected locally,
//! so a rejected change never reaches the PUT.

use super::communicator::{ClusterCommunicator, HttpClusterCommunicator};
use super::model::{Cluster, ClusterUpdate, NodeType};
use crate::context::OperationContext;
use crate::envelope::normalize_error;
use crate::error::{CoreError, Result};
use crate::mutation::{RemovePolicy, add_named_child, find_named_child, remove_named_child};
use crate::operation::{
    OperationHandle, OperationTracking, StatusModel, StatusResponse, SubmissionOutcome, overlay,
};
use crate::progress::StatusSource;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

pub struct ClusterAdapter<C = HttpClusterCommunicator> {
    context: Arc<OperationContext>,
    communicator: C,
}

impl ClusterAdapter<HttpClusterCommunicator> {
    pub fn new(context: Arc<OperationContext>) -> Result<Self> {
        let communicator = HttpClusterCommunicator::new(
            context.rest_client()?,
            context.subscription_id.clone(),
            context.api_versions.service_fabric.clone(),
        );
        Ok(Self {
            context,
            communicator,
        })
    }
}

impl<C: ClusterCommunicator> ClusterAdapter<C> {
    pub fn with_communicator(context: Arc<OperationContext>, communicator: C) -> Self {
        Self {
            context,
            communicator,
        }
    }

    pub async fn get(&self, resource_group: &str, cluster: &str) -> Result<Cluster> {
        let response = self
            .communicator
            .get(resource_group, cluster)
            .await
            .map_err(normalize_error)?;
        response.json()
    }

    /// Add a node type
    ///
    /// Only one node type may be primary.
    pub async fn add_node_type(
        &self,
        resource_group: &str,
        cluster_name: &str,
        node_type: NodeType,
    ) -> Result<ClusterUpdate> {
        if node_type.vm_instance_count == 0 {
            return Err(CoreError::Validation(format!(
                "node type '{}' needs at least one instance",
                node_type.name
            )));
        }

        let mut cluster = self.get(resource_group, cluster_name).await?;
        let existing_primary = cluster
            .node_types()
            .iter()
            .find(|n| n.is_primary)
            .map(|n| n.name.clone());
        let (name, is_primary) = (node_type.name.clone(), node_type.is_primary);

        // Name clashes are reported before the primary check
        add_named_child(&mut cluster.properties.node_types, node_type)?;
        if is_primary && let Some(existing) = existing_primary {
            return Err(CoreError::Validation(format!(
                "cluster '{}' already has primary node type '{}'",
                cluster.name, existing
            )));
        }

        info!(
            "Adding node type {} to cluster {} (subscription {})",
            name, cluster.name, self.context.subscription_id
        );
        self.write(resource_group, cluster).await
    }

    /// Remove a node type; fails if it does not exist
    pub async fn remove_node_type(
        &self,
        resource_group: &str,
        cluster_name: &str,
        node_type: &str,
    ) -> Result<ClusterUpdate> {
        let mut cluster = self.get(resource_group, cluster_name).await?;

        if let Some(index) = find_named_child(cluster.node_types(), node_type) {
            let primaries = cluster.node_types().iter().filter(|n| n.is_primary).count();
            if cluster.node_types()[index].is_primary && primaries == 1 {
                return Err(CoreError::Validation(format!(
                    "node type '{}' is the only primary node type of cluster '{}'",
                    node_type, cluster.name
                )));
            }
        }

        info!(
            "Removing node type {} from cluster {} (subscription {})",
            node_type, cluster.name, self.context.subscription_id
        );
        remove_named_child(
            &mut cluster.properties.node_types,
            node_type,
            RemovePolicy::STRICT,
        )?;
        self.write(resource_group, cluster).await
    }

    pub async fn get_status(&self, handle: &OperationHandle) -> Result<StatusModel> {
        let response = self
            .communicator
            .poll(handle)
            .await
            .map_err(normalize_error)?;
        let status = StatusResponse::from_response(&response)?;
        Ok(StatusModel::from_response(handle, status))
    }

    async fn write(&self, resource_group: &str, cluster: Cluster) -> Result<ClusterUpdate> {
        let response = self
            .communicator
            .put(resource_group, &cluster)
            .await
            .map_err(normalize_error)?;
        let outcome = SubmissionOutcome::from_response(&response)?;
        debug!("Cluster {} update: {}", cluster.name, outcome.status);

        // Prefer the document the service echoed back, when there is one
        let cluster = match response.json_or_null()? {
            serde_json::Value::Null => cluster,
            body => serde_json::from_value(body).unwrap_or(cluster),
        };

        let submitted = ClusterUpdate {
            cluster,
            tracking: OperationTracking::default(),
        };
        Ok(overlay(&submitted, &outcome))
    }
}

#[async_trait]
impl<C: ClusterCommunicator> StatusSource for ClusterAdapter<C> {
    async fn get_status(&self, handle: &OperationHandle) -> Result<StatusModel> {
        ClusterAdapter::get_status(self, handle).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::communicator::MockClusterCommunicator;
    use crate::transport::RawResponse;
    use reqwest::header::HeaderMap;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CLUSTER_PATH: &str = "/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.ServiceFabric/clusters/sf1";

    fn cluster_doc() -> serde_json::Value {
        json!({
            "name": "sf1",
            "location": "westus",
            "properties": {
                "nodeTypes": [
                    {"name": "nt1", "isPrimary": true, "vmInstanceCount": 5},
                    {"name": "nt2", "isPrimary": false, "vmInstanceCount": 3}
                ]
            }
        })
    }

    fn adapter_for(server: &MockServer) -> ClusterAdapter {
        let context = OperationContext::new("sub-1", server.uri(), Some("t".to_string()));
        ClusterAdapter::new(Arc::new(context)).unwrap()
    }

    async fn mount_get(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path(CLUSTER_PATH))
            .and(query_param("api-version", "2021-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(cluster_doc()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_add_node_type_puts_updated_cluster() {
        let server = MockServer::start().await;
        mount_get(&server).await;

        Mock::given(method("PUT"))
            .and(path(CLUSTER_PATH))
            .and(body_partial_json(json!({"location": "westus"})))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header("Azure-AsyncOperation", "https://op/sf/1"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let update = adapter_for(&server)
            .add_node_type("rg", "sf1", NodeType::new("nt3", 2))
            .await
            .unwrap();

        assert_eq!(update.tracking.status.as_deref(), Some("InProgress"));
        assert_eq!(
            update.tracking.operation_status_link,
            Some(OperationHandle::new("https://op/sf/1"))
        );
        let names: Vec<_> = update.cluster.node_types().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["nt1", "nt2", "nt3"]);
    }

    #[tokio::test]
    async fn test_duplicate_node_type_never_puts() {
        let server = MockServer::start().await;
        mount_get(&server).await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = adapter_for(&server)
            .add_node_type("rg", "sf1", NodeType::new("NT2", 2))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::DuplicateName { kind: "NodeType", .. }));
    }

    #[tokio::test]
    async fn test_duplicate_primary_node_type_reports_duplicate_name() {
        let server = MockServer::start().await;
        mount_get(&server).await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = adapter_for(&server)
            .add_node_type("rg", "sf1", NodeType::new("Nt1", 3).primary())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::DuplicateName { kind: "NodeType", .. }));
    }

    #[tokio::test]
    async fn test_second_primary_node_type_is_rejected() {
        let server = MockServer::start().await;
        mount_get(&server).await;

        let err = adapter_for(&server)
            .add_node_type("rg", "sf1", NodeType::new("nt4", 3).primary())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
        assert!(err.to_string().contains("nt1"));
    }

    #[tokio::test]
    async fn test_remove_missing_node_type_fails() {
        let server = MockServer::start().await;
        mount_get(&server).await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = adapter_for(&server)
            .remove_node_type("rg", "sf1", "nt9")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.is_local());
    }

    #[tokio::test]
    async fn test_remove_only_primary_is_rejected() {
        let server = MockServer::start().await;
        mount_get(&server).await;

        let err = adapter_for(&server)
            .remove_node_type("rg", "sf1", "nt1")
            .await
            .unwrap_err();
        assert!(err.is_bad_request());
    }

    #[tokio::test]
    async fn test_get_fault_is_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": "ResourceNotFound", "message": "Cluster 'sf1' not found"}
            })))
            .mount(&server)
            .await;

        let err = adapter_for(&server).get("rg", "sf1").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Code: ResourceNotFound, Message: Cluster 'sf1' not found"
        );
    }

    #[tokio::test]
    async fn test_remove_node_type_with_echoed_body() {
        let mut communicator = MockClusterCommunicator::new();
        communicator.expect_get().returning(|_, _| {
            Ok(RawResponse {
                status: 200,
                headers: HeaderMap::new(),
                body: cluster_doc().to_string(),
            })
        });
        communicator
            .expect_put()
            .withf(|rg, cluster| rg == "rg" && cluster.node_types().len() == 1)
            .times(1)
            .returning(|_, cluster| {
                Ok(RawResponse {
                    status: 200,
                    headers: HeaderMap::new(),
                    body: serde_json::to_string(cluster).unwrap(),
                })
            });

        let context = Arc::new(OperationContext::new("sub-1", "https://m", None));
        let adapter = ClusterAdapter::with_communicator(context, communicator);
        let update = adapter.remove_node_type("rg", "sf1", "nt2").await.unwrap();

        assert_eq!(update.tracking.status.as_deref(), Some("Succeeded"));
        assert_eq!(update.cluster.node_types()[0].name, "nt1");
    }
}
