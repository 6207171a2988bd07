//! Transport calls for import/export
//!
//! One network call per method, no retries, faults returned unchanged.

use super::builder::ImportExportDefinition;
use crate::error::{CoreError, Result};
use crate::operation::OperationHandle;
use crate::transport::{RawResponse, RestClient};
use async_trait::async_trait;
use url::Url;

/// Which submission endpoint to call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Export,
    Import,
}

/// Location of the server (and database, for export) being acted on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseCoordinates {
    pub resource_group: String,
    pub server: String,
    pub database: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImportExportCommunicator: Send + Sync {
    /// Submit an export or import
    async fn submit(
        &self,
        kind: RequestKind,
        coordinates: &DatabaseCoordinates,
        definition: &ImportExportDefinition,
    ) -> Result<RawResponse>;

    /// Query the status link of a submitted operation
    async fn poll(&self, handle: &OperationHandle) -> Result<RawResponse>;
}

/// Communicator backed by the resource-manager REST endpoint
#[derive(Debug, Clone)]
pub struct HttpImportExportCommunicator {
    client: RestClient,
    subscription_id: String,
    api_version: String,
}

impl HttpImportExportCommunicator {
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

    fn submission_url(&self, kind: RequestKind, coordinates: &DatabaseCoordinates) -> Result<Url> {
        let mut segments = vec![
            "subscriptions",
            self.subscription_id.as_str(),
            "resourceGroups",
            coordinates.resource_group.as_str(),
            "providers",
            "Microsoft.Sql",
            "servers",
            coordinates.server.as_str(),
        ];

        match kind {
            RequestKind::Export => {
                let database = coordinates.database.as_deref().ok_or_else(|| {
                    CoreError::Validation("export requires a database name".to_string())
                })?;
                segments.extend(["databases", database, "export"]);
            }
            RequestKind::Import => segments.push("import"),
        }

        self.client.resource_url(&segments, &self.api_version)
    }
}

#[async_trait]
impl ImportExportCommunicator for HttpImportExportCommunicator {
    async fn submit(
        &self,
        kind: RequestKind,
        coordinates: &DatabaseCoordinates,
        definition: &ImportExportDefinition,
    ) -> Result<RawResponse> {
        let url = self.submission_url(kind, coordinates)?;
        self.client.post(url, definition).await
    }

    async fn poll(&self, handle: &OperationHandle) -> Result<RawResponse> {
        let url = Url::parse(handle.as_str()).map_err(|e| {
            CoreError::Validation(format!("invalid operation status link '{}': {}", handle, e))
        })?;
        self.client.get(url).await
    }
}
