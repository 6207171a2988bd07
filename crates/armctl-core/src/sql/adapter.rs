//! Export, import and status queries for databases

use super::builder::{ImportExportDefinition, build_export, build_import};
use super::communicator::{
    DatabaseCoordinates, HttpImportExportCommunicator, ImportExportCommunicator, RequestKind,
};
use super::model::{ImportExportModel, ImportModel};
use crate::context::OperationContext;
use crate::envelope::normalize_error;
use crate::error::Result;
use crate::operation::{OperationHandle, StatusModel, StatusResponse, SubmissionOutcome, overlay};
use crate::progress::StatusSource;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Orchestrates build, submit and mapping for import/export
pub struct ImportExportAdapter<C = HttpImportExportCommunicator> {
    context: Arc<OperationContext>,
    communicator: C,
}

impl ImportExportAdapter<HttpImportExportCommunicator> {
    /// Adapter talking to the context's management endpoint
    pub fn new(context: Arc<OperationContext>) -> Result<Self> {
        let communicator = HttpImportExportCommunicator::new(
            context.rest_client()?,
            context.subscription_id.clone(),
            context.api_versions.sql.clone(),
        );
        Ok(Self {
            context,
            communicator,
        })
    }
}

impl<C: ImportExportCommunicator> ImportExportAdapter<C> {
    pub fn with_communicator(context: Arc<OperationContext>, communicator: C) -> Self {
        Self {
            context,
            communicator,
        }
    }

    /// Start exporting a database to storage
    ///
    /// Returns a copy of `model` carrying the reported status and the link to
    /// poll; `model` itself is not modified.
    pub async fn export(&self, model: &ImportExportModel) -> Result<ImportExportModel> {
        let definition = build_export(model, self.context.resolver())?;
        let coordinates = DatabaseCoordinates {
            resource_group: model.resource_group_name.clone(),
            server: model.server_name.clone(),
            database: Some(model.database_name.clone()),
        };

        info!(
            "Exporting database {}/{} to {}",
            model.server_name, model.database_name, model.storage_uri
        );
        let outcome = self.submit(RequestKind::Export, &coordinates, &definition).await?;
        Ok(overlay(model, &outcome))
    }

    /// Start importing a bacpac into a new database
    pub async fn import(&self, model: &ImportModel) -> Result<ImportModel> {
        let definition = build_import(model, self.context.resolver())?;
        let coordinates = DatabaseCoordinates {
            resource_group: model.base.resource_group_name.clone(),
            server: model.base.server_name.clone(),
            database: None,
        };

        info!(
            "Importing {} into database {}/{}",
            model.base.storage_uri, model.base.server_name, model.base.database_name
        );
        let outcome = self.submit(RequestKind::Import, &coordinates, &definition).await?;
        Ok(overlay(model, &outcome))
    }

    /// Current status of a submitted operation
    pub async fn get_status(&self, handle: &OperationHandle) -> Result<StatusModel> {
        let response = self
            .communicator
            .poll(handle)
            .await
            .map_err(normalize_error)?;
        let status = StatusResponse::from_response(&response)?;
        Ok(StatusModel::from_response(handle, status))
    }

    async fn submit(
        &self,
        kind: RequestKind,
        coordinates: &DatabaseCoordinates,
        definition: &ImportExportDefinition,
    ) -> Result<SubmissionOutcome> {
        let response = self
            .communicator
            .submit(kind, coordinates, definition)
            .await
            .map_err(normalize_error)?;
        let outcome = SubmissionOutcome::from_response(&response)?;
        debug!("{:?} submitted: {}", kind, outcome.status);
        Ok(outcome)
    }
}

#[async_trait]
impl<C: ImportExportCommunicator> StatusSource for ImportExportAdapter<C> {
    async fn get_status(&self, handle: &OperationHandle) -> Result<StatusModel> {
        ImportExportAdapter::get_status(self, handle).await
    }
}
