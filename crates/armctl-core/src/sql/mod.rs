//! Database import/export as long-running operations

pub mod adapter;
pub mod builder;
pub mod communicator;
pub mod model;

pub use adapter::ImportExportAdapter;
pub use builder::{ImportExportDefinition, NetworkIsolationSettings, build_export, build_import};
pub use communicator::{
    DatabaseCoordinates, HttpImportExportCommunicator, ImportExportCommunicator, RequestKind,
};
pub use model::{AuthenticationType, DatabaseEdition, ImportExportModel, ImportModel, StorageKeyType};
