//! User-facing models for database import/export

use crate::operation::{OperationTracking, Tracked};
use crate::secret::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// How the server authenticates against the database during the operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthenticationType {
    #[default]
    None,
    Sql,
    AdPassword,
    ManagedIdentity,
}

impl AuthenticationType {
    /// Value sent on the wire; `None` must not be sent at all
    pub fn wire_value(&self) -> Option<String> {
        match self {
            AuthenticationType::None => None,
            other => Some(other.to_string().to_lowercase()),
        }
    }
}

impl fmt::Display for AuthenticationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthenticationType::None => "None",
            AuthenticationType::Sql => "Sql",
            AuthenticationType::AdPassword => "AdPassword",
            AuthenticationType::ManagedIdentity => "ManagedIdentity",
        };
        f.write_str(name)
    }
}

impl FromStr for AuthenticationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(AuthenticationType::None),
            "sql" => Ok(AuthenticationType::Sql),
            "adpassword" => Ok(AuthenticationType::AdPassword),
            "managedidentity" => Ok(AuthenticationType::ManagedIdentity),
            _ => Err(format!("unknown authentication type '{}'", s)),
        }
    }
}

/// Kind of key given for the storage account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageKeyType {
    StorageAccessKey,
    SharedAccessKey,
    ManagedIdentity,
}

impl StorageKeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKeyType::StorageAccessKey => "StorageAccessKey",
            StorageKeyType::SharedAccessKey => "SharedAccessKey",
            StorageKeyType::ManagedIdentity => "ManagedIdentity",
        }
    }
}

impl FromStr for StorageKeyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "storageaccesskey" => Ok(StorageKeyType::StorageAccessKey),
            "sharedaccesskey" => Ok(StorageKeyType::SharedAccessKey),
            "managedidentity" => Ok(StorageKeyType::ManagedIdentity),
            _ => Err(format!("unknown storage key type '{}'", s)),
        }
    }
}

/// Edition of a database created by import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DatabaseEdition {
    #[default]
    None,
    Basic,
    Standard,
    Premium,
    DataWarehouse,
    GeneralPurpose,
    BusinessCritical,
    Hyperscale,
}

impl DatabaseEdition {
    /// `None` is sent as an empty string
    pub fn wire_value(&self) -> &'static str {
        match self {
            DatabaseEdition::None => "",
            DatabaseEdition::Basic => "Basic",
            DatabaseEdition::Standard => "Standard",
            DatabaseEdition::Premium => "Premium",
            DatabaseEdition::DataWarehouse => "DataWarehouse",
            DatabaseEdition::GeneralPurpose => "GeneralPurpose",
            DatabaseEdition::BusinessCritical => "BusinessCritical",
            DatabaseEdition::Hyperscale => "Hyperscale",
        }
    }
}

impl FromStr for DatabaseEdition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "" => Ok(DatabaseEdition::None),
            "basic" => Ok(DatabaseEdition::Basic),
            "standard" => Ok(DatabaseEdition::Standard),
            "premium" => Ok(DatabaseEdition::Premium),
            "datawarehouse" => Ok(DatabaseEdition::DataWarehouse),
            "generalpurpose" => Ok(DatabaseEdition::GeneralPurpose),
            "businesscritical" => Ok(DatabaseEdition::BusinessCritical),
            "hyperscale" => Ok(DatabaseEdition::Hyperscale),
            _ => Err(format!("unknown edition '{}'", s)),
        }
    }
}

/// Export of a database, or the common part of an import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportExportModel {
    pub resource_group_name: String,
    pub server_name: String,
    pub database_name: String,
    pub storage_key_type: StorageKeyType,
    pub storage_key: String,
    pub storage_uri: Url,
    pub administrator_login: String,
    pub administrator_login_password: SecretString,
    #[serde(default)]
    pub authentication_type: AuthenticationType,
    /// Private link to the server, for network-isolated operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_server_resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_account_resource_id: Option<String>,
    #[serde(flatten)]
    pub tracking: OperationTracking,
}

impl ImportExportModel {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resource_group_name: impl Into<String>,
        server_name: impl Into<String>,
        database_name: impl Into<String>,
        storage_key_type: StorageKeyType,
        storage_key: impl Into<String>,
        storage_uri: Url,
        administrator_login: impl Into<String>,
        administrator_login_password: SecretString,
    ) -> Self {
        Self {
            resource_group_name: resource_group_name.into(),
            server_name: server_name.into(),
            database_name: database_name.into(),
            storage_key_type,
            storage_key: storage_key.into(),
            storage_uri,
            administrator_login: administrator_login.into(),
            administrator_login_password,
            authentication_type: AuthenticationType::None,
            sql_server_resource_id: None,
            storage_account_resource_id: None,
            tracking: OperationTracking::default(),
        }
    }

    #[must_use]
    pub fn with_authentication_type(mut self, authentication_type: AuthenticationType) -> Self {
        self.authentication_type = authentication_type;
        self
    }

    #[must_use]
    pub fn with_network_isolation(
        mut self,
        sql_server_resource_id: Option<String>,
        storage_account_resource_id: Option<String>,
    ) -> Self {
        self.sql_server_resource_id = sql_server_resource_id;
        self.storage_account_resource_id = storage_account_resource_id;
        self
    }
}

impl Tracked for ImportExportModel {
    fn tracking(&self) -> &OperationTracking {
        &self.tracking
    }

    fn tracking_mut(&mut self) -> &mut OperationTracking {
        &mut self.tracking
    }
}

/// Import of a bacpac into a new database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportModel {
    #[serde(flatten)]
    pub base: ImportExportModel,
    #[serde(default)]
    pub edition: DatabaseEdition,
    pub service_objective_name: String,
    pub database_max_size_bytes: u64,
}

impl ImportModel {
    pub fn new(
        base: ImportExportModel,
        edition: DatabaseEdition,
        service_objective_name: impl Into<String>,
        database_max_size_bytes: u64,
    ) -> Self {
        Self {
            base,
            edition,
            service_objective_name: service_objective_name.into(),
            database_max_size_bytes,
        }
    }
}

impl Tracked for ImportModel {
    fn tracking(&self) -> &OperationTracking {
        &self.base.tracking
    }

    fn tracking_mut(&mut self) -> &mut OperationTracking {
        &mut self.base.tracking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_wire_values() {
        assert_eq!(AuthenticationType::None.wire_value(), None);
        assert_eq!(AuthenticationType::Sql.wire_value().as_deref(), Some("sql"));
        assert_eq!(
            AuthenticationType::AdPassword.wire_value().as_deref(),
            Some("adpassword")
        );
        assert_eq!(
            AuthenticationType::ManagedIdentity.wire_value().as_deref(),
            Some("managedidentity")
        );
    }

    #[test]
    fn test_enum_parsing_ignores_case() {
        assert_eq!("ADPASSWORD".parse::<AuthenticationType>().unwrap(), AuthenticationType::AdPassword);
        assert_eq!(
            "sharedaccesskey".parse::<StorageKeyType>().unwrap(),
            StorageKeyType::SharedAccessKey
        );
        assert_eq!("hyperscale".parse::<DatabaseEdition>().unwrap(), DatabaseEdition::Hyperscale);
        assert!("bogus".parse::<DatabaseEdition>().is_err());
    }

    #[test]
    fn test_model_serialization_redacts_password() {
        let model = ImportExportModel::new(
            "rg",
            "srv",
            "db",
            StorageKeyType::StorageAccessKey,
            "k",
            Url::parse("https://s/c").unwrap(),
            "a",
            SecretString::new("p@ss"),
        );
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["administratorLoginPassword"], "<redacted>");
        assert_eq!(json["storageKeyType"], "StorageAccessKey");
        assert!(json.get("status").is_none());
    }
}
