//! Transport request construction for import/export
//!
//! Pure transforms: no I/O beyond resolving the stored password.

use super::model::{ImportExportModel, ImportModel};
use crate::secret::{CredentialError, SecretResolver};
use serde::{Deserialize, Serialize};
use std::fmt;

const PASSWORD_FIELD: &str = "administratorLoginPassword";

/// Private link settings sent with a network-isolated operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkIsolationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_server_resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_account_resource_id: Option<String>,
}

/// Body of an export or import submission
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportExportDefinition {
    pub storage_key_type: String,
    pub storage_key: String,
    pub storage_uri: String,
    pub administrator_login: String,
    pub administrator_login_password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_isolation: Option<NetworkIsolationSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_objective_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size_bytes: Option<String>,
}

impl fmt::Debug for ImportExportDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportExportDefinition")
            .field("storage_key_type", &self.storage_key_type)
            .field("storage_key", &"<redacted>")
            .field("storage_uri", &self.storage_uri)
            .field("administrator_login", &self.administrator_login)
            .field("administrator_login_password", &"<redacted>")
            .field("authentication_type", &self.authentication_type)
            .field("network_isolation", &self.network_isolation)
            .field("database_name", &self.database_name)
            .field("edition", &self.edition)
            .field("service_objective_name", &self.service_objective_name)
            .field("max_size_bytes", &self.max_size_bytes)
            .finish()
    }
}

/// Build the body of an export submission
pub fn build_export(
    model: &ImportExportModel,
    resolver: &dyn SecretResolver,
) -> Result<ImportExportDefinition, CredentialError> {
    let password = resolver.reveal(PASSWORD_FIELD, &model.administrator_login_password)?;

    let network_isolation = if model.sql_server_resource_id.is_some()
        || model.storage_account_resource_id.is_some()
    {
        Some(NetworkIsolationSettings {
            sql_server_resource_id: model.sql_server_resource_id.clone(),
            storage_account_resource_id: model.storage_account_resource_id.clone(),
        })
    } else {
        None
    };

    Ok(ImportExportDefinition {
        storage_key_type: model.storage_key_type.as_str().to_string(),
        storage_key: model.storage_key.clone(),
        storage_uri: model.storage_uri.to_string(),
        administrator_login: model.administrator_login.clone(),
        administrator_login_password: password,
        authentication_type: model.authentication_type.wire_value(),
        network_isolation,
        database_name: None,
        edition: None,
        service_objective_name: None,
        max_size_bytes: None,
    })
}

/// Build the body of an import submission
pub fn build_import(
    model: &ImportModel,
    resolver: &dyn SecretResolver,
) -> Result<ImportExportDefinition, CredentialError> {
    let mut definition = build_export(&model.base, resolver)?;
    definition.database_name = Some(model.base.database_name.clone());
    definition.edition = Some(model.edition.wire_value().to_string());
    definition.service_objective_name = Some(model.service_objective_name.clone());
    definition.max_size_bytes = Some(model.database_max_size_bytes.to_string());
    Ok(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CredentialStore;
    use crate::secret::{SecretString, StoredSecretResolver};
    use crate::sql::model::{AuthenticationType, DatabaseEdition, StorageKeyType};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use url::Url;

    fn resolver() -> StoredSecretResolver {
        StoredSecretResolver::new(CredentialStore::plaintext())
    }

    fn model() -> ImportExportModel {
        // "cGFzcw==" is "pass"
        ImportExportModel::new(
            "rg",
            "srv",
            "db",
            StorageKeyType::StorageAccessKey,
            "k",
            Url::parse("https://s/c").unwrap(),
            "a",
            SecretString::new("base64:cGFzcw=="),
        )
    }

    #[test]
    fn test_export_omits_authentication_type_when_none() {
        let definition = build_export(&model(), &resolver()).unwrap();
        let body = serde_json::to_value(&definition).unwrap();

        assert_eq!(
            body,
            json!({
                "storageKeyType": "StorageAccessKey",
                "storageKey": "k",
                "storageUri": "https://s/c",
                "administratorLogin": "a",
                "administratorLoginPassword": "pass"
            })
        );
    }

    #[test]
    fn test_authentication_type_is_lowercased() {
        for (kind, expected) in [
            (AuthenticationType::Sql, "sql"),
            (AuthenticationType::AdPassword, "adpassword"),
            (AuthenticationType::ManagedIdentity, "managedidentity"),
        ] {
            let definition =
                build_export(&model().with_authentication_type(kind), &resolver()).unwrap();
            let body = serde_json::to_value(&definition).unwrap();
            assert_eq!(body["authenticationType"], expected);
        }
    }

    #[test]
    fn test_network_isolation_included_when_set() {
        let isolated = model().with_network_isolation(Some("/servers/srv".to_string()), None);
        let body = serde_json::to_value(build_export(&isolated, &resolver()).unwrap()).unwrap();
        assert_eq!(
            body["networkIsolation"],
            json!({"sqlServerResourceId": "/servers/srv"})
        );
    }

    #[test]
    fn test_import_adds_target_fields() {
        let import = ImportModel::new(model(), DatabaseEdition::Standard, "S3", 268_435_456_000);
        let body = serde_json::to_value(build_import(&import, &resolver()).unwrap()).unwrap();

        assert_eq!(body["databaseName"], "db");
        assert_eq!(body["edition"], "Standard");
        assert_eq!(body["serviceObjectiveName"], "S3");
        assert_eq!(body["maxSizeBytes"], "268435456000");
    }

    #[test]
    fn test_import_edition_none_is_empty_string() {
        let import = ImportModel::new(model(), DatabaseEdition::None, "S0", 1024);
        let body = serde_json::to_value(build_import(&import, &resolver()).unwrap()).unwrap();
        assert_eq!(body["edition"], "");
    }

    #[test]
    fn test_decrypt_failure_is_credential_error() {
        let mut broken = model();
        broken.administrator_login_password = SecretString::new("base64:@@@");

        let err = build_export(&broken, &resolver()).unwrap_err();
        assert_eq!(err.field, "administratorLoginPassword");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let definition = build_export(&model(), &resolver()).unwrap();
        let debug = format!("{:?}", definition);
        assert!(!debug.contains("pass\""));
        assert!(debug.contains("<redacted>"));
    }
}
