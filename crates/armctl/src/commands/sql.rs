//! Database import/export commands

use armctl_core::OperationHandle;
use armctl_core::SecretString;
use armctl_core::operation::Tracked;
use armctl_core::sql::{DatabaseEdition, ImportExportAdapter, ImportExportModel, ImportModel};
use tracing::debug;

use crate::cli::{DatabaseArgs, SqlCommands, TransferArgs};
use crate::commands::async_utils::{handle_status, handle_submission};
use crate::connection::ConnectionManager;
use crate::error::{ArmCtlError, Result as CliResult};
use crate::output::OutputFormat;

pub async fn handle_sql_command(
    cmd: &SqlCommands,
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    output_format: OutputFormat,
) -> CliResult<()> {
    let connection = conn_mgr.connect(profile_name)?;
    let adapter = ImportExportAdapter::new(connection.context.clone())?;

    match cmd {
        SqlCommands::Export {
            database,
            transfer,
            async_ops,
        } => {
            let model = export_model(database, transfer)?;
            debug!(
                "Exporting {}/{} to {}",
                model.server_name, model.database_name, model.storage_uri
            );
            let exported = adapter.export(&model).await?;
            handle_submission(
                &adapter,
                &exported,
                exported.tracking().operation_status_link.as_ref(),
                async_ops,
                &connection.poll,
                output_format,
                "sql status",
            )
            .await
        }
        SqlCommands::Import {
            database,
            transfer,
            edition,
            service_objective,
            max_size_bytes,
            async_ops,
        } => {
            let model = import_model(
                database,
                transfer,
                *edition,
                service_objective,
                *max_size_bytes,
            )?;
            debug!(
                "Importing {} into {}/{}",
                model.base.storage_uri, model.base.server_name, model.base.database_name
            );
            let imported = adapter.import(&model).await?;
            handle_submission(
                &adapter,
                &imported,
                imported.tracking().operation_status_link.as_ref(),
                async_ops,
                &connection.poll,
                output_format,
                "sql status",
            )
            .await
        }
        SqlCommands::Status { handle, async_ops } => {
            handle_status(
                &adapter,
                &OperationHandle::new(handle.as_str()),
                async_ops,
                &connection.poll,
                output_format,
            )
            .await
        }
    }
}

fn export_model(database: &DatabaseArgs, transfer: &TransferArgs) -> CliResult<ImportExportModel> {
    let password = match &transfer.admin_password {
        Some(password) => password.clone(),
        None => rpassword::prompt_password(format!(
            "Password for {}: ",
            transfer.admin_login
        ))
        .map_err(|e| ArmCtlError::InvalidInput {
            message: format!("Failed to read administrator password: {}", e),
        })?,
    };

    Ok(ImportExportModel::new(
        &database.resource_group,
        &database.server,
        &database.database,
        transfer.storage_key_type,
        &transfer.storage_key,
        transfer.storage_uri.clone(),
        &transfer.admin_login,
        SecretString::new(password),
    )
    .with_authentication_type(transfer.auth_type)
    .with_network_isolation(
        transfer.sql_server_resource_id.clone(),
        transfer.storage_account_resource_id.clone(),
    ))
}

fn import_model(
    database: &DatabaseArgs,
    transfer: &TransferArgs,
    edition: DatabaseEdition,
    service_objective: &str,
    max_size_bytes: u64,
) -> CliResult<ImportModel> {
    if max_size_bytes == 0 {
        return Err(ArmCtlError::InvalidInput {
            message: "--max-size-bytes must be greater than zero".to_string(),
        });
    }
    let base = export_model(database, transfer)?;
    Ok(ImportModel::new(
        base,
        edition,
        service_objective,
        max_size_bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use armctl_core::sql::{AuthenticationType, StorageKeyType};

    fn args() -> (DatabaseArgs, TransferArgs) {
        (
            DatabaseArgs {
                resource_group: "rg".to_string(),
                server: "srv".to_string(),
                database: "db".to_string(),
            },
            TransferArgs {
                storage_uri: "https://acct.blob.core.windows.net/backups/db.bacpac"
                    .parse()
                    .unwrap(),
                storage_key_type: StorageKeyType::SharedAccessKey,
                storage_key: "?sv=token".to_string(),
                admin_login: "sqladmin".to_string(),
                admin_password: Some("env:SQL_PASSWORD".to_string()),
                auth_type: AuthenticationType::Sql,
                sql_server_resource_id: None,
                storage_account_resource_id: None,
            },
        )
    }

    #[test]
    fn test_export_model_keeps_password_reference() {
        let (database, transfer) = args();
        let model = export_model(&database, &transfer).unwrap();
        assert_eq!(model.database_name, "db");
        assert_eq!(model.authentication_type, AuthenticationType::Sql);
        assert_eq!(
            model.administrator_login_password.expose_stored(),
            "env:SQL_PASSWORD"
        );
    }

    #[test]
    fn test_import_rejects_zero_size() {
        let (database, transfer) = args();
        let err = import_model(&database, &transfer, DatabaseEdition::Standard, "S3", 0)
            .unwrap_err();
        assert!(matches!(err, ArmCtlError::InvalidInput { .. }));
    }
}
