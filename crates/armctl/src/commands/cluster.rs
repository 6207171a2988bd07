//! Service fabric cluster commands

use armctl_core::OperationHandle;
use armctl_core::cluster::{ClusterAdapter, NodeType};
use tracing::debug;

use crate::cli::{ClusterCommands, NodeTypeCommands};
use crate::commands::async_utils::{handle_status, handle_submission};
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;
use crate::output::{OutputFormat, print_output};

pub async fn handle_cluster_command(
    cmd: &ClusterCommands,
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    output_format: OutputFormat,
) -> CliResult<()> {
    let connection = conn_mgr.connect(profile_name)?;
    let adapter = ClusterAdapter::new(connection.context.clone())?;

    match cmd {
        ClusterCommands::Get {
            resource_group,
            cluster,
        } => {
            let cluster = adapter.get(resource_group, cluster).await?;
            print_output(&cluster, output_format)?;
            Ok(())
        }
        ClusterCommands::NodeType(NodeTypeCommands::Add {
            resource_group,
            cluster,
            name,
            instances,
            primary,
            durability,
            async_ops,
        }) => {
            let mut node_type = NodeType::new(name, *instances).with_durability(*durability);
            if *primary {
                node_type = node_type.primary();
            }
            debug!("Adding node type {:?}", node_type);

            let update = adapter
                .add_node_type(resource_group, cluster, node_type)
                .await?;
            handle_submission(
                &adapter,
                &update,
                update.tracking.operation_status_link.as_ref(),
                async_ops,
                &connection.poll,
                output_format,
                "cluster status",
            )
            .await
        }
        ClusterCommands::NodeType(NodeTypeCommands::Remove {
            resource_group,
            cluster,
            name,
            async_ops,
        }) => {
            let update = adapter
                .remove_node_type(resource_group, cluster, name)
                .await?;
            handle_submission(
                &adapter,
                &update,
                update.tracking.operation_status_link.as_ref(),
                async_ops,
                &connection.poll,
                output_format,
                "cluster status",
            )
            .await
        }
        ClusterCommands::Status { handle, async_ops } => {
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
