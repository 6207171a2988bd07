use anyhow::Result;
use armctl_core::config::Config;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, shells};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod connection;
mod error;
mod output;

use cli::{Cli, Commands};
use connection::ConnectionManager;
use error::ArmCtlError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let conn_mgr = match load_config(cli.config_file.as_deref()) {
        Ok(conn_mgr) => conn_mgr,
        Err(e) => {
            e.print_diagnostic();
            std::process::exit(1);
        }
    };

    if let Err(e) = execute_command(&cli, &conn_mgr).await {
        e.print_diagnostic();
        std::process::exit(1);
    }

    Ok(())
}

/// Load configuration from the given path or the default location
fn load_config(config_file: Option<&str>) -> Result<ConnectionManager, ArmCtlError> {
    let (config, config_path) = if let Some(config_file) = config_file {
        let path = std::path::PathBuf::from(config_file);
        debug!("Loading config from explicit path: {:?}", path);
        (Config::load_from_path(&path)?, Some(path))
    } else {
        debug!("Loading config from default location");
        (Config::load()?, None)
    };
    debug!(
        "Creating ConnectionManager with config_path: {:?}",
        config_path
    );
    Ok(ConnectionManager::with_config_path(config, config_path))
}

fn init_tracing(verbose: u8) {
    // RUST_LOG wins over the verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "armctl=warn,armctl_core=warn",
            1 => "armctl=info,armctl_core=info",
            2 => "armctl=debug,armctl_core=debug",
            _ => "armctl=trace,armctl_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

async fn execute_command(cli: &Cli, conn_mgr: &ConnectionManager) -> Result<(), ArmCtlError> {
    info!("Command: {}", format_command(&cli.command));

    let profile = cli.profile.as_deref();
    let human = output::OutputFormat::resolve(cli.output, output::OutputFormat::Table);
    let structured = output::OutputFormat::resolve(cli.output, output::OutputFormat::Json);

    let start = std::time::Instant::now();
    let result = match &cli.command {
        Commands::Version => {
            debug!("Showing version information");
            if human == output::OutputFormat::Table {
                println!("armctl {}", env!("CARGO_PKG_VERSION"));
            } else {
                let output_data = serde_json::json!({
                    "version": env!("CARGO_PKG_VERSION"),
                    "name": env!("CARGO_PKG_NAME"),
                });
                output::print_output(&output_data, human)?;
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            debug!("Generating completions for {:?}", shell);
            generate_completions(*shell);
            Ok(())
        }
        Commands::Profile(profile_cmd) => {
            debug!("Executing profile command");
            commands::profile::handle_profile_command(profile_cmd, conn_mgr, human).await
        }
        Commands::Sql(sql_cmd) => {
            commands::sql::handle_sql_command(sql_cmd, conn_mgr, profile, structured).await
        }
        Commands::Gateway(gateway_cmd) => {
            commands::gateway::handle_gateway_command(gateway_cmd, structured)
        }
        Commands::Cluster(cluster_cmd) => {
            commands::cluster::handle_cluster_command(cluster_cmd, conn_mgr, profile, structured)
                .await
        }
        Commands::PeerAsn(peer_asn_cmd) => {
            commands::peer_asn::handle_peer_asn_command(peer_asn_cmd, conn_mgr, profile, structured)
                .await
        }
    };

    let duration = start.elapsed();
    match &result {
        Ok(_) => info!("Command completed successfully in {:?}", duration),
        Err(e) => error!("Command failed after {:?}: {}", duration, e),
    }

    result
}

/// Generate shell completions
fn generate_completions(shell: cli::Shell) {
    let mut cmd = cli::Cli::command();
    let name = cmd.get_name().to_string();

    match shell {
        cli::Shell::Bash => generate(shells::Bash, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Zsh => generate(shells::Zsh, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::Fish => generate(shells::Fish, &mut cmd, name, &mut std::io::stdout()),
        cli::Shell::PowerShell => {
            generate(shells::PowerShell, &mut cmd, name, &mut std::io::stdout())
        }
        cli::Shell::Elvish => generate(shells::Elvish, &mut cmd, name, &mut std::io::stdout()),
    }
}

/// Format command for logging, leaving out tokens, keys and passwords
fn format_command(command: &Commands) -> String {
    use cli::{
        ClusterCommands, GatewayCommands, NodeTypeCommands, PeerAsnCommands, ProfileCommands,
        RedirectConfigCommands, SqlCommands,
    };

    match command {
        Commands::Version => "version".to_string(),
        Commands::Completions { shell } => format!("completions {:?}", shell),
        Commands::Profile(cmd) => match cmd {
            ProfileCommands::List => "profile list".to_string(),
            ProfileCommands::Path => "profile path".to_string(),
            ProfileCommands::Show { name } => format!("profile show {}", name),
            ProfileCommands::Set { name, .. } => {
                format!("profile set {} [credentials redacted]", name)
            }
            ProfileCommands::Remove { name, .. } => format!("profile remove {}", name),
            ProfileCommands::Default { name } => format!("profile default {}", name),
        },
        Commands::Sql(cmd) => match cmd {
            SqlCommands::Export { database, .. } => format!(
                "sql export {}/{}/{} [credentials redacted]",
                database.resource_group, database.server, database.database
            ),
            SqlCommands::Import { database, .. } => format!(
                "sql import {}/{}/{} [credentials redacted]",
                database.resource_group, database.server, database.database
            ),
            SqlCommands::Status { handle, .. } => format!("sql status {}", handle),
        },
        Commands::Gateway(GatewayCommands::RedirectConfig(cmd)) => match cmd {
            RedirectConfigCommands::Add {
                gateway_file, name, ..
            } => format!("gateway redirect-config add {} --gateway-file {}", name, gateway_file),
            RedirectConfigCommands::Remove {
                gateway_file, name, ..
            } => format!(
                "gateway redirect-config remove {} --gateway-file {}",
                name, gateway_file
            ),
            RedirectConfigCommands::List { gateway_file } => {
                format!("gateway redirect-config list --gateway-file {}", gateway_file)
            }
        },
        Commands::Cluster(cmd) => match cmd {
            ClusterCommands::Get {
                resource_group,
                cluster,
            } => format!("cluster get {}/{}", resource_group, cluster),
            ClusterCommands::NodeType(NodeTypeCommands::Add {
                resource_group,
                cluster,
                name,
                ..
            }) => format!("cluster node-type add {}/{} {}", resource_group, cluster, name),
            ClusterCommands::NodeType(NodeTypeCommands::Remove {
                resource_group,
                cluster,
                name,
                ..
            }) => format!(
                "cluster node-type remove {}/{} {}",
                resource_group, cluster, name
            ),
            ClusterCommands::Status { handle, .. } => format!("cluster status {}", handle),
        },
        Commands::PeerAsn(PeerAsnCommands::Get { name }) => match name {
            Some(name) => format!("peer-asn get {}", name),
            None => "peer-asn get (all)".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_command_redacts_secrets() {
        let cli = Cli::try_parse_from([
            "armctl",
            "sql",
            "export",
            "-g",
            "rg",
            "--server",
            "srv",
            "--database",
            "db",
            "--storage-uri",
            "https://acct.blob.core.windows.net/b/db.bacpac",
            "--storage-key",
            "SECRETKEY",
            "--admin-login",
            "sqladmin",
            "--admin-password",
            "hunter2",
        ])
        .unwrap();

        let formatted = format_command(&cli.command);
        assert_eq!(formatted, "sql export rg/srv/db [credentials redacted]");
        assert!(!formatted.contains("SECRETKEY"));
        assert!(!formatted.contains("hunter2"));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
