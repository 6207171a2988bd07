//! Application gateway redirect configuration commands
//!
//! These edit a gateway JSON document on disk. Nothing is sent to the
//! service; the edited document is printed or written back to the file.

use std::fs;
use std::path::Path;

use armctl_core::network::{
    ApplicationGateway, RedirectConfiguration, add_redirect_configuration,
    remove_redirect_configuration,
};
use tracing::{debug, info};

use crate::cli::{GatewayCommands, RedirectConfigCommands};
use crate::error::{ArmCtlError, Result as CliResult};
use crate::output::{OutputFormat, print_output};

pub fn handle_gateway_command(cmd: &GatewayCommands, output_format: OutputFormat) -> CliResult<()> {
    match cmd {
        GatewayCommands::RedirectConfig(cmd) => handle_redirect_config(cmd, output_format),
    }
}

fn handle_redirect_config(
    cmd: &RedirectConfigCommands,
    output_format: OutputFormat,
) -> CliResult<()> {
    match cmd {
        RedirectConfigCommands::Add {
            gateway_file,
            name,
            redirect_type,
            target_listener_id,
            target_url,
            include_path,
            include_query_string,
            in_place,
        } => {
            let gateway = read_gateway(gateway_file)?;
            let config = match (target_listener_id, target_url) {
                (Some(listener), None) => {
                    RedirectConfiguration::to_listener(name, *redirect_type, listener)
                }
                (None, Some(url)) => RedirectConfiguration::to_url(name, *redirect_type, url),
                _ => {
                    return Err(ArmCtlError::InvalidInput {
                        message: "give exactly one of --target-listener-id or --target-url"
                            .to_string(),
                    });
                }
            }
            .including(*include_path, *include_query_string);

            let updated = add_redirect_configuration(&gateway, config)?;
            info!("Added redirect configuration {} to {}", name, updated.name);
            emit_gateway(&updated, gateway_file, *in_place, output_format)
        }
        RedirectConfigCommands::Remove {
            gateway_file,
            name,
            in_place,
        } => {
            let gateway = read_gateway(gateway_file)?;
            let updated = remove_redirect_configuration(&gateway, name)?;
            if updated.redirect_configurations.len() == gateway.redirect_configurations.len() {
                info!("No redirect configuration named {} on {}", name, gateway.name);
            }
            emit_gateway(&updated, gateway_file, *in_place, output_format)
        }
        RedirectConfigCommands::List { gateway_file } => {
            let gateway = read_gateway(gateway_file)?;
            print_output(&gateway.redirect_configurations, output_format)?;
            Ok(())
        }
    }
}

fn read_gateway(path: &str) -> CliResult<ApplicationGateway> {
    debug!("Reading gateway document from {}", path);
    let content = fs::read_to_string(Path::new(path)).map_err(|e| ArmCtlError::FileError {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| ArmCtlError::FileError {
        path: path.to_string(),
        message: format!("not a gateway document: {}", e),
    })
}

fn emit_gateway(
    gateway: &ApplicationGateway,
    path: &str,
    in_place: bool,
    output_format: OutputFormat,
) -> CliResult<()> {
    if !in_place {
        print_output(gateway, output_format)?;
        return Ok(());
    }

    let content = serde_json::to_string_pretty(gateway)?;
    fs::write(path, content + "\n").map_err(|e| ArmCtlError::FileError {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    println!("Updated {}", path);
    Ok(())
}
