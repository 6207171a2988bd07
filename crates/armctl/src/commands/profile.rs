//! Profile management command implementations

use std::io::{self, Write};

use armctl_core::config::{CredentialStore, Profile};
use colored::Colorize;
use serde_json::json;
use tracing::{debug, info, trace};

use crate::cli::ProfileCommands;
use crate::connection::ConnectionManager;
use crate::error::{ArmCtlError, Result as CliResult};
use crate::output::{self, OutputFormat};

/// Handle profile management commands
pub async fn handle_profile_command(
    profile_cmd: &ProfileCommands,
    conn_mgr: &ConnectionManager,
    output_format: OutputFormat,
) -> CliResult<()> {
    use ProfileCommands::*;

    match profile_cmd {
        List => handle_list(conn_mgr, output_format),
        Path => handle_path(conn_mgr, output_format),
        Show { name } => handle_show(conn_mgr, name, output_format),
        Set {
            name,
            subscription_id,
            management_url,
            tenant_id,
            access_token,
            no_token,
            #[cfg(feature = "secure-storage")]
            use_keyring,
        } => {
            let request = SetRequest {
                name,
                subscription_id,
                management_url,
                tenant_id: tenant_id.as_deref(),
                access_token: access_token.as_deref(),
                no_token: *no_token,
                #[cfg(feature = "secure-storage")]
                use_keyring: *use_keyring,
            };
            handle_set(conn_mgr, request)
        }
        Remove { name, yes } => handle_remove(conn_mgr, name, *yes),
        Default { name } => handle_default(conn_mgr, name),
    }
}

fn handle_list(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    debug!("Listing all configured profiles");
    let profiles = conn_mgr.config.list_profiles();
    trace!("Found {} profiles", profiles.len());
    let default = conn_mgr.config.default_profile.as_deref();

    if output_format != OutputFormat::Table {
        let config_path = conn_mgr
            .config_file()
            .ok()
            .map(|p| p.to_string_lossy().to_string());
        let profile_list: Vec<_> = profiles
            .iter()
            .map(|(name, profile)| {
                json!({
                    "name": name,
                    "subscription_id": profile.subscription_id,
                    "management_url": profile.management_url,
                    "is_default": default == Some(name.as_str()),
                })
            })
            .collect();
        let data = json!({
            "config_path": config_path,
            "profiles": profile_list,
            "count": profiles.len(),
        });
        output::print_output(&data, output_format)?;
        return Ok(());
    }

    if let Ok(path) = conn_mgr.config_file() {
        println!("Configuration file: {}", path.display());
        println!();
    }

    if profiles.is_empty() {
        info!("No profiles configured");
        println!("No profiles configured.");
        println!("Use 'armctl profile set' to create a profile.");
        return Ok(());
    }

    for (name, profile) in profiles {
        if default == Some(name.as_str()) {
            println!("{} {}", name.bold().cyan(), "(default)".green());
        } else {
            println!("{}", name.bold().cyan());
        }
        println!("  {} {}", "Subscription:".dimmed(), profile.subscription_id);
        println!("  {}     {}", "Endpoint:".dimmed(), profile.management_url);
    }
    Ok(())
}

fn handle_path(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    let config_path = conn_mgr.config_file()?;

    if output_format == OutputFormat::Table {
        println!("{}", config_path.display());
    } else {
        output::print_output(
            json!({ "config_path": config_path.to_string_lossy() }),
            output_format,
        )?;
    }
    Ok(())
}

fn handle_show(
    conn_mgr: &ConnectionManager,
    name: &str,
    output_format: OutputFormat,
) -> CliResult<()> {
    let profile = conn_mgr
        .config
        .profiles
        .get(name)
        .ok_or_else(|| ArmCtlError::ProfileNotFound { name: name.into() })?;
    let is_default = conn_mgr.config.default_profile.as_deref() == Some(name);
    let token_storage = token_storage(profile);

    if output_format != OutputFormat::Table {
        let data = json!({
            "name": name,
            "subscription_id": profile.subscription_id,
            "management_url": profile.management_url,
            "tenant_id": profile.tenant_id,
            "access_token": token_storage,
            "is_default": is_default,
            "api_versions": profile.api_versions,
            "poll": profile.poll,
        });
        output::print_output(&data, output_format)?;
        return Ok(());
    }

    println!("Profile: {}", name.bold());
    println!("Subscription: {}", profile.subscription_id);
    println!("Endpoint: {}", profile.management_url);
    if let Some(tenant) = &profile.tenant_id {
        println!("Tenant: {}", tenant);
    }
    println!("Access token: {}", token_storage);
    println!(
        "Polling: every {}s, timeout {}s",
        profile.poll.interval_secs, profile.poll.timeout_secs
    );
    if is_default {
        println!("{}", "(default profile)".green());
    }
    Ok(())
}

/// Where a profile's token lives, without revealing it
fn token_storage(profile: &Profile) -> &'static str {
    match profile.access_token.as_deref() {
        None => "not configured",
        Some(v) if CredentialStore::is_keyring_reference(v) => "keyring",
        Some(v) if v.starts_with("env:") || v.starts_with("${") => "environment",
        Some(_) => "config file",
    }
}

struct SetRequest<'a> {
    name: &'a str,
    subscription_id: &'a str,
    management_url: &'a str,
    tenant_id: Option<&'a str>,
    access_token: Option<&'a str>,
    no_token: bool,
    #[cfg(feature = "secure-storage")]
    use_keyring: bool,
}

fn handle_set(conn_mgr: &ConnectionManager, request: SetRequest<'_>) -> CliResult<()> {
    let name = request.name;
    debug!("Setting profile: {}", name);

    if request.subscription_id.trim().is_empty() {
        return Err(ArmCtlError::InvalidInput {
            message: "--subscription-id must not be empty".to_string(),
        });
    }

    let token = match request.access_token {
        Some(token) => Some(token.to_string()),
        None if request.no_token => None,
        None => {
            let token = rpassword::prompt_password("Access token: ").map_err(|e| {
                ArmCtlError::InvalidInput {
                    message: format!("Failed to read access token: {}", e),
                }
            })?;
            Some(token).filter(|t| !t.is_empty())
        }
    };

    #[cfg(feature = "secure-storage")]
    let token = match token {
        Some(token) if request.use_keyring => {
            let store = CredentialStore::new();
            let reference = store.store_credential(&format!("{}-access-token", name), &token)?;
            println!("Access token stored securely in OS keyring");
            Some(reference)
        }
        other => other,
    };

    // Polling and API version settings survive a credential update
    let mut profile = conn_mgr
        .config
        .profiles
        .get(name)
        .cloned()
        .unwrap_or_else(|| Profile::new(request.subscription_id));
    profile.subscription_id = request.subscription_id.to_string();
    profile.management_url = request.management_url.trim_end_matches('/').to_string();
    profile.tenant_id = request.tenant_id.map(String::from);
    if token.is_some() || request.no_token {
        profile.access_token = token;
    }

    let mut updated = conn_mgr.clone();
    updated.config.set_profile(name.to_string(), profile);
    updated.save_config()?;

    println!("Profile '{}' saved successfully to:", name);
    println!("  {}", updated.config_file()?.display());

    if updated.config.profiles.len() == 1 && updated.config.default_profile.is_none() {
        println!();
        println!("Tip: Set as default with:");
        println!("  armctl profile default {}", name);
    }
    Ok(())
}

fn handle_remove(conn_mgr: &ConnectionManager, name: &str, yes: bool) -> CliResult<()> {
    debug!("Removing profile: {}", name);

    if !conn_mgr.config.profiles.contains_key(name) {
        return Err(ArmCtlError::ProfileNotFound { name: name.into() });
    }

    let is_default = conn_mgr.config.default_profile.as_deref() == Some(name);
    if is_default {
        println!("Warning: '{}' is the default profile.", name);
    }

    if !yes && !confirm(&format!("Are you sure you want to remove profile '{}'?", name))? {
        println!("Profile removal cancelled.");
        return Ok(());
    }

    let mut updated = conn_mgr.clone();
    if let Some(profile) = updated.config.remove_profile(name)
        && let Some(token) = profile.access_token.as_deref()
        && CredentialStore::is_keyring_reference(token)
    {
        let store = CredentialStore::new();
        if let Err(e) = store.delete_credential(&format!("{}-access-token", name)) {
            debug!("Could not delete keyring entry for '{}': {}", name, e);
        }
    }
    updated.save_config()?;

    if is_default {
        println!("Default profile cleared.");
    }
    println!("Profile '{}' removed successfully.", name);
    Ok(())
}

fn handle_default(conn_mgr: &ConnectionManager, name: &str) -> CliResult<()> {
    debug!("Setting default profile: {}", name);

    if !conn_mgr.config.profiles.contains_key(name) {
        return Err(ArmCtlError::ProfileNotFound { name: name.into() });
    }

    let mut updated = conn_mgr.clone();
    updated.config.default_profile = Some(name.to_string());
    updated.save_config()?;

    println!("Default profile set to '{}'.", name);
    Ok(())
}

fn confirm(question: &str) -> CliResult<bool> {
    print!("{} (y/N): ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use armctl_core::config::Config;
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> ConnectionManager {
        ConnectionManager::with_config_path(
            Config::default(),
            Some(dir.path().join("config.toml")),
        )
    }

    #[test]
    fn test_set_then_default_persists() {
        let dir = TempDir::new().unwrap();
        let conn_mgr = manager(&dir);

        handle_set(
            &conn_mgr,
            SetRequest {
                name: "prod",
                subscription_id: "sub-1",
                management_url: "https://management.example.com/",
                tenant_id: None,
                access_token: Some("env:PROD_TOKEN"),
                no_token: false,
                #[cfg(feature = "secure-storage")]
                use_keyring: false,
            },
        )
        .unwrap();

        let path = dir.path().join("config.toml");
        let saved = Config::load_from_path(&path).unwrap();
        let profile = &saved.profiles["prod"];
        assert_eq!(profile.management_url, "https://management.example.com");
        assert_eq!(token_storage(profile), "environment");

        let conn_mgr = ConnectionManager::with_config_path(saved, Some(path.clone()));
        handle_default(&conn_mgr, "prod").unwrap();
        let saved = Config::load_from_path(&path).unwrap();
        assert_eq!(saved.default_profile.as_deref(), Some("prod"));
    }

    #[test]
    fn test_remove_unknown_profile() {
        let dir = TempDir::new().unwrap();
        let err = handle_remove(&manager(&dir), "ghost", true).unwrap_err();
        assert!(matches!(err, ArmCtlError::ProfileNotFound { .. }));
    }

    #[test]
    fn test_empty_subscription_rejected() {
        let dir = TempDir::new().unwrap();
        let err = handle_set(
            &manager(&dir),
            SetRequest {
                name: "x",
                subscription_id: " ",
                management_url: "https://management.azure.com",
                tenant_id: None,
                access_token: None,
                no_token: true,
                #[cfg(feature = "secure-storage")]
                use_keyring: false,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ArmCtlError::InvalidInput { .. }));
    }
}
