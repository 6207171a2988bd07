//! Configuration management for armctl
//!
//! Handles configuration loading from files and environment variables.
//! Configuration is stored in TOML format with support for multiple named profiles.

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::credential::CredentialStore;
use super::error::{ConfigError, Result};
use super::polling::{ApiVersions, PollSettings};

/// Environment variable that overrides a profile's access token
pub const ACCESS_TOKEN_ENV: &str = "ARMCTL_ACCESS_TOKEN";
/// Environment variable that overrides a profile's subscription
pub const SUBSCRIPTION_ENV: &str = "ARMCTL_SUBSCRIPTION_ID";
/// Environment variable that overrides a profile's management endpoint
pub const MANAGEMENT_URL_ENV: &str = "ARMCTL_MANAGEMENT_URL";

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Profile used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Individual profile configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Profile {
    /// Subscription all resource paths are rooted at
    pub subscription_id: String,
    /// Resource manager endpoint
    #[serde(default = "default_management_url")]
    pub management_url: String,
    /// Directory (tenant) the token was issued for; informational
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Bearer token, plaintext or a `keyring:`/`env:`/`base64:` reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub api_versions: ApiVersions,
    #[serde(default)]
    pub poll: PollSettings,
}

/// Profile values after environment overrides and secret resolution
#[derive(Clone, PartialEq)]
pub struct ResolvedProfile {
    pub subscription_id: String,
    pub management_url: String,
    pub access_token: Option<String>,
}

impl std::fmt::Debug for ResolvedProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedProfile")
            .field("subscription_id", &self.subscription_id)
            .field("management_url", &self.management_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl Profile {
    /// Create a profile for a subscription with default endpoint and settings
    pub fn new(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            management_url: default_management_url(),
            tenant_id: None,
            access_token: None,
            api_versions: ApiVersions::default(),
            poll: PollSettings::default(),
        }
    }

    /// Check if this profile has a stored token
    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// Resolve the profile, optionally applying `ARMCTL_*` environment overrides
    pub fn resolve(&self, store: &CredentialStore, use_env: bool) -> Result<ResolvedProfile> {
        let env_override = |var: &str| {
            if use_env {
                std::env::var(var).ok()
            } else {
                None
            }
        };

        let subscription_id =
            env_override(SUBSCRIPTION_ENV).unwrap_or_else(|| self.subscription_id.clone());
        let management_url =
            env_override(MANAGEMENT_URL_ENV).unwrap_or_else(|| self.management_url.clone());

        let access_token = match env_override(ACCESS_TOKEN_ENV) {
            Some(token) => Some(token),
            None => self
                .access_token
                .as_deref()
                .map(|stored| {
                    store.resolve_secret(stored).map_err(|e| {
                        ConfigError::CredentialError(format!(
                            "Failed to resolve access token: {}",
                            e
                        ))
                    })
                })
                .transpose()?,
        };

        if subscription_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "subscription_id".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        Ok(ResolvedProfile {
            subscription_id,
            management_url,
            access_token,
        })
    }
}

impl Config {
    /// Resolve the profile name to use
    ///
    /// Resolution order: explicit name, `default_profile`, then the first
    /// profile in alphabetical order.
    pub fn resolve_profile_name(&self, explicit_profile: Option<&str>) -> Result<String> {
        if let Some(name) = explicit_profile {
            if !self.profiles.contains_key(name) {
                return Err(ConfigError::ProfileNotFound {
                    name: name.to_string(),
                });
            }
            return Ok(name.to_string());
        }

        if let Some(ref default) = self.default_profile {
            return Ok(default.clone());
        }

        let mut names: Vec<_> = self.profiles.keys().collect();
        names.sort();
        names
            .first()
            .map(|name| name.to_string())
            .ok_or_else(|| ConfigError::NoProfiles {
                suggestion: "Use 'armctl profile set' to create a profile.".to_string(),
            })
    }

    /// Look up the profile to use, returning its name alongside it
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<(String, &Profile)> {
        let name = self.resolve_profile_name(explicit_profile)?;
        let profile = self
            .profiles
            .get(&name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.clone() })?;
        Ok((name, profile))
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        let expanded_content = Self::expand_env_vars(&content);
        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Save configuration to the standard location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Set or update a profile
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Remove a profile by name
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// List all profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Get the path to the configuration file
    ///
    /// On macOS `~/.config/armctl/config.toml` is preferred when it (or its
    /// directory) exists, falling back to the platform standard location.
    ///
    /// On Linux: ~/.config/armctl/config.toml
    /// On Windows: %APPDATA%\armctl\armctl\config\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_path = base_dirs
                    .home_dir()
                    .join(".config")
                    .join("armctl")
                    .join("config.toml");

                if linux_style_path.exists()
                    || linux_style_path
                        .parent()
                        .map(|p| p.exists())
                        .unwrap_or(false)
                {
                    return Ok(linux_style_path);
                }
            }
        }

        let proj_dirs =
            ProjectDirs::from("dev", "armctl", "armctl").ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand environment variables in configuration content
    ///
    /// Supports ${VAR} and ${VAR:-default}. Unset variables without a default
    /// are left as-is so that profiles that aren't used don't fail to load.
    ///
    /// ```toml
    /// access_token = "${ARM_TOKEN}"
    /// management_url = "${ARM_URL:-https://management.azure.com}"
    /// ```
    fn expand_env_vars(content: &str) -> String {
        shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok())
            .to_string()
    }
}

fn default_management_url() -> String {
    "https://management.azure.com".to_string()
}
