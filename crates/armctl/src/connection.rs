//! Builds the operation context for the selected profile

use std::path::PathBuf;
use std::sync::Arc;

use armctl_core::OperationContext;
use armctl_core::config::{
    ACCESS_TOKEN_ENV, Config, ConfigError, CredentialStore, MANAGEMENT_URL_ENV, PollSettings,
    Profile, SUBSCRIPTION_ENV,
};
use tracing::{debug, info, trace};

use crate::error::{ArmCtlError, Result as CliResult};

/// Everything a resource command needs to talk to the service
#[derive(Debug, Clone)]
pub struct Connection {
    pub context: Arc<OperationContext>,
    pub poll: PollSettings,
}

/// Connection manager for creating operation contexts
#[derive(Clone)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl ConnectionManager {
    pub fn with_config_path(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Save the configuration to the file it was loaded from
    pub fn save_config(&self) -> CliResult<()> {
        match &self.config_path {
            Some(path) => self.config.save_to_path(path)?,
            None => self.config.save()?,
        }
        Ok(())
    }

    /// Path of the active configuration file
    pub fn config_file(&self) -> CliResult<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::config_path()?),
        }
    }

    /// Resolve the profile and build a context from it
    ///
    /// When --config-file is given explicitly, `ARMCTL_*` environment
    /// variables are ignored so the file alone decides. Without any profile,
    /// the environment variables alone are enough to connect.
    pub fn connect(&self, profile_name: Option<&str>) -> CliResult<Connection> {
        let use_env_vars = self.config_path.is_none();
        debug!(
            "Config path: {:?}, use_env_vars: {}",
            self.config_path, use_env_vars
        );
        if !use_env_vars {
            info!("--config-file specified explicitly, ignoring environment variables");
        }

        let store = CredentialStore::new();

        let (name, profile) = match self.config.resolve_profile(profile_name) {
            Ok((name, profile)) => (name, profile.clone()),
            Err(ConfigError::NoProfiles { .. })
                if use_env_vars && std::env::var(SUBSCRIPTION_ENV).is_ok() =>
            {
                info!("No profiles configured, using {} from the environment", SUBSCRIPTION_ENV);
                ("<environment>".to_string(), Profile::new(String::new()))
            }
            Err(e) => return Err(e.into()),
        };
        info!("Using profile: {}", name);

        for var in [SUBSCRIPTION_ENV, ACCESS_TOKEN_ENV, MANAGEMENT_URL_ENV] {
            if use_env_vars && std::env::var(var).is_ok() {
                debug!("Found {} environment variable", var);
            }
        }

        let resolved = profile.resolve(&store, use_env_vars)?;
        trace!("Resolved profile: {:?}", resolved);

        if resolved.access_token.is_none() {
            return Err(ArmCtlError::MissingCredentials { name });
        }

        let context = OperationContext::from_resolved(&profile, resolved, store);
        Ok(Connection {
            context: Arc::new(context),
            poll: profile.poll.clone(),
        })
    }
}
