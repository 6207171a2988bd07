//! Configuration and profile management
//!
// Allow nested config module - this is intentional for the config subsystem

#![allow(clippy::module_inception)]
//!
//! - Multiple named profiles, each bound to one subscription and endpoint
//! - Secure credential storage using OS keyring (optional)
//! - Environment variable expansion in config files
//! - Platform-specific config file locations

pub mod config;
pub mod credential;
pub mod error;
pub mod polling;

pub use config::{
    ACCESS_TOKEN_ENV, Config, MANAGEMENT_URL_ENV, Profile, ResolvedProfile, SUBSCRIPTION_ENV,
};
pub use credential::{CredentialStorage, CredentialStore};
pub use error::{ConfigError, Result};
pub use polling::{ApiVersions, PollSettings};
