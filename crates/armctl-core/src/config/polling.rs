//! Polling and API version settings stored per profile

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Defaults used when a command waits for a long-running operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSettings {
    /// Seconds between status queries
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Seconds before giving up on an operation
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl PollSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `api-version` query values, one per resource provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiVersions {
    #[serde(default = "default_sql_version")]
    pub sql: String,

    #[serde(default = "default_service_fabric_version")]
    pub service_fabric: String,

    #[serde(default = "default_peering_version")]
    pub peering: String,
}

impl Default for ApiVersions {
    fn default() -> Self {
        Self {
            sql: default_sql_version(),
            service_fabric: default_service_fabric_version(),
            peering: default_peering_version(),
        }
    }
}

// Default value functions for serde
fn default_interval_secs() -> u64 {
    10
}

fn default_timeout_secs() -> u64 {
    1800
}

fn default_sql_version() -> String {
    "2021-11-01".to_string()
}

fn default_service_fabric_version() -> String {
    "2021-06-01".to_string()
}

fn default_peering_version() -> String {
    "2022-10-01".to_string()
}
