//! Error types for armctl
//!
//! Core errors are mapped into [`ArmCtlError`] so each failure can carry
//! suggestions for the user.

use armctl_core::CoreError;
use armctl_core::config::ConfigError;
use colored::Colorize;
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// ```text
/// error: Profile 'prod' not found
///
///   tip: List available profiles: armctl profile list
/// ```
pub struct CliDiagnostic {
    message: String,
    detail: Option<String>,
    tips: Vec<String>,
}

impl CliDiagnostic {
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            detail: None,
            tips: Vec::new(),
        }
    }

    pub fn detail(mut self, text: &str) -> Self {
        self.detail = Some(text.to_string());
        self
    }

    pub fn tip(mut self, description: &str) -> Self {
        self.tips.push(description.to_string());
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        if let Some(detail) = &self.detail {
            eprintln!("  {}", detail);
        }

        for description in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
        }
    }
}

/// Main error type for the armctl application
#[derive(Error, Debug)]
pub enum ArmCtlError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("No profile configured. Use 'armctl profile set' to configure a profile.")]
    NoProfileConfigured,

    #[error("Missing access token for profile '{name}'")]
    MissingCredentials { name: String },

    #[error("Failed to decrypt credential: {message}")]
    Credential { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("{message}")]
    ApiError { status: Option<u16>, message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("File error for '{path}': {message}")]
    FileError { path: String, message: String },

    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    #[error("Timeout: {message}")]
    Timeout { message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for armctl operations
pub type Result<T> = std::result::Result<T, ArmCtlError>;

impl ArmCtlError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ArmCtlError::ProfileNotFound { name } => vec![
                "List available profiles: armctl profile list".to_string(),
                format!(
                    "Create profile '{}': armctl profile set {} --subscription-id <id>",
                    name, name
                ),
            ],
            ArmCtlError::NoProfileConfigured => vec![
                "Create a profile: armctl profile set <name> --subscription-id <id> --access-token <token>".to_string(),
                "Or set ARMCTL_SUBSCRIPTION_ID and ARMCTL_ACCESS_TOKEN".to_string(),
            ],
            ArmCtlError::MissingCredentials { name } => vec![
                format!("Update the profile token: armctl profile set {} ...", name),
                "Or set ARMCTL_ACCESS_TOKEN".to_string(),
            ],
            ArmCtlError::Credential { .. } => vec![
                "Check the stored secret reference (env:, base64: or keyring:)".to_string(),
            ],
            ArmCtlError::AuthenticationFailed { .. } => vec![
                "The access token may have expired; obtain a new one".to_string(),
                "Check the profile: armctl profile show <profile>".to_string(),
            ],
            ArmCtlError::ConnectionError { .. } => vec![
                "Check network connectivity".to_string(),
                "Verify the management URL: armctl profile show <profile>".to_string(),
            ],
            ArmCtlError::NotFound { .. } => vec![
                "Verify the resource group and resource names".to_string(),
                "Check that you're using the correct profile".to_string(),
            ],
            ArmCtlError::Timeout { .. } => vec![
                "The operation is still running; check it later with the status command".to_string(),
                "Increase --wait-timeout".to_string(),
            ],
            ArmCtlError::InvalidInput { .. } => {
                vec!["Check the command syntax: armctl <command> --help".to_string()]
            }
            ArmCtlError::FileError { path, .. } => vec![
                format!("Check that file exists: {}", path),
                "Verify the file contains a JSON document".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&format!("{}", self));

        if let ArmCtlError::ApiError {
            status: Some(status),
            ..
        } = self
        {
            diag = diag.detail(&format!("HTTP status {}", status));
        }

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion);
        }

        diag.print();
    }
}

impl From<CoreError> for ArmCtlError {
    fn from(err: CoreError) -> Self {
        if err.is_unauthorized() {
            return ArmCtlError::AuthenticationFailed {
                message: err.to_string(),
            };
        }

        match err {
            CoreError::Credential(e) => ArmCtlError::Credential {
                message: e.to_string(),
            },
            CoreError::DuplicateName { .. } => ArmCtlError::Conflict {
                message: err.to_string(),
            },
            CoreError::NotFound { .. } => ArmCtlError::NotFound {
                message: err.to_string(),
            },
            CoreError::Operation { status: 404, .. } => ArmCtlError::NotFound {
                message: err.to_string(),
            },
            CoreError::Operation { status, ref error } => ArmCtlError::ApiError {
                status: Some(status),
                message: error.to_string(),
            },
            CoreError::Transport(ref fault) => ArmCtlError::ApiError {
                status: Some(fault.status),
                message: err.to_string(),
            },
            CoreError::Http(e) => ArmCtlError::ConnectionError {
                message: e.to_string(),
            },
            CoreError::TaskTimeout(duration) => ArmCtlError::Timeout {
                message: format!("Operation timed out after {} seconds", duration.as_secs()),
            },
            CoreError::TaskFailed(message) => ArmCtlError::ApiError {
                status: None,
                message: format!("Operation failed: {}", message),
            },
            CoreError::Validation(message) => ArmCtlError::InvalidInput { message },
            CoreError::Decode(message) => ArmCtlError::ApiError {
                status: None,
                message: format!("Unexpected response: {}", message),
            },
            CoreError::Config(e) => ArmCtlError::from(e),
        }
    }
}

impl From<ConfigError> for ArmCtlError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name } => ArmCtlError::ProfileNotFound { name },
            ConfigError::NoProfiles { .. } => ArmCtlError::NoProfileConfigured,
            other => ArmCtlError::Configuration(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ArmCtlError {
    fn from(err: serde_json::Error) -> Self {
        ArmCtlError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<std::io::Error> for ArmCtlError {
    fn from(err: std::io::Error) -> Self {
        ArmCtlError::OutputError {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<anyhow::Error> for ArmCtlError {
    fn from(err: anyhow::Error) -> Self {
        ArmCtlError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armctl_core::TransportFault;
    use armctl_core::envelope::normalize_fault;
    use std::time::Duration;

    #[test]
    fn test_not_found_envelope_maps_to_not_found() {
        let err: ArmCtlError = normalize_fault(TransportFault::new(
            404,
            r#"{"code": "ResourceNotFound", "message": "gone"}"#,
        ))
        .into();
        assert!(matches!(err, ArmCtlError::NotFound { .. }));
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn test_unauthorized_maps_to_authentication_failed() {
        let err: ArmCtlError = CoreError::from(TransportFault::new(401, "")).into();
        assert!(matches!(err, ArmCtlError::AuthenticationFailed { .. }));
    }

    #[test]
    fn test_operation_error_keeps_code_and_message() {
        let err: ArmCtlError = normalize_fault(TransportFault::new(
            400,
            r#"{"error": {"code": "InvalidParameter", "message": "bad uri"}}"#,
        ))
        .into();
        assert_eq!(err.to_string(), "Code: InvalidParameter, Message: bad uri");
    }

    #[test]
    fn test_duplicate_name_is_conflict() {
        let err: ArmCtlError = CoreError::DuplicateName {
            kind: "NodeType",
            name: "nt1".to_string(),
        }
        .into();
        assert!(matches!(err, ArmCtlError::Conflict { .. }));
    }

    #[test]
    fn test_timeout_suggests_status_command() {
        let err: ArmCtlError = CoreError::TaskTimeout(Duration::from_secs(30)).into();
        assert!(err.to_string().contains("30 seconds"));
        assert!(err.suggestions().iter().any(|s| s.contains("status")));
    }

    #[test]
    fn test_config_errors() {
        let err: ArmCtlError = ConfigError::ProfileNotFound {
            name: "prod".to_string(),
        }
        .into();
        assert!(matches!(err, ArmCtlError::ProfileNotFound { .. }));
    }
}
