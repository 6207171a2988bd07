//! Credential storage abstraction with optional keyring support
//!
//! Stored credentials (profile access tokens, administrator passwords passed on
//! the command line or in request files) may be kept in one of several forms:
//!
//! - `keyring:<key>` - looked up in the OS keyring (requires `secure-storage`)
//! - `base64:<data>` - base64-encoded UTF-8
//! - `env:<VAR>` - read from an environment variable at resolution time
//! - anything else is plaintext

use super::error::{ConfigError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::env;

/// Prefix that indicates a value should be retrieved from the keyring
const KEYRING_PREFIX: &str = "keyring:";

/// Prefix for base64-encoded values
const BASE64_PREFIX: &str = "base64:";

/// Prefix for values read from the environment
const ENV_PREFIX: &str = "env:";

/// Service name for keyring entries
#[cfg(feature = "secure-storage")]
const SERVICE_NAME: &str = "armctl";

/// Storage backend for credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStorage {
    /// Store in OS keyring
    #[cfg(feature = "secure-storage")]
    Keyring,
    /// Store as plaintext
    Plaintext,
}

/// Credential store abstraction
#[derive(Debug, Clone)]
pub struct CredentialStore {
    storage: CredentialStorage,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    /// Create a new credential store with automatic backend selection
    pub fn new() -> Self {
        #[cfg(feature = "secure-storage")]
        {
            if Self::is_keyring_available() {
                Self {
                    storage: CredentialStorage::Keyring,
                }
            } else {
                Self {
                    storage: CredentialStorage::Plaintext,
                }
            }
        }
        #[cfg(not(feature = "secure-storage"))]
        {
            Self {
                storage: CredentialStorage::Plaintext,
            }
        }
    }

    /// Create a store that never touches the OS keyring
    pub fn plaintext() -> Self {
        Self {
            storage: CredentialStorage::Plaintext,
        }
    }

    #[cfg(feature = "secure-storage")]
    fn is_keyring_available() -> bool {
        match keyring::Entry::new(SERVICE_NAME, "__test__") {
            Ok(entry) => {
                let _ = entry.get_password();
                true
            }
            Err(_) => false,
        }
    }

    /// Store a credential value, returning the string to persist in the config file
    pub fn store_credential(&self, key: &str, value: &str) -> Result<String> {
        match self.storage {
            #[cfg(feature = "secure-storage")]
            CredentialStorage::Keyring => {
                let entry = keyring::Entry::new(SERVICE_NAME, key)
                    .map_err(|e| ConfigError::KeyringError(e.to_string()))?;
                entry.set_password(value).map_err(|e| {
                    ConfigError::KeyringError(format!(
                        "Failed to store credential in keyring: {}",
                        e
                    ))
                })?;
                Ok(format!("{}{}", KEYRING_PREFIX, key))
            }
            CredentialStorage::Plaintext => {
                let _ = key;
                Ok(value.to_string())
            }
        }
    }

    /// Retrieve a credential value
    ///
    /// Resolution order:
    /// 1. Environment variable (if `env_var` is provided and set)
    /// 2. The stored value, resolved through [`CredentialStore::resolve_secret`]
    pub fn get_credential(&self, value: &str, env_var: Option<&str>) -> Result<String> {
        if let Some(var) = env_var
            && let Ok(env_value) = env::var(var)
        {
            return Ok(env_value);
        }

        self.resolve_secret(value)
    }

    /// Resolve a stored secret into its plaintext form
    pub fn resolve_secret(&self, value: &str) -> Result<String> {
        if let Some(key) = value.strip_prefix(KEYRING_PREFIX) {
            return Self::read_keyring(key);
        }

        if let Some(encoded) = value.strip_prefix(BASE64_PREFIX) {
            let bytes = STANDARD.decode(encoded.trim()).map_err(|e| {
                ConfigError::CredentialError(format!("invalid base64 encoding: {}", e))
            })?;
            return String::from_utf8(bytes).map_err(|_| {
                ConfigError::CredentialError("decoded value is not valid UTF-8".to_string())
            });
        }

        if let Some(var) = value.strip_prefix(ENV_PREFIX) {
            return env::var(var).map_err(|_| {
                ConfigError::CredentialError(format!("environment variable '{}' is not set", var))
            });
        }

        Ok(value.to_string())
    }

    #[cfg(feature = "secure-storage")]
    fn read_keyring(key: &str) -> Result<String> {
        let entry = keyring::Entry::new(SERVICE_NAME, key)
            .map_err(|e| ConfigError::KeyringError(e.to_string()))?;
        entry.get_password().map_err(|e| {
            ConfigError::KeyringError(format!(
                "Failed to retrieve credential '{}' from keyring: {}",
                key, e
            ))
        })
    }

    #[cfg(not(feature = "secure-storage"))]
    fn read_keyring(_key: &str) -> Result<String> {
        Err(ConfigError::CredentialError(
            "Credential references keyring but secure-storage feature is not enabled".to_string(),
        ))
    }

    /// Delete a credential from storage
    pub fn delete_credential(&self, key: &str) -> Result<()> {
        match self.storage {
            #[cfg(feature = "secure-storage")]
            CredentialStorage::Keyring => {
                let entry = keyring::Entry::new(SERVICE_NAME, key)
                    .map_err(|e| ConfigError::KeyringError(e.to_string()))?;
                match entry.delete_credential() {
                    Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                    Err(e) => Err(ConfigError::KeyringError(format!(
                        "Failed to delete credential from keyring: {}",
                        e
                    ))),
                }
            }
            CredentialStorage::Plaintext => {
                let _ = key;
                Ok(())
            }
        }
    }

    /// Check if a value is a keyring reference
    pub fn is_keyring_reference(value: &str) -> bool {
        value.starts_with(KEYRING_PREFIX)
    }

    /// Get the current storage backend
    pub fn storage_backend(&self) -> &str {
        match self.storage {
            #[cfg(feature = "secure-storage")]
            CredentialStorage::Keyring => "keyring",
            CredentialStorage::Plaintext => "plaintext",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_storage() {
        let store = CredentialStore::plaintext();
        let result = store.get_credential("my-token", None).unwrap();
        assert_eq!(result, "my-token");
        assert_eq!(store.storage_backend(), "plaintext");
    }

    #[test]
    #[serial_test::serial]
    fn test_env_var_override() {
        unsafe {
            env::set_var("ARMCTL_TEST_CREDENTIAL", "env-value");
        }

        let store = CredentialStore::plaintext();
        let result = store
            .get_credential("config-value", Some("ARMCTL_TEST_CREDENTIAL"))
            .unwrap();
        assert_eq!(result, "env-value");

        unsafe {
            env::remove_var("ARMCTL_TEST_CREDENTIAL");
        }
    }

    #[test]
    fn test_base64_secret() {
        let store = CredentialStore::plaintext();
        assert_eq!(store.resolve_secret("base64:czNjcjN0").unwrap(), "s3cr3t");
    }

    #[test]
    fn test_invalid_base64_secret() {
        let store = CredentialStore::plaintext();
        let err = store.resolve_secret("base64:!!not-base64!!").unwrap_err();
        assert!(err.to_string().contains("base64"));
    }

    #[test]
    #[serial_test::serial]
    fn test_env_reference_secret() {
        unsafe {
            env::set_var("ARMCTL_TEST_PASSWORD", "from-env");
        }
        let store = CredentialStore::plaintext();
        assert_eq!(
            store.resolve_secret("env:ARMCTL_TEST_PASSWORD").unwrap(),
            "from-env"
        );
        unsafe {
            env::remove_var("ARMCTL_TEST_PASSWORD");
        }
        assert!(store.resolve_secret("env:ARMCTL_TEST_PASSWORD").is_err());
    }

    #[test]
    fn test_keyring_reference_detection() {
        assert!(CredentialStore::is_keyring_reference("keyring:my-key"));
        assert!(!CredentialStore::is_keyring_reference("my-key"));
        assert!(!CredentialStore::is_keyring_reference(""));
    }

    #[cfg(not(feature = "secure-storage"))]
    #[test]
    fn test_keyring_reference_without_feature() {
        let store = CredentialStore::plaintext();
        assert!(store.resolve_secret("keyring:token").is_err());
    }

    #[cfg(feature = "secure-storage")]
    #[test]
    #[ignore = "Requires keyring service to be available"]
    fn test_keyring_storage() {
        let store = CredentialStore::new();

        let key = "test-credential";
        let value = "test-value";
        let reference = store.store_credential(key, value).unwrap();
        assert!(reference.starts_with(KEYRING_PREFIX));

        let retrieved = store.get_credential(&reference, None).unwrap();
        assert_eq!(retrieved, value);

        let _ = store.delete_credential(key);
    }
}
