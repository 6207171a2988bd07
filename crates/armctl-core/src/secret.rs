//! Protected secret values and their decryption
//!
//! A [`SecretString`] holds a secret in its *stored* form (see
//! [`CredentialStore::resolve_secret`](crate::config::CredentialStore::resolve_secret)).
//! The plaintext only exists transiently while a transport request is being
//! built, and neither `Debug` nor `Serialize` ever reveals the stored value.

use crate::config::CredentialStore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

const REDACTED: &str = "<redacted>";

/// A secret field could not be decrypted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to decrypt '{field}': {reason}")]
pub struct CredentialError {
    pub field: String,
    pub reason: String,
}

/// Secret in stored form
#[derive(Clone, PartialEq, Eq, Default)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(stored: impl Into<String>) -> Self {
        Self(stored.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stored representation, for resolvers only
    pub fn expose_stored(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString({})", REDACTED)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretString)
    }
}

/// Turns stored secrets into plaintext
pub trait SecretResolver: Send + Sync {
    fn reveal(&self, field: &str, secret: &SecretString) -> Result<String, CredentialError>;
}

/// Resolver backed by the profile credential store
#[derive(Debug, Clone, Default)]
pub struct StoredSecretResolver {
    store: CredentialStore,
}

impl StoredSecretResolver {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }
}

impl SecretResolver for StoredSecretResolver {
    fn reveal(&self, field: &str, secret: &SecretString) -> Result<String, CredentialError> {
        self.store
            .resolve_secret(secret.expose_stored())
            .map_err(|e| CredentialError {
                field: field.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_serialize_redact() {
        let secret = SecretString::new("hunter2");
        assert!(!format!("{:?}", secret).contains("hunter2"));
        assert_eq!(serde_json::to_string(&secret).unwrap(), "\"<redacted>\"");
    }

    #[test]
    fn test_deserialize_keeps_stored_form() {
        let secret: SecretString = serde_json::from_str("\"base64:aHVudGVyMg==\"").unwrap();
        assert_eq!(secret.expose_stored(), "base64:aHVudGVyMg==");

        let resolver = StoredSecretResolver::new(CredentialStore::plaintext());
        assert_eq!(resolver.reveal("password", &secret).unwrap(), "hunter2");
    }

    #[test]
    fn test_reveal_failure_names_field() {
        let resolver = StoredSecretResolver::new(CredentialStore::plaintext());
        let err = resolver
            .reveal("administratorLoginPassword", &SecretString::new("base64:%%%"))
            .unwrap_err();
        assert_eq!(err.field, "administratorLoginPassword");
        assert!(err.to_string().contains("administratorLoginPassword"));
    }
}
