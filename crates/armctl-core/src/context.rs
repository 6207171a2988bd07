//! Active subscription and credentials shared by every adapter

use crate::config::{ApiVersions, CredentialStore, Profile, ResolvedProfile};
use crate::error::Result;
use crate::secret::{SecretResolver, StoredSecretResolver};
use crate::transport::RestClient;
use std::fmt;
use std::sync::Arc;

/// Read-only context an adapter is constructed from
///
/// Adapters hold it behind an `Arc` and never mutate it.
#[derive(Clone)]
pub struct OperationContext {
    pub subscription_id: String,
    pub management_url: String,
    access_token: Option<String>,
    pub api_versions: ApiVersions,
    resolver: Arc<dyn SecretResolver>,
}

impl fmt::Debug for OperationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationContext")
            .field("subscription_id", &self.subscription_id)
            .field("management_url", &self.management_url)
            .field("authenticated", &self.access_token.is_some())
            .field("api_versions", &self.api_versions)
            .finish()
    }
}

impl OperationContext {
    pub fn new(
        subscription_id: impl Into<String>,
        management_url: impl Into<String>,
        access_token: Option<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            management_url: management_url.into(),
            access_token,
            api_versions: ApiVersions::default(),
            resolver: Arc::new(StoredSecretResolver::default()),
        }
    }

    /// Build a context from a profile after environment and secret resolution
    pub fn from_resolved(
        profile: &Profile,
        resolved: ResolvedProfile,
        store: CredentialStore,
    ) -> Self {
        Self {
            subscription_id: resolved.subscription_id,
            management_url: resolved.management_url,
            access_token: resolved.access_token,
            api_versions: profile.api_versions.clone(),
            resolver: Arc::new(StoredSecretResolver::new(store)),
        }
    }

    #[must_use]
    pub fn with_api_versions(mut self, api_versions: ApiVersions) -> Self {
        self.api_versions = api_versions;
        self
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn SecretResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn resolver(&self) -> &dyn SecretResolver {
        self.resolver.as_ref()
    }

    /// Transport client for this context's endpoint and token
    pub fn rest_client(&self) -> Result<RestClient> {
        RestClient::new(&self.management_url, self.access_token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_token() {
        let context = OperationContext::new(
            "sub-1",
            "https://management.azure.com",
            Some("very-secret-token".to_string()),
        );
        let debug = format!("{:?}", context);
        assert!(debug.contains("sub-1"));
        assert!(!debug.contains("very-secret-token"));
    }

    #[test]
    fn test_from_resolved_uses_profile_api_versions() {
        let mut profile = Profile::new("sub-1");
        profile.api_versions.sql = "2099-01-01".to_string();
        let resolved = ResolvedProfile {
            subscription_id: "sub-override".to_string(),
            management_url: "http://localhost:1234".to_string(),
            access_token: None,
        };

        let context = OperationContext::from_resolved(&profile, resolved, CredentialStore::plaintext());
        assert_eq!(context.subscription_id, "sub-override");
        assert_eq!(context.api_versions.sql, "2099-01-01");
        assert!(context.rest_client().is_ok());
    }
}
