//! Redirect configurations of an application gateway
//!
//! These edit a gateway document in memory. Nothing is sent; the caller
//! persists the returned gateway however it likes.

use crate::error::{CoreError, Result};
use crate::mutation::{NamedChild, RemovePolicy, add_named_child, find_named_child, remove_named_child};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// HTTP status used by a redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedirectType {
    Permanent,
    Found,
    SeeOther,
    Temporary,
}

impl fmt::Display for RedirectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RedirectType::Permanent => "Permanent",
            RedirectType::Found => "Found",
            RedirectType::SeeOther => "SeeOther",
            RedirectType::Temporary => "Temporary",
        };
        f.write_str(name)
    }
}

impl FromStr for RedirectType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "permanent" => Ok(RedirectType::Permanent),
            "found" => Ok(RedirectType::Found),
            "seeother" => Ok(RedirectType::SeeOther),
            "temporary" => Ok(RedirectType::Temporary),
            _ => Err(format!("unknown redirect type '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubResource {
    pub id: String,
}

/// One redirect configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectConfiguration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub redirect_type: RedirectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_listener: Option<SubResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    #[serde(default)]
    pub include_path: bool,
    #[serde(default)]
    pub include_query_string: bool,
    /// Properties this crate does not model (etag, routing rules, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NamedChild for RedirectConfiguration {
    const KIND: &'static str = "RedirectConfiguration";

    fn name(&self) -> &str {
        &self.name
    }
}

impl RedirectConfiguration {
    /// Redirect to another listener of the same gateway
    pub fn to_listener(
        name: impl Into<String>,
        redirect_type: RedirectType,
        listener_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: None,
            redirect_type,
            target_listener: Some(SubResource {
                id: listener_id.into(),
            }),
            target_url: None,
            include_path: false,
            include_query_string: false,
            extra: Map::new(),
        }
    }

    /// Redirect to an external URL
    pub fn to_url(
        name: impl Into<String>,
        redirect_type: RedirectType,
        target_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: None,
            redirect_type,
            target_listener: None,
            target_url: Some(target_url.into()),
            include_path: false,
            include_query_string: false,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn including(mut self, include_path: bool, include_query_string: bool) -> Self {
        self.include_path = include_path;
        self.include_query_string = include_query_string;
        self
    }

    /// Exactly one of target listener and target URL must be set
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "redirect configuration name must not be empty".to_string(),
            ));
        }
        match (&self.target_listener, &self.target_url) {
            (Some(_), Some(_)) => Err(CoreError::Validation(format!(
                "redirect configuration '{}' cannot have both a target listener and a target URL",
                self.name
            ))),
            (None, None) => Err(CoreError::Validation(format!(
                "redirect configuration '{}' needs a target listener or a target URL",
                self.name
            ))),
            _ => Ok(()),
        }
    }
}

/// Application gateway document
///
/// Properties this tool does not manage are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationGateway {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub redirect_configurations: Vec<RedirectConfiguration>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApplicationGateway {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            redirect_configurations: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Return a copy of `gateway` with `config` appended
///
/// Fails with a duplicate-name error if a configuration with the same name
/// (ignoring case) exists.
pub fn add_redirect_configuration(
    gateway: &ApplicationGateway,
    mut config: RedirectConfiguration,
) -> Result<ApplicationGateway> {
    config.validate()?;
    if config.id.is_none()
        && let Some(gateway_id) = &gateway.id
    {
        config.id = Some(format!("{}/redirectConfigurations/{}", gateway_id, config.name));
    }

    let mut updated = gateway.clone();
    add_named_child(&mut updated.redirect_configurations, config)?;
    debug!(
        "Gateway {} now has {} redirect configurations",
        updated.name,
        updated.redirect_configurations.len()
    );
    Ok(updated)
}

/// Return a copy of `gateway` without the configuration called `name`
///
/// Removing a name that is not present leaves the gateway as it was.
pub fn remove_redirect_configuration(
    gateway: &ApplicationGateway,
    name: &str,
) -> Result<ApplicationGateway> {
    let mut updated = gateway.clone();
    if remove_named_child(&mut updated.redirect_configurations, name, RemovePolicy::LENIENT)?
        .is_none()
    {
        debug!("No redirect configuration named '{}' on {}", name, gateway.name);
    }
    Ok(updated)
}

/// Look up a configuration by name, ignoring case
pub fn get_redirect_configuration<'a>(
    gateway: &'a ApplicationGateway,
    name: &str,
) -> Result<&'a RedirectConfiguration> {
    find_named_child(&gateway.redirect_configurations, name)
        .map(|index| &gateway.redirect_configurations[index])
        .ok_or_else(|| CoreError::NotFound {
            kind: RedirectConfiguration::KIND,
            name: name.to_string(),
        })
}
