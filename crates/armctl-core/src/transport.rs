//! HTTP transport for resource-manager REST calls
//!
//! [`RestClient`] issues exactly one request per call and never retries.
//! Non-success responses come back as [`TransportFault`] carrying the raw
//! status and body; interpreting the body is left to the adapters.

use crate::error::{CoreError, Result};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, trace};
use url::Url;

/// User agent string for armctl HTTP requests
const ARMCTL_USER_AGENT: &str = concat!("armctl/", env!("CARGO_PKG_VERSION"));

/// Maximum length of a response body written to logs or error messages
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Truncate a body for logging, cutting on a char boundary
fn truncate_for_log(body: &str) -> String {
    if body.len() <= MAX_LOG_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_LOG_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [{} bytes total]", &body[..end], body.len())
}

/// Raw service fault: a non-success HTTP status and its body
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("HTTP {status}: {}", truncate_for_log(.body))]
pub struct TransportFault {
    pub status: u16,
    pub body: String,
}

impl TransportFault {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A successful response, before any decoding
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    /// Header value as a string, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            CoreError::Decode(format!(
                "{} (body: {})",
                e,
                truncate_for_log(&self.body)
            ))
        })
    }

    /// Decode the body as JSON, treating an empty body as `null`
    pub fn json_or_null(&self) -> Result<serde_json::Value> {
        if self.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        self.json()
    }
}

/// Authenticated JSON client rooted at a management endpoint
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl RestClient {
    /// Create a client for `base_url`, sending `token` as a bearer credential
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CoreError::Validation(format!("invalid management URL '{}': {}", base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(ARMCTL_USER_AGENT));

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an absolute URL for a resource path with an `api-version` query
    ///
    /// `segments` are percent-encoded individually, so resource names may
    /// contain characters that are not valid in a path.
    pub fn resource_url(&self, segments: &[&str], api_version: &str) -> Result<Url> {
        let mut path = self.base_url.path().trim_end_matches('/').to_string();
        for segment in segments {
            path.push('/');
            path.push_str(&urlencoding::encode(segment));
        }

        let mut url = self.base_url.clone();
        url.set_path(&path);
        url.query_pairs_mut()
            .clear()
            .append_pair("api-version", api_version);
        Ok(url)
    }

    /// GET a URL
    pub async fn get(&self, url: Url) -> Result<RawResponse> {
        self.send::<()>(Method::GET, url, None).await
    }

    /// POST a JSON body
    pub async fn post<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<RawResponse> {
        self.send(Method::POST, url, Some(body)).await
    }

    /// PUT a JSON body
    pub async fn put<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<RawResponse> {
        self.send(Method::PUT, url, Some(body)).await
    }

    /// Issue one request; non-2xx statuses become [`TransportFault`]
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<RawResponse> {
        debug!("{} {}", method, url);

        let mut request = self.http.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        trace!("HTTP {} - {}", status, truncate_for_log(&body));

        if !(200..300).contains(&status) {
            debug!("Service fault: HTTP {}", status);
            return Err(TransportFault::new(status, body).into());
        }

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
