//! Long-running operation tracking
//!
//! A submission returns an [`OperationHandle`] (an opaque status link) and an
//! initial [`OperationState`]. Results are overlaid onto a copy of the
//! caller's model with [`overlay`]; status queries produce a [`StatusModel`].

use crate::error::{CoreError, Result};
use crate::transport::RawResponse;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Opaque link used to query the status of a submitted operation
///
/// Unrelated to the id of the resource the operation acts on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationHandle(String);

impl OperationHandle {
    pub fn new(link: impl Into<String>) -> Self {
        Self(link.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Closed set of operation states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationState {
    Pending,
    InProgress,
    Succeeded,
    Failed,
}

impl OperationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationState::Pending => "Pending",
            OperationState::InProgress => "InProgress",
            OperationState::Succeeded => "Succeeded",
            OperationState::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationState::Succeeded | OperationState::Failed)
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationState {
    type Err = CoreError;

    /// Case-insensitive; accepts the spellings used by the various providers
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "pending" | "queued" | "notstarted" | "accepted" => Ok(OperationState::Pending),
            "inprogress" | "running" | "processing" | "updating" | "creating" | "deleting" => {
                Ok(OperationState::InProgress)
            }
            "succeeded" | "completed" | "complete" | "success" => Ok(OperationState::Succeeded),
            "failed" | "error" | "cancelled" | "canceled" => Ok(OperationState::Failed),
            _ => Err(CoreError::Decode(format!("unknown operation status '{}'", s))),
        }
    }
}

impl Serialize for OperationState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OperationState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Operation fields carried on every user-facing model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationTracking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_status_link: Option<OperationHandle>,
}

/// What a submission call reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub status: OperationState,
    pub error_message: Option<String>,
    pub handle: Option<OperationHandle>,
}

impl SubmissionOutcome {
    /// Interpret a 2xx submission response
    ///
    /// The handle comes from `Azure-AsyncOperation`, then `Location`, then the
    /// body's `operationStatusLink`. The status comes from the body's `status`
    /// when present, otherwise from the HTTP status (202 means accepted and
    /// still running).
    pub fn from_response(response: &RawResponse) -> Result<Self> {
        let body = response.json_or_null()?;
        let properties = properties_of(&body);

        let handle = response
            .header("azure-asyncoperation")
            .or_else(|| response.header("location"))
            .map(str::to_string)
            .or_else(|| string_field(properties, "operationStatusLink"))
            .map(OperationHandle::new);

        let status = match string_field(properties, "status") {
            Some(raw) => raw.parse()?,
            None if response.status == 202 => OperationState::InProgress,
            None => OperationState::Succeeded,
        };

        Ok(Self {
            status,
            error_message: string_field(properties, "errorMessage"),
            handle,
        })
    }
}

/// Models that carry operation tracking fields
pub trait Tracked: Clone {
    fn tracking(&self) -> &OperationTracking;
    fn tracking_mut(&mut self) -> &mut OperationTracking;
}

/// Copy `original` and overlay the submission outcome onto the copy
///
/// Status, error message and status link are replaced; every other field is
/// preserved. `original` itself is never modified.
#[must_use]
pub fn overlay<M: Tracked>(original: &M, outcome: &SubmissionOutcome) -> M {
    let mut model = original.clone();
    let tracking = model.tracking_mut();
    tracking.status = Some(outcome.status.to_string());
    tracking.error_message = outcome.error_message.clone();
    if outcome.handle.is_some() {
        tracking.operation_status_link = outcome.handle.clone();
    }
    model
}

/// Status of an operation as returned by a poll
///
/// Timestamps are kept as the service sent them; the legacy import/export
/// endpoint does not use RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: OperationState,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub queued_time: Option<String>,
    #[serde(default)]
    pub last_modified_time: Option<String>,
}

impl StatusResponse {
    /// Decode a poll body
    ///
    /// Accepts both the classic shape (fields under `properties`) and the
    /// async-operation shape (`status`, `error`, `startTime`, `endTime`).
    /// A body without `status` (a `Location` poll answers 202 with no body
    /// while running) takes its state from the HTTP status.
    pub fn from_response(response: &RawResponse) -> Result<Self> {
        let body = response.json_or_null()?;
        let properties = properties_of(&body);

        let status = match string_field(properties, "status") {
            Some(raw) => raw.parse()?,
            None if response.status == 202 => OperationState::InProgress,
            None => OperationState::Succeeded,
        };

        let error_message = string_field(properties, "errorMessage").or_else(|| {
            body.get("error")
                .and_then(|error| string_field(error, "message"))
        });

        Ok(Self {
            status,
            status_message: string_field(properties, "statusMessage"),
            error_message,
            queued_time: string_field(properties, "queuedTime")
                .or_else(|| string_field(&body, "startTime")),
            last_modified_time: string_field(properties, "lastModifiedTime")
                .or_else(|| string_field(&body, "endTime")),
        })
    }
}

/// User-facing status of an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusModel {
    pub operation_status_link: OperationHandle,
    pub status: String,
    #[serde(skip)]
    pub state: OperationState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queued_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<String>,
}

impl StatusModel {
    /// Map a poll response, echoing back the handle it was fetched with
    pub fn from_response(handle: &OperationHandle, response: StatusResponse) -> Self {
        Self {
            operation_status_link: handle.clone(),
            status: response.status.to_string(),
            state: response.status,
            status_message: response.status_message,
            error_message: response.error_message,
            queued_time: response.queued_time,
            last_modified_time: response.last_modified_time,
        }
    }
}

fn properties_of(body: &Value) -> &Value {
    match body.get("properties") {
        Some(properties) if properties.is_object() => properties,
        _ => body,
    }
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_string)
}
