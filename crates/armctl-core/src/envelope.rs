//! Decoding of service error envelopes
//!
//! Management endpoints are not consistent about how they wrap errors. A
//! fault body is matched against an ordered list of known shapes and the
//! first that parses wins; if none does, the fault is left untouched.
//!
//! ```text
//! Nested   {"error": {"<any key>": {"code": "X", "message": "Y"}}}
//! Wrapped  {"error": {"code": "X", "message": "Y"}}
//! Flat     {"code": "X", "message": "Y"}
//! ```

use crate::error::CoreError;
use crate::transport::TransportFault;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Normalized service error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Code: {code}, Message: {message}")]
pub struct OperationError {
    pub code: String,
    pub message: String,
}

/// An error detail as sent by the service
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl From<ErrorDetail> for OperationError {
    fn from(detail: ErrorDetail) -> Self {
        Self {
            code: detail.code,
            message: detail.message,
        }
    }
}

/// Envelope shapes in the order they are attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorShape {
    Nested,
    Wrapped,
    Flat,
}

impl ErrorShape {
    pub const ORDER: [ErrorShape; 3] = [ErrorShape::Nested, ErrorShape::Wrapped, ErrorShape::Flat];

    fn decode(self, body: &Map<String, Value>) -> Option<ErrorDetail> {
        match self {
            // First entry in document order; no tie-break between several
            ErrorShape::Nested => {
                let entries = body.get("error")?.as_object()?;
                let (_, first) = entries.iter().next()?;
                detail_from(first)
            }
            ErrorShape::Wrapped => detail_from(body.get("error")?),
            ErrorShape::Flat => detail_from(&Value::Object(body.clone())),
        }
    }
}

fn detail_from(value: &Value) -> Option<ErrorDetail> {
    if !value.is_object() {
        return None;
    }
    ErrorDetail::deserialize(value).ok()
}

/// Result of matching a fault body against the known shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedFault {
    Recognized { shape: ErrorShape, error: OperationError },
    Unparsed,
}

/// Match a fault body against every known envelope shape
pub fn decode_body(body: &str) -> DecodedFault {
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return DecodedFault::Unparsed;
    };

    ErrorShape::ORDER
        .iter()
        .find_map(|shape| {
            shape.decode(&map).map(|detail| DecodedFault::Recognized {
                shape: *shape,
                error: detail.into(),
            })
        })
        .unwrap_or(DecodedFault::Unparsed)
}

/// Normalize a transport fault into an [`OperationError`] where possible
pub fn normalize_fault(fault: TransportFault) -> CoreError {
    match decode_body(&fault.body) {
        DecodedFault::Recognized { shape, error } => {
            tracing::debug!("Decoded {:?} error envelope (HTTP {})", shape, fault.status);
            CoreError::Operation {
                status: fault.status,
                error,
            }
        }
        DecodedFault::Unparsed => CoreError::Transport(fault),
    }
}

/// Apply [`normalize_fault`] to transport faults, passing other errors through
pub fn normalize_error(err: CoreError) -> CoreError {
    match err {
        CoreError::Transport(fault) => normalize_fault(fault),
        other => other,
    }
}
