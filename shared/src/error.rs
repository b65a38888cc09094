//! Every failure the client surfaces is one human-readable string.
//!
//! Precedence for a failed response: the `Application-Error` header, then a
//! field-keyed validation body, then [`GENERIC_SERVER_ERROR`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::capabilities::{ApiResponse, RequestError, TransportError};

pub const APPLICATION_ERROR_HEADER: &str = "Application-Error";
pub const GENERIC_SERVER_ERROR: &str = "Server error";

/// A normalized failure, ready to show to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn server_error() -> Self {
        Self::new(GENERIC_SERVER_ERROR)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}

/// The request was never sent, so its own description is the message.
impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        Self::new(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Normalizes a non-success response using the default header name.
pub fn normalize_response(response: &ApiResponse) -> ApiError {
    normalize_response_with(response, APPLICATION_ERROR_HEADER)
}

pub fn normalize_response_with(response: &ApiResponse, error_header: &str) -> ApiError {
    if let Some(message) = response.header(error_header).filter(|m| !m.is_empty()) {
        return ApiError::new(message);
    }

    match model_state_errors(response.body()) {
        Some(message) => ApiError::new(message),
        None => ApiError::server_error(),
    }
}

/// No response arrived, so there is nothing to read but the generic message.
pub fn normalize_transport_error(err: &TransportError) -> ApiError {
    warn!("request failed without a response: {err}");
    ApiError::server_error()
}

/// A success response whose body is not what the call expects.
pub fn normalize_decode_error(err: &serde_json::Error) -> ApiError {
    warn!("unreadable response body: {err}");
    ApiError::server_error()
}

/// Flattens a `{ field: [messages] }` body into one line per field, in the
/// order the server sent the fields. Returns `None` when nothing usable is there.
fn model_state_errors(body: &[u8]) -> Option<String> {
    let map = match serde_json::from_slice::<serde_json::Value>(body).ok()? {
        serde_json::Value::Object(map) => map,
        _ => return None,
    };

    let mut out = String::new();
    for value in map.values() {
        if let Some(text) = field_message(value) {
            out.push_str(&text);
            out.push('\n');
        }
    }

    (!out.is_empty()).then_some(out)
}

/// Text for one field, or `None` when the field carries nothing to report
/// (null, false, zero, empty string).
fn field_message(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".into()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}
