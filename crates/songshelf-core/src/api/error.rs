use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Message for failures that carry nothing more specific
pub const FALLBACK_MESSAGE: &str = "Operation failed, please try again later";

/// Message for requests that were sent but never answered
pub const NETWORK_MESSAGE: &str = "Network error, please check your connection";

/// Maximum length for error response bodies in log lines
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend answered with a non-success status.
    Rejected,
    /// The backend answered 401; the session has been torn down.
    Unauthorized,
    /// The request went out but no reply arrived.
    Network,
    /// The request could not be built, or its reply could not be read.
    Request,
}

/// The only error shape callers of the gateway ever see.
///
/// `message` is always non-empty and fit to show a user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub status_code: Option<u16>,
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }
}

/// A decoded error response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Text(String),
    Json(Value),
}

impl ResponseBody {
    /// Decode raw bytes: JSON when it parses, text otherwise.
    ///
    /// A JSON string literal counts as text.
    pub fn parse(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return ResponseBody::Empty;
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::String(text)) => ResponseBody::Text(text),
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// Message carried by the body: the text itself, then `message`, then
    /// `error`.
    pub fn message(&self) -> Option<String> {
        match self {
            ResponseBody::Empty => None,
            ResponseBody::Text(text) if text.is_empty() => None,
            ResponseBody::Text(text) => Some(text.clone()),
            ResponseBody::Json(value) => {
                field_message(value, "message").or_else(|| field_message(value, "error"))
            }
        }
    }

    /// Body text for log lines, cut to a bounded length.
    pub fn truncated(&self) -> String {
        let body = match self {
            ResponseBody::Empty => return String::new(),
            ResponseBody::Text(text) => text.clone(),
            ResponseBody::Json(value) => value.to_string(),
        };
        truncate_body(&body)
    }
}

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

// Empty strings, null, false and zero do not count as a message
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn field_message(body: &Value, field: &str) -> Option<String> {
    let value = body.get(field).filter(|v| is_truthy(v))?;
    Some(match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// A failed call as the gateway observed it, before normalization.
///
/// Error handlers receive this raw form.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// The backend replied with a non-success status.
    Response { status: StatusCode, body: ResponseBody },
    /// The request was sent but no reply arrived.
    NoResponse { reason: String },
    /// The request never went out, or the reply could not be decoded.
    Request { reason: String },
}

impl Failure {
    pub(crate) fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_builder() {
            Failure::Request {
                reason: error.to_string(),
            }
        } else {
            Failure::NoResponse {
                reason: error.to_string(),
            }
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Failure::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Produce the single `ApiError` for this failure.
    pub fn normalize(&self) -> ApiError {
        match self {
            Failure::Response { status, body } => ApiError {
                kind: if *status == StatusCode::UNAUTHORIZED {
                    ErrorKind::Unauthorized
                } else {
                    ErrorKind::Rejected
                },
                message: body.message().unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
                status_code: Some(status.as_u16()),
            },
            Failure::NoResponse { .. } => ApiError {
                kind: ErrorKind::Network,
                message: NETWORK_MESSAGE.to_string(),
                status_code: None,
            },
            Failure::Request { .. } => ApiError {
                kind: ErrorKind::Request,
                message: FALLBACK_MESSAGE.to_string(),
                status_code: None,
            },
        }
    }
}
