// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! Inside the API layer every failure is an `AppError`; at the single-page
//! boundary it is flattened into the message of a `PageResult`.

use std::fmt;
use thiserror::Error;

/// Remote error codes as a typed vocabulary.
///
/// The web API reports failures as `{"success": false, "code": <int>, "msg": ...}`.
/// Only the codes that change how a caller should react get their own variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCode {
    /// The session cookies are no longer accepted (`-100`).
    SessionExpired,
    /// The platform's risk control rejected the request (`300011..=300013`).
    RiskControl(i64),
    /// Any other numeric code.
    Other(i64),
    /// The response carried no usable `code` field.
    Unknown,
}

impl RemoteCode {
    /// Classifies the raw `code` field of a failed response.
    pub fn from_api_response(code: Option<i64>) -> Self {
        match code {
            Some(-100) => Self::SessionExpired,
            Some(code @ 300011..=300013) => Self::RiskControl(code),
            Some(code) => Self::Other(code),
            None => Self::Unknown,
        }
    }

    /// Whether the cookies need to be refreshed before anything else works.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Whether the platform flagged the traffic (slow down or switch proxy).
    pub fn is_risk_control(&self) -> bool {
        matches!(self, Self::RiskControl(_))
    }
}

impl fmt::Display for RemoteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionExpired => write!(f, "session_expired"),
            Self::RiskControl(code) => write!(f, "risk_control_{}", code),
            Self::Other(code) => write!(f, "{}", code),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    /// Displays the remote message verbatim so it can be handed to callers unchanged.
    #[error("{message}")]
    Remote { code: RemoteCode, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request signing failed: {0}")]
    Signing(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Harvest incomplete: {0}")]
    Incomplete(String),

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl AppError {
    /// The remote error code, when the failure was reported by the platform itself.
    pub fn remote_code(&self) -> Option<&RemoteCode> {
        match self {
            Self::Remote { code, .. } => Some(code),
            _ => None,
        }
    }
}

// Allow converting from anyhow::Error, preserving the message
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: err.to_string(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
