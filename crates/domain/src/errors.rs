//! Error types used throughout the SDK

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single schema violation reported by the payload validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted path of the offending field (`"notification.data"`, `"device_tokens[2]"`)
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Coarse grouping of [`PushError`] kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller supplied something the service would reject (bad payload,
    /// unknown platform)
    Caller,
    /// Missing, rejected or previously denied credentials
    Credential,
    /// The service answered with a classified failure (403, 404, 412, 5xx,
    /// unexpected status, malformed body)
    Service,
    /// The request never produced an HTTP response
    Transport,
    /// The client itself is misconfigured
    Config,
}

/// Main error type for the ZeroPush SDK
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PushError {
    #[error("Invalid payload: {message}")]
    InvalidPayload { message: String, violations: Vec<Violation> },

    #[error("Auth token must be set")]
    MissingCredential,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Unknown platform type: {0}")]
    UnknownPlatformType(String),

    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Expected status code {expected} and received {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },

    #[error("Malformed response payload: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PushError {
    /// Build an [`PushError::InvalidPayload`] from a message and violations.
    pub fn invalid_payload(message: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self::InvalidPayload { message: message.into(), violations }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidPayload { .. } | Self::UnknownPlatformType(_) => ErrorCategory::Caller,
            Self::MissingCredential | Self::Unauthorized(_) => ErrorCategory::Credential,
            Self::Forbidden(_)
            | Self::NotFound(_)
            | Self::PreconditionFailed(_)
            | Self::Server { .. }
            | Self::UnexpectedStatus { .. }
            | Self::Decode(_) => ErrorCategory::Service,
            Self::Transport(_) => ErrorCategory::Transport,
            Self::Config(_) => ErrorCategory::Config,
        }
    }

    /// Whether an external caller may reasonably retry the same request.
    ///
    /// The SDK never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Server { .. } | Self::Transport(_))
    }

    /// Violations attached to an [`PushError::InvalidPayload`], empty otherwise.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::InvalidPayload { violations, .. } => violations,
            _ => &[],
        }
    }
}

/// Result type alias for ZeroPush operations
pub type Result<T> = std::result::Result<T, PushError>;
