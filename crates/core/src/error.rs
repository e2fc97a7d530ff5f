//! Error types for CropSight.

use thiserror::Error;

/// Result type alias using CropSight's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Subkind of an external vision-service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalServiceKind {
    /// The provider throttled the request (HTTP 429).
    RateLimited,
    /// The provider could not be reached, or was itself unavailable.
    ConnectionFailed,
    /// The provider rejected the request (malformed request, bad credentials).
    RequestRejected,
}

impl std::fmt::Display for ExternalServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate limited"),
            Self::ConnectionFailed => write!(f, "connection failed"),
            Self::RequestRejected => write!(f, "request rejected"),
        }
    }
}

/// Core error type for CropSight.
///
/// Every failed detection request terminates with exactly one of these kinds.
/// The front ends map kinds to their own presentation (status codes, console
/// messages); the core never chooses a status code itself.
#[derive(Error, Debug, Clone)]
pub enum Error {
    // =========================================================================
    // Input Errors (before the external call)
    // =========================================================================
    #[error("Invalid input: {0}")]
    Input(String),

    // =========================================================================
    // External Service Errors (the vision model call)
    // =========================================================================
    #[error("Vision service error ({kind}): {message}")]
    ExternalService {
        kind: ExternalServiceKind,
        message: String,
    },

    // =========================================================================
    // Extraction Errors (no parseable JSON in the model reply)
    // =========================================================================
    #[error("Extraction failed: {0}")]
    Extraction(String),

    // =========================================================================
    // Validation Errors (payload does not conform to the schema)
    // =========================================================================
    #[error("Validation failed at `{field}`: {reason}")]
    Validation { field: String, reason: String },
}

impl Error {
    /// Create an input error.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Create a rate-limited external service error.
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::ExternalService {
            kind: ExternalServiceKind::RateLimited,
            message: msg.into(),
        }
    }

    /// Create a connection-failed external service error.
    pub fn connection_failed(msg: impl Into<String>) -> Self {
        Self::ExternalService {
            kind: ExternalServiceKind::ConnectionFailed,
            message: msg.into(),
        }
    }

    /// Create a request-rejected external service error.
    pub fn request_rejected(msg: impl Into<String>) -> Self {
        Self::ExternalService {
            kind: ExternalServiceKind::RequestRejected,
            message: msg.into(),
        }
    }

    /// Create an extraction error.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a validation error for a specific field path.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
