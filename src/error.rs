//! Processing error taxonomy with HTTP status code mapping.
//!
//! [`ProcessingError`] is the central error type of the per-message
//! pipeline. Every variant belongs to exactly one [`ErrorKind`], which the
//! batch dispatcher logs and counts. When a single message is processed
//! through the REST surface, the error maps to an HTTP status code and the
//! structured JSON error body below.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1002,
///     "message": "survey 'customerId' is required",
///     "details": "validation"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see [`ProcessingError::error_code`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Error category, plus the provider error code for external failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Tagged category of a [`ProcessingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The message body was not a decodable survey record.
    MalformedInput,
    /// A required field was missing or empty.
    Validation,
    /// The classifier or the store rejected the call.
    ExternalService,
    /// Anything else.
    Unexpected,
}

impl ErrorKind {
    /// Returns the category as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedInput => "malformed_input",
            Self::Validation => "validation",
            Self::ExternalService => "external_service",
            Self::Unexpected => "unexpected",
        }
    }

    /// Returns `true` if redelivering the message may succeed.
    ///
    /// Malformed and invalid messages are terminal: they fail the same way
    /// on every delivery.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService | Self::Unexpected)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External collaborator that produced an [`ProcessingError::ExternalService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalService {
    /// The sentiment classification service.
    Classifier,
    /// The durable survey store.
    Store,
}

impl fmt::Display for ExternalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classifier => f.write_str("classifier"),
            Self::Store => f.write_str("store"),
        }
    }
}

/// Error raised while processing one survey message.
///
/// # Error Code Ranges
///
/// | Code | Category         | HTTP Status               |
/// |------|------------------|---------------------------|
/// | 1001 | Malformed input  | 400 Bad Request           |
/// | 1002 | Validation       | 400 Bad Request           |
/// | 3000 | Unexpected       | 500 Internal Server Error |
/// | 5001 | Classifier       | 502 Bad Gateway           |
/// | 5002 | Store            | 502 Bad Gateway           |
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    /// The body could not be decoded as a survey record.
    #[error("malformed message body: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// A required field is missing or empty.
    #[error("{message}")]
    Validation {
        /// Name of the offending field, as it appears on the wire.
        field: &'static str,
        /// Human-readable description.
        message: String,
    },

    /// The classifier or the store failed.
    #[error("{service} error ({}): {message}", .code.as_deref().unwrap_or("Unknown"))]
    ExternalService {
        /// Which collaborator failed.
        service: ExternalService,
        /// Provider-assigned error code, when the provider supplied one.
        code: Option<String>,
        /// Provider or transport error message.
        message: String,
    },

    /// Any other failure.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ProcessingError {
    /// Builds a validation error for a required field.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::Validation {
            field,
            message: format!("survey '{field}' is required"),
        }
    }

    /// Builds a validation error for a field that is present but blank.
    #[must_use]
    pub fn empty_field(field: &'static str) -> Self {
        Self::Validation {
            field,
            message: format!("survey '{field}' is required and cannot be empty"),
        }
    }

    /// Builds a validation error for a field containing a NUL character,
    /// which the store cannot hold.
    #[must_use]
    pub fn nul_in_field(field: &'static str) -> Self {
        Self::Validation {
            field,
            message: format!("survey '{field}' must not contain NUL characters"),
        }
    }

    /// Builds an external-service error.
    #[must_use]
    pub fn external(
        service: ExternalService,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ExternalService {
            service,
            code,
            message: message.into(),
        }
    }

    /// Returns the tagged category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::ExternalService { .. } => ErrorKind::ExternalService,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Returns the provider error code of an external-service error.
    #[must_use]
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            Self::ExternalService { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::MalformedInput(_) => 1001,
            Self::Validation { .. } => 1002,
            Self::Unexpected(_) => 3000,
            Self::ExternalService {
                service: ExternalService::Classifier,
                ..
            } => 5001,
            Self::ExternalService {
                service: ExternalService::Store,
                ..
            } => 5002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedInput(_) | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::ExternalService { .. } => StatusCode::BAD_GATEWAY,
            Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProcessingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = match self.provider_code() {
            Some(code) => format!("{}: {code}", self.kind()),
            None => self.kind().to_string(),
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: Some(details),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

/// Startup configuration error. Any of these aborts the process.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    /// An environment variable is set but cannot be used.
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// Environment variable name.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
