//! # Error Handling
//!
//! Two layers:
//! - [`FilterError`] is returned by every fallible operation of the library:
//!   statement construction, compilation, SQL translation and query parsing.
//!   Nothing is retried or partially applied; the error propagates to the caller.
//! - [`ApiError`] is the HTTP face of the handlers in [`crate::routes`]: 400
//!   for filters that cannot be read or compiled, 422 for statements that are
//!   malformed or do not fit their member.
//!
//! ## Logging
//!
//! Rejected requests are logged at debug level using the `tracing` crate. To
//! enable logging, set up tracing in your application:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt()
//!     .with_target(false)
//!     .compact()
//!     .init();
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::filtering::Operation;

/// Errors raised while building or compiling a filter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    /// A required argument was empty or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not allowed for the property's declared type.
    #[error("operation {operation} is not valid for {property_type} properties")]
    InvalidOperation {
        operation: Operation,
        property_type: String,
    },

    /// Array-typed statements only support membership operations.
    #[error("array properties only support Contains and In, got {operation}")]
    InvalidArrayUsage { operation: Operation },

    /// The operation needs more operands than were supplied.
    #[error("operation {operation} requires {expected} non-null value(s)")]
    MissingValue {
        operation: Operation,
        expected: usize,
    },

    /// A path segment does not name a member of the record.
    #[error("member '{segment}' does not exist (path '{path}')")]
    UnknownMember { path: String, segment: String },

    /// A path tried to traverse through a member that is not a record.
    #[error("member '{segment}' in path '{path}' is not a record")]
    NotARecord { path: String, segment: String },

    /// An indexer (`name[member]`) was applied to something other than a
    /// collection of records.
    #[error("member '{path}' is not a collection of records")]
    NotACollection { path: String },

    /// An operand cannot be compared with the member it targets.
    #[error("member '{property}' expects a {expected} value, got {found}")]
    TypeMismatch {
        property: String,
        expected: String,
        found: String,
    },

    /// A configured limit was exceeded.
    #[error("{limit} limit exceeded ({value} > {max})")]
    LimitExceeded {
        limit: &'static str,
        value: usize,
        max: usize,
    },

    /// The serialized filter could not be read.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// The filter is valid but cannot be expressed by the requested target.
    #[error("unsupported filter: {0}")]
    Unsupported(String),
}

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - Invalid input from user
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 422 Unprocessable Entity - Validation failed
    ValidationFailed {
        /// User-facing validation errors
        errors: Vec<String>,
    },
}

impl ApiError {
    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 422 Validation Failed error
    #[must_use]
    pub fn validation_failed(errors: Vec<String>) -> Self {
        Self::ValidationFailed { errors }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::BadRequest { message } => message.clone(),
            Self::ValidationFailed { errors } => {
                if errors.len() == 1 {
                    errors[0].clone()
                } else {
                    format!("Validation failed: {}", errors.join(", "))
                }
            }
        }
    }

    fn log(&self) {
        tracing::debug!(
            error = %self.user_message(),
            status = %self.status_code(),
            "API error"
        );
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let response = match &self {
            Self::ValidationFailed { errors } => ErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(errors.clone()),
            },
            Self::BadRequest { .. } => ErrorResponse {
                error: self.user_message(),
                details: None,
            },
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

/// Every filter error is the caller's fault: a bad path, a bad operand or a
/// malformed criteria payload.
impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        Self::bad_request(err.to_string())
    }
}
