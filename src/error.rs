//! Error types for routing and chain execution
//!
//! # Error Codes
//!
//! Error codes are represented by the [`RouteErrorCode`] enum, which provides
//! exhaustive variants for the failure modes the router itself can report and
//! for handler-originated failures. When serialized, codes are converted to
//! SCREAMING_SNAKE_CASE strings for wire compatibility.
//!
//! # Example
//! ```rust,ignore
//! use waypoint::{RouteError, RouteErrorCode};
//!
//! let error = RouteError::new(RouteErrorCode::NotFound, "no such resource");
//! let error = RouteError::not_found("no such resource"); // Convenience method
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Type-safe error codes for routing operations.
///
/// These codes categorize errors into client errors (similar to HTTP 4xx),
/// server errors (similar to HTTP 5xx), and chain-execution errors.
///
/// When serialized to JSON, codes are converted to SCREAMING_SNAKE_CASE
/// (e.g., `NotFound` becomes `"NOT_FOUND"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteErrorCode {
    // Client errors (4xx equivalent)
    /// The request was malformed or invalid
    BadRequest,
    /// No terminal route matched the request
    NotFound,

    // Server errors (5xx equivalent)
    /// An unexpected internal error occurred
    InternalError,

    // Chain-execution errors
    /// A handler in the chain failed
    HandlerError,
    /// A continuation was invoked past the end of its chain
    ChainExhausted,
}

impl RouteErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::HandlerError => "HANDLER_ERROR",
            Self::ChainExhausted => "CHAIN_EXHAUSTED",
        }
    }

    /// Returns true if this is a client error (4xx equivalent).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::BadRequest | Self::NotFound)
    }

    /// Returns true if this is a server error (5xx equivalent).
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::InternalError | Self::HandlerError | Self::ChainExhausted
        )
    }
}

impl fmt::Display for RouteErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Routing error with type-safe code and message.
///
/// This struct represents errors surfaced by the router core and by handlers
/// running inside a chain. It uses [`RouteErrorCode`] for type-safe
/// categorization. The chain executor propagates these values by identity —
/// an error raised in a handler reaches the caller of the chain unwrapped.
///
/// # Example
/// ```rust,ignore
/// use waypoint::{RouteError, RouteErrorCode};
///
/// // Create with code and message
/// let error = RouteError::new(RouteErrorCode::HandlerError, "upstream refused");
///
/// // Add optional details
/// let error = error.with_details(serde_json::json!({"upstream": "billing"}));
///
/// // Add cause for debugging
/// let error = error.with_cause("connection reset by peer");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("[{code}] {message}")]
pub struct RouteError {
    /// Type-safe error code
    pub code: RouteErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (JSON value)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Optional cause for debugging (not exposed to clients in production)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl RouteError {
    /// Create a new error with code and message.
    pub fn new(code: RouteErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            cause: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: impl Serialize) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }

    /// Add a cause string for debugging.
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Sanitize error for client response (removes internal details for server errors).
    pub fn sanitize(mut self) -> Self {
        if matches!(self.code, RouteErrorCode::InternalError) {
            self.message = "An internal error occurred".to_string();
            self.details = None;
            self.cause = None;
        }
        self
    }

    // Convenience constructors

    /// Create a NOT_FOUND error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(RouteErrorCode::NotFound, message)
    }

    /// Create a BAD_REQUEST error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(RouteErrorCode::BadRequest, message)
    }

    /// Create an INTERNAL_ERROR error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(RouteErrorCode::InternalError, message)
    }

    /// Create a HANDLER_ERROR error.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::new(RouteErrorCode::HandlerError, message)
    }

    /// Create a CHAIN_EXHAUSTED error.
    pub fn chain_exhausted() -> Self {
        Self::new(
            RouteErrorCode::ChainExhausted,
            "continuation invoked past the end of the handler chain",
        )
    }
}

/// Result type alias for routing operations.
pub type RouteResult<T> = Result<T, RouteError>;
