// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types.
//!
//! Per-request validation never returns these to the client. They exist for
//! the codec and the external stores, and for fallible construction at
//! startup. [`ApiError`] is the only type that reaches an HTTP response, and
//! only from the downstream authorization helpers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for construction and store operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Result type alias for codec operations.
pub type TokenResult<T> = Result<T, TokenError>;

/// Result type alias for external store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for HTTP-facing operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// TokenError
// =============================================================================

/// Failures of the claims codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token is not a well-formed signed token.
    #[error("Malformed token: {reason}")]
    Malformed {
        /// What was wrong with it.
        reason: String,
    },

    /// The signature does not match the header and payload.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// The token verified but its expiry is in the past.
    #[error("Token expired at {expired_at}")]
    Expired {
        /// Embedded expiry (Unix seconds).
        expired_at: i64,
    },

    /// The claims could not be signed.
    #[error("Failed to encode token: {reason}")]
    Encoding {
        /// Underlying failure.
        reason: String,
    },
}

impl TokenError {
    /// Creates a malformed-token error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// Creates an encoding error.
    pub fn encoding(reason: impl Into<String>) -> Self {
        Self::Encoding {
            reason: reason.into(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::malformed(err.to_string()),
        }
    }
}

// =============================================================================
// StoreError
// =============================================================================

/// Failures of an external collaborator (identity store, revocation ledger).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// The store answered with an error.
    #[error("Store error: {message}")]
    Backend {
        /// Error message.
        message: String,
    },
}

impl StoreError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

// =============================================================================
// AuthError
// =============================================================================

/// Errors raised while building the authentication core.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The signing key is missing or unusable. Fatal at startup.
    #[error("Signing key misconfigured: {message}")]
    KeyMisconfigured {
        /// Error message.
        message: String,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration for '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Error message.
        message: String,
    },

    /// Codec failure.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// External store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Creates a key misconfiguration error.
    pub fn key_misconfigured(message: impl Into<String>) -> Self {
        Self::KeyMisconfigured {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// ApiError
// =============================================================================

/// HTTP-facing error produced by the downstream authorization helpers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unauthorized (401).
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// Forbidden (403).
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Error message.
        message: String,
    },

    /// Bad request (400).
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Internal server error (500).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message (for logging, not user-facing).
        message: String,
    },
}

impl ApiError {
    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for categorization.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized { .. } => "UNAUTHORIZED",
            ApiError::Forbidden { .. } => "FORBIDDEN",
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Returns a message that is safe to show to clients.
    ///
    /// Authentication failures all read the same, so the response never
    /// reveals whether a principal exists or why a token was refused.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { .. } => "Authentication required".to_string(),
            ApiError::Forbidden { .. } => "Access denied".to_string(),
            ApiError::BadRequest { message } => message.clone(),
            ApiError::Internal { .. } => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if matches!(self, ApiError::Internal { .. }) {
            tracing::error!(error = %self, error_code, status = %status, "Server error occurred");
        } else {
            tracing::debug!(error = %self, error_code, status = %status, "Client error occurred");
        }

        let body = ErrorResponseBody {
            error: ErrorDetails {
                code: error_code.to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Error response body structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseBody {
    /// Error details.
    pub error: ErrorDetails,
}

/// Error details within the response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(ApiError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::internal("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unauthorized_message_hides_detail() {
        let err = ApiError::unauthorized("no principal for bob@example.com");
        assert_eq!(err.user_message(), "Authentication required");
        assert_eq!(err.error_code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_token_error_from_jsonwebtoken() {
        use jsonwebtoken::errors::{Error, ErrorKind};

        let err: TokenError = Error::from(ErrorKind::InvalidSignature).into();
        assert_eq!(err, TokenError::InvalidSignature);

        let err: TokenError = Error::from(ErrorKind::InvalidToken).into();
        assert!(matches!(err, TokenError::Malformed { .. }));
    }

    #[test]
    fn test_auth_error_display() {
        let err = AuthError::key_misconfigured("secret is not set");
        assert_eq!(err.to_string(), "Signing key misconfigured: secret is not set");
    }
}
