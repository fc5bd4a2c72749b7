//! API error handling
//!
//! Domain errors are converted into `ApiError`, which renders the status code
//! and the JSON error body.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::{PortError, TemporalError};
use domain_account::AccountError;
use domain_gym::GymError;

use crate::auth::AuthError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Option<Vec<String>>,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_type, message, details) = match self {
            ApiError::NotFound(msg) => ("not_found", msg, None),
            ApiError::Validation { message, details } => ("validation_error", message, details),
            ApiError::Unauthorized(msg) => ("unauthorized", msg, None),
            ApiError::Forbidden(msg) => ("forbidden", msg, None),
            ApiError::Conflict(msg) => ("conflict", msg, None),
            ApiError::ServiceUnavailable(msg) => {
                error!(error = %msg, "Dependency unavailable");
                ("service_unavailable", "Service temporarily unavailable".to_string(), None)
            }
            ApiError::Internal(msg) => {
                error!(error = %msg, "Request failed");
                ("internal_error", "Internal server error".to_string(), None)
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
            timestamp: Utc::now(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PortError::Validation { message, .. } => ApiError::validation(message),
            PortError::Conflict { message } => ApiError::Conflict(message),
            PortError::Unauthorized { message } => ApiError::Unauthorized(message),
            PortError::Connection { .. }
            | PortError::Timeout { .. }
            | PortError::ServiceUnavailable { .. } => ApiError::ServiceUnavailable(err.to_string()),
            PortError::Transformation { .. } | PortError::Internal { .. } => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::UserNotFound(_) => ApiError::NotFound(err.to_string()),
            AccountError::InvalidCredentials | AccountError::TokenRevoked => {
                ApiError::Unauthorized(err.to_string())
            }
            AccountError::MissingCredentials | AccountError::Validation(_) => {
                ApiError::validation(err.to_string())
            }
            AccountError::Blocked => ApiError::Forbidden(err.to_string()),
            AccountError::AlreadyLoggedIn => ApiError::Conflict(err.to_string()),
            AccountError::Hashing(_) | AccountError::TokenIssue(_) => ApiError::Internal(err.to_string()),
            AccountError::Port(port) => port.into(),
        }
    }
}

impl From<GymError> for ApiError {
    fn from(err: GymError) -> Self {
        match err {
            GymError::Validation(message) => ApiError::validation(message),
            GymError::Conflict(message) => ApiError::Conflict(message),
            GymError::Temporal(temporal) => temporal.into(),
            GymError::Account(account) => account.into(),
            GymError::Port(port) => port.into(),
            not_found => ApiError::NotFound(not_found.to_string()),
        }
    }
}

impl From<TemporalError> for ApiError {
    fn from(err: TemporalError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken | AuthError::TokenExpired => ApiError::Unauthorized(err.to_string()),
            AuthError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
            AuthError::Signing(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        details.sort();

        ApiError::Validation {
            message: details.join(" "),
            details: Some(details),
        }
    }
}
