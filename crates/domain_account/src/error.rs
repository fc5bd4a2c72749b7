//! Account domain errors

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur while authenticating or managing accounts
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("IP address is temporarily blocked")]
    Blocked,

    #[error("Username and password are required")]
    MissingCredentials,

    #[error("User is already logged in with an active session")]
    AlreadyLoggedIn,

    #[error("Token is revoked or unknown")]
    TokenRevoked,

    #[error("{0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token could not be issued: {0}")]
    TokenIssue(String),

    #[error(transparent)]
    Port(#[from] PortError),
}

impl AccountError {
    pub fn validation(message: impl Into<String>) -> Self {
        AccountError::Validation(message.into())
    }

    pub fn user_not_found(username: impl Into<String>) -> Self {
        AccountError::UserNotFound(username.into())
    }

    /// Returns true if the caller failed to prove who they are
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            AccountError::InvalidCredentials | AccountError::TokenRevoked
        )
    }
}
