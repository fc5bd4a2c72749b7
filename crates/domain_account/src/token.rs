//! Bearer token sessions
//!
//! Issued tokens are persisted so that logout can revoke them before they
//! expire. A token is honoured only while it is stored, not revoked and not
//! past its expiry.

use chrono::{DateTime, Utc};
use core_kernel::{TokenId, UserId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AccountError;
use crate::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    Bearer,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Bearer => "BEARER",
        }
    }
}

impl FromStr for TokenType {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BEARER" => Ok(TokenType::Bearer),
            other => Err(AccountError::validation(format!("Unknown token type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredToken {
    pub id: TokenId,
    pub user_id: UserId,
    pub token: String,
    pub token_type: TokenType,
    pub revoked: bool,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

#[derive(Debug, Clone)]
pub struct NewToken {
    pub user_id: UserId,
    pub token: String,
    pub token_type: TokenType,
    pub expires_at: DateTime<Utc>,
}

/// A freshly signed token handed back to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs session tokens for authenticated users
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user: &User) -> Result<IssuedToken, AccountError>;
}
