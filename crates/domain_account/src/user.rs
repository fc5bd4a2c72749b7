//! Users and roles
//!
//! Every trainee and trainer owns exactly one user row holding the login
//! credentials and the activation flag.

use core_kernel::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AccountError;

/// The role a user authenticates with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Trainee,
    Trainer,
}

impl Role {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Trainee => "TRAINEE",
            Role::Trainer => "TRAINER",
        }
    }

    /// Authority carried in bearer token claims
    pub fn authority(&self) -> &'static str {
        match self {
            Role::Trainee => "ROLE_TRAINEE",
            Role::Trainer => "ROLE_TRAINER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        match normalized.strip_prefix("ROLE_").unwrap_or(&normalized) {
            "TRAINEE" => Ok(Role::Trainee),
            "TRAINER" => Ok(Role::Trainer),
            _ => Err(AccountError::validation(format!("Unknown role: {}", s))),
        }
    }
}

/// A stored user account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub role: Role,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A user about to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}
