//! Account DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_gym::Credentials;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLoginRequest {
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "Old password is required."))]
    pub old_password: String,
    #[validate(length(min = 1, message = "New password is required."))]
    pub new_password: String,
}

/// Generated credentials, returned once at registration
#[derive(Debug, Serialize, Deserialize)]
pub struct CredentialsResponse {
    pub username: String,
    pub password: String,
}

impl From<Credentials> for CredentialsResponse {
    fn from(credentials: Credentials) -> Self {
        Self {
            username: credentials.username,
            password: credentials.password,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRequest {
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
