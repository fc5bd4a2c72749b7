//! Authentication and authorization
//!
//! Session tokens are HS256 JWTs carrying the username as `sub` and the role
//! authority (`ROLE_TRAINEE` / `ROLE_TRAINER`) in `roles`. A valid signature is
//! not enough on its own: the middleware also checks the token store so that
//! logout revokes tokens before they expire.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use domain_account::{AccountError, IssuedToken, Role, TokenIssuer, User};

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Role authorities
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
    /// Unique token id
    pub jti: String,
}

/// The raw bearer token of the current request
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token signing failed: {0}")]
    Signing(String),
    #[error("Not allowed to modify {0}")]
    Forbidden(String),
}

/// Creates a new JWT token
///
/// Returns the encoded token and its expiry.
pub fn create_token(
    subject: &str,
    roles: Vec<String>,
    secret: &str,
    expiration_secs: u64,
) -> Result<(String, DateTime<Utc>), AuthError> {
    let now = Utc::now();
    let lifetime = i64::try_from(expiration_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| AuthError::Signing(format!("token lifetime {}s out of range", expiration_secs)))?;
    let exp = now
        .checked_add_signed(lifetime)
        .ok_or_else(|| AuthError::Signing(format!("token lifetime {}s out of range", expiration_secs)))?;

    let claims = Claims {
        sub: subject.to_string(),
        roles,
        exp: exp.timestamp(),
        iat: now.timestamp(),
        jti: format!("{:016x}", rand::random::<u64>()),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))?;

    Ok((token, exp))
}

/// Validates a JWT token's signature and expiry
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Checks if user has required role
pub fn has_role(claims: &Claims, role: Role) -> bool {
    claims.roles.iter().any(|r| r == role.authority())
}

/// Allows a mutation only when the caller is `username` acting in `role`
pub fn ensure_owner(claims: &Claims, username: &str, role: Role) -> Result<(), AuthError> {
    if claims.sub == username && has_role(claims, role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden(username.to_string()))
    }
}

/// Signs session tokens for the auth service
#[derive(Debug, Clone)]
pub struct JwtIssuer {
    secret: String,
    expiration_secs: u64,
}

impl JwtIssuer {
    pub fn new(secret: impl Into<String>, expiration_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_secs,
        }
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(&self, user: &User) -> Result<IssuedToken, AccountError> {
        let roles = vec![user.role.authority().to_string()];
        let (token, expires_at) = create_token(&user.username, roles, &self.secret, self.expiration_secs)
            .map_err(|e| AccountError::TokenIssue(e.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip_keeps_subject_and_roles() {
        let (token, _) = create_token("Anna.Lee", vec!["ROLE_TRAINEE".to_string()], SECRET, 60).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "Anna.Lee");
        assert!(has_role(&claims, Role::Trainee));
        assert!(!has_role(&claims, Role::Trainer));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (token, _) = create_token("Anna.Lee", vec![], SECRET, 60).unwrap();
        assert!(matches!(validate_token(&token, "other"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_consecutive_tokens_differ() {
        let (a, _) = create_token("Anna.Lee", vec![], SECRET, 60).unwrap();
        let (b, _) = create_token("Anna.Lee", vec![], SECRET, 60).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unrepresentable_lifetime_is_an_error() {
        assert!(matches!(
            create_token("Anna.Lee", vec![], SECRET, u64::MAX),
            Err(AuthError::Signing(_))
        ));
    }

    #[test]
    fn test_ensure_owner() {
        let (token, _) = create_token("Anna.Lee", vec!["ROLE_TRAINEE".to_string()], SECRET, 60).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert!(ensure_owner(&claims, "Anna.Lee", Role::Trainee).is_ok());
        assert!(ensure_owner(&claims, "Anna.Lee", Role::Trainer).is_err());
        assert!(ensure_owner(&claims, "Mia.Stone", Role::Trainee).is_err());
    }

    proptest::proptest! {
        #[test]
        fn prop_subject_survives_signing(first in "[A-Z][a-z]{1,12}", last in "[A-Z][a-z]{1,12}", serial in 0u32..50) {
            let subject = format!("{}.{}{}", first, last, serial);
            let (token, _) = create_token(&subject, vec![], SECRET, 60).unwrap();
            let claims = validate_token(&token, SECRET).unwrap();
            proptest::prop_assert_eq!(claims.sub, subject);
        }
    }
}
