//! Authentication use cases

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::credentials::PasswordHasher;
use crate::error::AccountError;
use crate::login_attempts::LoginAttemptTracker;
use crate::metrics::AuthMetrics;
use crate::ports::{AccountPort, TokenPort};
use crate::token::{IssuedToken, NewToken, StoredToken, TokenIssuer, TokenType};

/// Login, logout, session checks and password changes
pub struct AuthService {
    accounts: Arc<dyn AccountPort>,
    tokens: Arc<dyn TokenPort>,
    issuer: Arc<dyn TokenIssuer>,
    hasher: PasswordHasher,
    attempts: Arc<LoginAttemptTracker>,
    metrics: Arc<AuthMetrics>,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountPort>,
        tokens: Arc<dyn TokenPort>,
        issuer: Arc<dyn TokenIssuer>,
        hasher: PasswordHasher,
        attempts: Arc<LoginAttemptTracker>,
        metrics: Arc<AuthMetrics>,
    ) -> Self {
        Self {
            accounts,
            tokens,
            issuer,
            hasher,
            attempts,
            metrics,
        }
    }

    pub fn metrics(&self) -> &AuthMetrics {
        &self.metrics
    }

    /// Authenticates a user and opens a session
    ///
    /// `client_key` identifies the caller for lockout purposes. A user may hold
    /// only one live session; a second login is refused until logout or expiry.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        client_key: &str,
    ) -> Result<IssuedToken, AccountError> {
        if self.attempts.is_blocked(client_key).await {
            warn!(client = %client_key, "Login attempt from blocked client");
            return Err(AccountError::Blocked);
        }

        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(AccountError::MissingCredentials);
        }

        let user = match self.accounts.find_user_by_username(username).await? {
            Some(user) => user,
            None => return Err(self.reject(client_key).await),
        };

        if !self.hasher.verify(password, &user.password_hash).await? {
            return Err(self.reject(client_key).await);
        }

        let now = Utc::now();
        if !self.tokens.active_tokens_for_user(user.id, now).await?.is_empty() {
            warn!("Login refused, session already active");
            return Err(AccountError::AlreadyLoggedIn);
        }
        let purged = self.tokens.purge_inactive_for_user(user.id, now).await?;
        if purged > 0 {
            debug!(user_id = %user.id, purged, "Dropped stale sessions");
        }

        let issued = self.issuer.issue(&user)?;
        self.tokens
            .save_token(NewToken {
                user_id: user.id,
                token: issued.token.clone(),
                token_type: TokenType::Bearer,
                expires_at: issued.expires_at,
            })
            .await?;

        self.attempts.reset(client_key).await;
        self.metrics.record_login_success();
        info!(user_id = %user.id, "User logged in");
        Ok(issued)
    }

    async fn reject(&self, client_key: &str) -> AccountError {
        let failures = self.attempts.register_failure(client_key).await;
        self.metrics.record_login_failure();
        warn!(client = %client_key, failures, "Login failed");
        AccountError::InvalidCredentials
    }

    /// Confirms a presented token is stored, unrevoked and unexpired
    pub async fn verify_session(&self, token: &str) -> Result<StoredToken, AccountError> {
        match self.tokens.find_token(token).await? {
            Some(stored) if stored.is_active_at(Utc::now()) => Ok(stored),
            _ => Err(AccountError::TokenRevoked),
        }
    }

    /// Revokes every session of the token's owner
    #[instrument(skip_all)]
    pub async fn logout(&self, token: &str) -> Result<u64, AccountError> {
        let stored = self
            .tokens
            .find_token(token)
            .await?
            .ok_or(AccountError::TokenRevoked)?;

        let revoked = self.tokens.revoke_all_for_user(stored.user_id).await?;
        info!(user_id = %stored.user_id, revoked, "User logged out");
        Ok(revoked)
    }

    #[instrument(skip(self, old_password, new_password))]
    pub async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AccountError> {
        if new_password.trim().is_empty() {
            return Err(AccountError::validation("New password is required."));
        }

        let user = self
            .accounts
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| AccountError::user_not_found(username))?;

        if !self.hasher.verify(old_password, &user.password_hash).await? {
            warn!("Password change rejected, old password mismatch");
            return Err(AccountError::InvalidCredentials);
        }

        let hash = self.hasher.hash(new_password).await?;
        self.accounts.update_password(user.id, &hash).await?;
        self.metrics.record_password_change();
        info!(user_id = %user.id, "Password changed");
        Ok(())
    }
}
