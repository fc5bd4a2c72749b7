//! In-memory account storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError, TokenId, UserId,
};

use crate::ports::{AccountPort, TokenPort};
use crate::token::{NewToken, StoredToken};
use crate::user::{NewUser, User};

#[derive(Debug, Default)]
struct AccountState {
    next_user_id: i64,
    next_token_id: i64,
    users: BTreeMap<UserId, User>,
    tokens: BTreeMap<TokenId, StoredToken>,
}

/// Users and tokens kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryAccounts {
    state: RwLock<AccountState>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user, enforcing username uniqueness
    pub async fn insert_user(&self, new_user: NewUser) -> Result<User, PortError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == new_user.username) {
            return Err(PortError::conflict(format!(
                "username {} already exists",
                new_user.username
            )));
        }

        state.next_user_id += 1;
        let user = User {
            id: UserId::new(state.next_user_id),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            username: new_user.username,
            password_hash: new_user.password_hash,
            is_active: true,
            role: new_user.role,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn user(&self, id: UserId) -> Option<User> {
        self.state.read().await.users.get(&id).cloned()
    }

    /// Applies `change` to a stored user and returns the updated copy
    pub async fn modify_user<F>(&self, id: UserId, change: F) -> Result<User, PortError>
    where
        F: FnOnce(&mut User) + Send,
    {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("User", id))?;
        change(user);
        Ok(user.clone())
    }

    /// Removes a user together with its tokens
    pub async fn remove_user(&self, id: UserId) -> Option<User> {
        let mut state = self.state.write().await;
        state.tokens.retain(|_, token| token.user_id != id);
        state.users.remove(&id)
    }
}

impl DomainPort for InMemoryAccounts {}

#[async_trait]
impl HealthCheckable for InMemoryAccounts {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::new("in-memory-accounts", AdapterHealth::Healthy, 0)
    }
}

#[async_trait]
impl AccountPort for InMemoryAccounts {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, PortError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn usernames_starting_with(&self, prefix: &str) -> Result<Vec<String>, PortError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .filter(|u| u.username.starts_with(prefix))
            .map(|u| u.username.clone())
            .collect())
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> Result<(), PortError> {
        let password_hash = password_hash.to_string();
        self.modify_user(user_id, move |user| user.password_hash = password_hash)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl TokenPort for InMemoryAccounts {
    async fn save_token(&self, token: NewToken) -> Result<StoredToken, PortError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&token.user_id) {
            return Err(PortError::not_found("User", token.user_id));
        }
        if state.tokens.values().any(|t| t.token == token.token) {
            return Err(PortError::conflict("token already stored"));
        }

        state.next_token_id += 1;
        let stored = StoredToken {
            id: TokenId::new(state.next_token_id),
            user_id: token.user_id,
            token: token.token,
            token_type: token.token_type,
            revoked: false,
            expires_at: token.expires_at,
        };
        state.tokens.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_token(&self, token: &str) -> Result<Option<StoredToken>, PortError> {
        let state = self.state.read().await;
        Ok(state.tokens.values().find(|t| t.token == token).cloned())
    }

    async fn active_tokens_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<StoredToken>, PortError> {
        let state = self.state.read().await;
        Ok(state
            .tokens
            .values()
            .filter(|t| t.user_id == user_id && t.is_active_at(now))
            .cloned()
            .collect())
    }

    async fn revoke_all_for_user(&self, user_id: UserId) -> Result<u64, PortError> {
        let mut state = self.state.write().await;
        let mut revoked = 0;
        for token in state.tokens.values_mut().filter(|t| t.user_id == user_id && !t.revoked) {
            token.revoked = true;
            revoked += 1;
        }
        Ok(revoked)
    }

    async fn purge_inactive_for_user(&self, user_id: UserId, now: DateTime<Utc>) -> Result<u64, PortError> {
        let mut state = self.state.write().await;
        let before = state.tokens.len();
        state
            .tokens
            .retain(|_, t| t.user_id != user_id || t.is_active_at(now));
        Ok((before - state.tokens.len()) as u64)
    }
}
