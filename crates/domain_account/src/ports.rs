//! Account Domain Ports
//!
//! `AccountPort` reads and updates user credentials; `TokenPort` stores the
//! issued bearer tokens. Trainee and trainer registration create users through
//! the gym ports, which own the surrounding profile rows.
//!
//! Adapters:
//!
//! - **PostgreSQL**: `infra_db::PostgresGymAdapter`
//! - **In-memory**: [`crate::memory::InMemoryAccounts`]

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{DomainPort, PortError, UserId};

use crate::token::{NewToken, StoredToken};
use crate::user::User;

#[async_trait]
pub trait AccountPort: DomainPort {
    /// Looks up a user by exact username
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, PortError>;

    /// Returns every username that begins with `prefix`
    ///
    /// Used to pick the next free serial during registration.
    async fn usernames_starting_with(&self, prefix: &str) -> Result<Vec<String>, PortError>;

    /// Replaces a user's password hash
    async fn update_password(&self, user_id: UserId, password_hash: &str) -> Result<(), PortError>;
}

#[async_trait]
pub trait TokenPort: DomainPort {
    async fn save_token(&self, token: NewToken) -> Result<StoredToken, PortError>;

    async fn find_token(&self, token: &str) -> Result<Option<StoredToken>, PortError>;

    /// Tokens of the user that are neither revoked nor expired at `now`
    async fn active_tokens_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<StoredToken>, PortError>;

    /// Marks every token of the user revoked, returning how many changed
    async fn revoke_all_for_user(&self, user_id: UserId) -> Result<u64, PortError>;

    /// Deletes the user's revoked or expired tokens, returning how many went
    async fn purge_inactive_for_user(&self, user_id: UserId, now: DateTime<Utc>) -> Result<u64, PortError>;
}
