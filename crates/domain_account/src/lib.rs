//! Account Domain
//!
//! Login credentials shared by trainees and trainers:
//!
//! - **Users** carry username, bcrypt password hash, role and activation flag
//! - **Credentials** derive `First.Last` usernames and random passwords
//! - **Sessions** are bearer tokens persisted so logout can revoke them
//! - **Lockout** blocks a client address after repeated failed logins
//!
//! ```rust,ignore
//! let auth = AuthService::new(accounts, tokens, issuer, hasher, attempts, metrics);
//! let issued = auth.login("John.Smith", "secret", "127.0.0.1").await?;
//! auth.verify_session(&issued.token).await?;
//! ```

pub mod user;
pub mod credentials;
pub mod login_attempts;
pub mod token;
pub mod metrics;
pub mod error;
pub mod ports;
pub mod memory;
pub mod services;

pub use user::{User, NewUser, Role};
pub use credentials::{
    CredentialsPolicy, PasswordHasher, base_username, next_available_username,
    DEFAULT_PASSWORD_CHARACTERS, DEFAULT_PASSWORD_LENGTH,
};
pub use login_attempts::{LoginAttemptTracker, DEFAULT_BLOCK_DURATION_SECS, DEFAULT_MAX_ATTEMPTS};
pub use token::{IssuedToken, NewToken, StoredToken, TokenIssuer, TokenType};
pub use metrics::{AuthMetrics, MetricsSnapshot};
pub use error::AccountError;
pub use ports::{AccountPort, TokenPort};
pub use memory::InMemoryAccounts;
pub use services::AuthService;
