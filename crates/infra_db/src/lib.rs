//! Infrastructure Database Layer
//!
//! PostgreSQL storage for the gym service using SQLx:
//!
//! - [`pool`] builds the connection pool and applies the embedded migrations
//! - [`repositories`] hold the SQL, one repository per table group
//! - [`adapters::PostgresGymAdapter`] implements every account and gym port
//!   on top of the repositories
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresGymAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/gym")).await?;
//! run_migrations(&pool).await?;
//! let adapter = PostgresGymAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
pub use adapters::PostgresGymAdapter;
