//! Domain Adapters
//!
//! The PostgreSQL adapter implements the account and gym ports on top of the
//! repositories, translating rows into domain models and `DatabaseError`
//! into `PortError`.
//!
//! ```rust,ignore
//! use domain_gym::GymPorts;
//! use infra_db::adapters::PostgresGymAdapter;
//!
//! let adapter = Arc::new(PostgresGymAdapter::new(pool));
//! let ports = GymPorts::from_store(adapter, workload);
//! ```

pub mod postgres;

pub use postgres::PostgresGymAdapter;
