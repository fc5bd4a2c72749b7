//! Outbound adapters for the gym domain
//!
//! ```rust,ignore
//! use domain_gym::adapters::{HttpWorkloadNotifier, WorkloadClientConfig};
//!
//! let notifier = HttpWorkloadNotifier::new(WorkloadClientConfig {
//!     base_url: "http://localhost:8081/api/v1/workload".to_string(),
//!     ..Default::default()
//! })?;
//! let workload: Arc<dyn WorkloadNotifier> = Arc::new(notifier);
//! ```

pub mod workload_http;

pub use workload_http::{HttpWorkloadNotifier, WorkloadClientConfig};
