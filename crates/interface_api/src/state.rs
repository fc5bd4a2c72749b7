//! Shared application state

use chrono::Duration;
use std::sync::Arc;

use core_kernel::{CoreError, HealthCheckable};
use domain_account::{AuthMetrics, AuthService, CredentialsPolicy, LoginAttemptTracker, PasswordHasher};
use domain_gym::{
    CredentialsFactory, GymPorts, TraineeService, TrainerService, TrainingService,
    TrainingTypeService, WorkloadNotifier,
};

use crate::auth::JwtIssuer;
use crate::config::ApiConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub auth: Arc<AuthService>,
    pub trainees: Arc<TraineeService>,
    pub trainers: Arc<TrainerService>,
    pub trainings: Arc<TrainingService>,
    pub training_types: Arc<TrainingTypeService>,
    pub metrics: Arc<AuthMetrics>,
    pub store_health: Arc<dyn HealthCheckable>,
    pub workload: Arc<dyn WorkloadNotifier>,
}

impl AppState {
    /// Wires the services over the given ports
    pub fn new(config: ApiConfig, ports: GymPorts) -> Result<Self, CoreError> {
        config.validate()?;
        let policy = CredentialsPolicy::new(config.password_length, &config.password_characters)
            .map_err(|e| CoreError::configuration(e.to_string()))?;
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        let attempts = Arc::new(LoginAttemptTracker::new(
            config.max_login_attempts,
            Duration::seconds(config.login_block_secs),
        ));
        let metrics = Arc::new(AuthMetrics::new());
        let issuer = Arc::new(JwtIssuer::new(config.jwt_secret.clone(), config.jwt_expiration_secs));

        let auth = AuthService::new(
            ports.accounts.clone(),
            ports.tokens.clone(),
            issuer,
            hasher,
            attempts,
            metrics.clone(),
        );
        let credentials = CredentialsFactory::new(ports.accounts.clone(), policy, hasher);

        Ok(Self {
            auth: Arc::new(auth),
            trainees: Arc::new(TraineeService::new(ports.clone(), credentials.clone())),
            trainers: Arc::new(TrainerService::new(ports.clone(), credentials)),
            trainings: Arc::new(TrainingService::new(ports.clone())),
            training_types: Arc::new(TrainingTypeService::new(ports.clone())),
            metrics,
            store_health: ports.store_health,
            workload: ports.workload,
            config: Arc::new(config),
        })
    }
}
