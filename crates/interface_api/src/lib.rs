//! HTTP API Layer
//!
//! This crate provides the REST API for the gym service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each resource
//! - **Middleware**: Bearer authentication with session revocation, audit logging
//! - **DTOs**: camelCase request/response bodies with `validator` rules
//! - **Error Handling**: Consistent JSON error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(config, ports)?;
//! let app = create_router(state);
//! axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;
pub mod state;

use axum::{
    body::Body,
    http::{HeaderName, Request},
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{health, trainee, trainer, training, training_type, user};
use crate::middleware::{audit_middleware, auth_middleware, TRANSACTION_ID_HEADER};

pub use crate::state::AppState;

/// Creates the main API router
///
/// Registration, login, health and metrics are public; every other
/// `/api/v1` route requires a live bearer session.
pub fn create_router(state: AppState) -> Router {
    let transaction_id = HeaderName::from_static(TRANSACTION_ID_HEADER);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics))
        .route("/api/v1/trainee/registration", post(trainee::register))
        .route("/api/v1/trainer/registration", post(trainer::register))
        .route("/api/v1/user/login", get(user::login));

    let user_routes = Router::new()
        .route("/logout", post(user::logout))
        .route("/change-login", put(user::change_login));

    let trainee_routes = Router::new()
        .route("/", put(trainee::update_profile))
        .route("/status", patch(trainee::set_status))
        .route("/trainers", put(trainee::update_trainers))
        .route("/:username", get(trainee::get_profile).delete(trainee::delete))
        .route("/:username/unassigned-trainers", get(trainee::unassigned_trainers));

    let trainer_routes = Router::new()
        .route("/", put(trainer::update_profile))
        .route("/status", patch(trainer::set_status))
        .route("/:username", get(trainer::get_profile));

    let training_routes = Router::new()
        .route("/", post(training::add))
        .route("/trainee", get(training::trainee_trainings))
        .route("/trainer", get(training::trainer_trainings))
        .route("/:id", delete(training::delete));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/user", user_routes)
        .nest("/trainee", trainee_routes)
        .nest("/trainer", trainer_routes)
        .nest("/training", training_routes)
        .route("/training-types", get(training_type::list))
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let transaction_id = request
            .headers()
            .get(TRANSACTION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            transaction_id = %transaction_id,
        )
    });

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::new(transaction_id.clone()))
        .layer(SetRequestIdLayer::new(transaction_id, MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
