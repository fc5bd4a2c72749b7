//! API middleware

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::auth::{validate_token, BearerToken, Claims};
use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the per-request transaction id
pub const TRANSACTION_ID_HEADER: &str = "x-transaction-id";

/// Authentication middleware
///
/// Checks the bearer token's signature and expiry, then confirms the session
/// was not revoked by logout. Claims and the raw token are added to the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    let token = match token {
        Some(token) => token,
        None => {
            warn!("Missing or invalid Authorization header");
            return Err(ApiError::Unauthorized("Missing bearer token".to_string()));
        }
    };

    let claims = validate_token(&token, &state.config.jwt_secret).map_err(|e| {
        warn!(error = %e, "Token validation failed");
        ApiError::from(e)
    })?;

    state.auth.verify_session(&token).await.map_err(|e| {
        warn!(user = %claims.sub, "Revoked session presented");
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(BearerToken(token));
    Ok(next.run(request).await)
}

/// Audit logging middleware
///
/// Logs every API request with its caller and outcome.
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let user = request
        .extensions()
        .get::<Claims>()
        .map(|c| c.sub.clone())
        .unwrap_or_else(|| "anonymous".to_string());
    let transaction_id = request
        .headers()
        .get(TRANSACTION_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Utc::now();

    let response = next.run(request).await;

    let duration = Utc::now() - start;
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        user = %user,
        status = status.as_u16(),
        duration_ms = duration.num_milliseconds(),
        transaction_id = %transaction_id,
        "API request"
    );

    response
}
