//! Login, logout and password change handlers

use axum::{
    extract::{ConnectInfo, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderName},
    Extension, Json,
};
use std::net::SocketAddr;
use tracing::instrument;
use validator::Validate;

use crate::auth::{AuthError, BearerToken, Claims};
use crate::dto::user::{ChangeLoginRequest, LoginResponse, MessageResponse};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Lockout key used when the peer address is unknown
const UNKNOWN_CLIENT: &str = "unknown";

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

/// Opens a session from the `username` and `password` request headers
///
/// The token is returned in the body and as the `Authorization` response
/// header.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Result<([(HeaderName, String); 1], Json<LoginResponse>), ApiError> {
    let client_key = peer
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

    let issued = state
        .auth
        .login(
            header_value(&headers, "username"),
            header_value(&headers, "password"),
            &client_key,
        )
        .await?;

    Ok((
        [(AUTHORIZATION, format!("Bearer {}", issued.token))],
        Json(LoginResponse { token: issued.token }),
    ))
}

/// Revokes every session of the caller
pub async fn logout(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.auth.logout(&token.0).await?;
    Ok(Json(MessageResponse::new("Logged out")))
}

/// Changes the caller's own password
pub async fn change_login(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(request): ApiJson<ChangeLoginRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    request.validate()?;
    if claims.sub != request.username {
        return Err(AuthError::Forbidden(request.username).into());
    }

    state
        .auth
        .change_password(&request.username, &request.old_password, &request.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password changed")))
}
