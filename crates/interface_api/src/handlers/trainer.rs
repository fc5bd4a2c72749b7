//! Trainer handlers

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use domain_account::Role;

use crate::auth::{ensure_owner, Claims};
use crate::dto::trainer::{TrainerProfileResponse, TrainerRegistrationRequest, UpdateTrainerRequest};
use crate::dto::user::{ActivationRequest, CredentialsResponse};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

/// Registers a trainer and returns the generated credentials
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TrainerRegistrationRequest>,
) -> Result<(StatusCode, Json<CredentialsResponse>), ApiError> {
    request.validate()?;
    let (_, credentials) = state.trainers.register(request.into()).await?;
    Ok((StatusCode::CREATED, Json(credentials.into())))
}

pub async fn get_profile(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> Result<Json<TrainerProfileResponse>, ApiError> {
    let profile = state.trainers.profile(&username).await?;
    Ok(Json(profile.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(request): ApiJson<UpdateTrainerRequest>,
) -> Result<Json<TrainerProfileResponse>, ApiError> {
    request.validate()?;
    ensure_owner(&claims, &request.username, Role::Trainer)?;
    let profile = state.trainers.update(request.into()).await?;
    Ok(Json(profile.into()))
}

pub async fn set_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(request): ApiJson<ActivationRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    ensure_owner(&claims, &request.username, Role::Trainer)?;
    state.trainers.set_active(&request.username, request.is_active).await?;
    Ok(StatusCode::OK)
}
