//! Trainee handlers

use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use domain_account::Role;

use crate::auth::{ensure_owner, Claims};
use crate::dto::trainee::{
    TraineeProfileResponse, TraineeRegistrationRequest, UpdateTraineeRequest, UpdateTrainersRequest,
};
use crate::dto::trainer::TrainerSummary;
use crate::dto::user::{ActivationRequest, CredentialsResponse};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

/// Registers a trainee and returns the generated credentials
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TraineeRegistrationRequest>,
) -> Result<(StatusCode, Json<CredentialsResponse>), ApiError> {
    request.validate()?;
    let (_, credentials) = state.trainees.register(request.into()).await?;
    Ok((StatusCode::CREATED, Json(credentials.into())))
}

pub async fn get_profile(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> Result<Json<TraineeProfileResponse>, ApiError> {
    let profile = state.trainees.profile(&username).await?;
    Ok(Json(profile.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(request): ApiJson<UpdateTraineeRequest>,
) -> Result<Json<TraineeProfileResponse>, ApiError> {
    request.validate()?;
    ensure_owner(&claims, &request.username, Role::Trainee)?;
    let profile = state.trainees.update(request.into()).await?;
    Ok(Json(profile.into()))
}

/// Deletes the trainee together with its trainings and trainer links
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiPath(username): ApiPath<String>,
) -> Result<StatusCode, ApiError> {
    ensure_owner(&claims, &username, Role::Trainee)?;
    state.trainees.delete(&username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(request): ApiJson<ActivationRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;
    ensure_owner(&claims, &request.username, Role::Trainee)?;
    state.trainees.set_active(&request.username, request.is_active).await?;
    Ok(StatusCode::OK)
}

/// Active trainers not yet assigned to the trainee
pub async fn unassigned_trainers(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> Result<Json<Vec<TrainerSummary>>, ApiError> {
    let trainers = state.trainees.unassigned_trainers(&username).await?;
    Ok(Json(trainers.iter().map(TrainerSummary::from).collect()))
}

pub async fn update_trainers(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(request): ApiJson<UpdateTrainersRequest>,
) -> Result<Json<Vec<TrainerSummary>>, ApiError> {
    request.validate()?;
    ensure_owner(&claims, &request.trainee_username, Role::Trainee)?;
    let trainers = state
        .trainees
        .replace_trainers(&request.trainee_username, &request.trainer_usernames)
        .await?;
    Ok(Json(trainers.iter().map(TrainerSummary::from).collect()))
}
