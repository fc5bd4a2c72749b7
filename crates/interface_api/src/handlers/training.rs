//! Training handlers

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Extension, Json,
};
use validator::Validate;

use core_kernel::TrainingId;
use domain_gym::{TraineeTrainingQuery, TrainerTrainingQuery};

use crate::auth::{AuthError, Claims};
use crate::dto::training::{
    AddTrainingRequest, TraineeTrainingsParams, TrainerTrainingsParams, TrainingCreatedResponse,
    TrainingResponse,
};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok())
}

pub async fn trainee_trainings(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TraineeTrainingsParams>,
) -> Result<Json<Vec<TrainingResponse>>, ApiError> {
    let query = TraineeTrainingQuery::try_from(params)?;
    let trainings = state.trainings.trainee_trainings(&query).await?;
    Ok(Json(trainings.into_iter().map(TrainingResponse::from).collect()))
}

pub async fn trainer_trainings(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TrainerTrainingsParams>,
) -> Result<Json<Vec<TrainingResponse>>, ApiError> {
    let query = TrainerTrainingQuery::try_from(params)?;
    let trainings = state.trainings.trainer_trainings(&query).await?;
    Ok(Json(trainings.into_iter().map(TrainingResponse::from).collect()))
}

/// Adds a training; the caller must be its trainee or its trainer
pub async fn add(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<AddTrainingRequest>,
) -> Result<(StatusCode, Json<TrainingCreatedResponse>), ApiError> {
    request.validate()?;
    if claims.sub != request.trainee_username && claims.sub != request.trainer_username {
        return Err(AuthError::Forbidden(request.trainee_username).into());
    }

    let training = state
        .trainings
        .add(request.into(), authorization(&headers))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(TrainingCreatedResponse {
            id: training.id.value(),
        }),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .trainings
        .delete(TrainingId::new(id), authorization(&headers))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
