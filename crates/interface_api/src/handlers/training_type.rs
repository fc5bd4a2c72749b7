//! Training type handlers

use axum::{extract::State, Json};

use crate::dto::training::TrainingTypeResponse;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<TrainingTypeResponse>>, ApiError> {
    let types = state.training_types.list().await?;
    Ok(Json(types.into_iter().map(TrainingTypeResponse::from).collect()))
}
