use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_sports(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let sports = state.sport_repo.list().await?;
    Ok(Json(sports))
}
