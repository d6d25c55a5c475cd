use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::responses::VenueDetailResponse;
use crate::error::AppError;
use std::sync::Arc;
use tracing::debug;

pub async fn list_venues(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let venues = state.venue_repo.list().await?;
    debug!("Listing {} venues", venues.len());
    Ok(Json(venues))
}

pub async fn get_venue(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let venue = state.venue_repo.find_by_id(&venue_id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;
    let sports = state.sport_repo.list_by_venue(&venue_id).await?;

    Ok(Json(VenueDetailResponse { venue, sports }))
}

pub async fn list_venue_sports(
    State(state): State<Arc<AppState>>,
    Path(venue_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.venue_repo.find_by_id(&venue_id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;
    let sports = state.sport_repo.list_by_venue(&venue_id).await?;
    Ok(Json(sports))
}
