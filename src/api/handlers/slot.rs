use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::SlotsQuery, responses::SlotsResponse};
use crate::error::AppError;
use std::sync::Arc;
use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::info;

/// Dates open for booking: today through `horizon_days` ahead, in the venue's zone.
pub fn check_booking_window(date: NaiveDate, tz: Tz, horizon_days: i64) -> Result<(), AppError> {
    let today = Utc::now().with_timezone(&tz).date_naive();
    if date < today {
        return Err(AppError::Validation("Date is in the past".into()));
    }
    if date > today + Duration::days(horizon_days) {
        return Err(AppError::Validation(format!("Bookings open only {} days ahead", horizon_days)));
    }
    Ok(())
}

pub async fn list_slots(
    State(state): State<Arc<AppState>>,
    Path((venue_id, sport_id)): Path<(String, String)>,
    Query(params): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = NaiveDate::parse_from_str(&params.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))?;

    check_booking_window(date, state.config.venue_timezone, state.config.booking_horizon_days)?;

    let slots = state.slot_generator.slots_for_day(&venue_id, &sport_id, date).await?;
    info!("Returning {} slots for {}/{} on {}", slots.len(), venue_id, sport_id, date);

    Ok(Json(SlotsResponse { venue_id, sport_id, date, slots }))
}

pub async fn get_slot(
    State(state): State<Arc<AppState>>,
    Path(slot_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let slot = state.slot_repo.find_by_id(&slot_id).await?
        .ok_or(AppError::NotFound("Slot not found".into()))?;
    Ok(Json(slot))
}
