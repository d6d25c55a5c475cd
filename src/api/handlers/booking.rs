use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::CreateBookingRequest;
use crate::domain::models::booking::RequestedStatus;
use crate::domain::services::booking_writer::NewBooking;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_booking: user {} requested slot {}", session.user_id, payload.slot_id);

    let booking = state.booking_writer.create_booking(&session, NewBooking {
        slot_id: payload.slot_id,
        full_name: payload.full_name,
        phone: payload.phone,
    }).await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn list_my_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_user(&session.user_id).await?;
    Ok(Json(bookings))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_writer
        .update_status(&session, &booking_id, RequestedStatus::Cancelled)
        .await?;
    Ok(Json(booking))
}
