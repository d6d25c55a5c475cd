use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AdminUser;
use crate::api::dtos::requests::{
    BookingListQuery, CreateSportRequest, CreateVenueRequest, ReplaceTimingsRequest, SetRoleRequest,
    TimingInput, UpdateBookingStatusRequest, UpdateSportRequest, UpdateVenueRequest,
};
use crate::domain::models::{
    booking::{BookingStatus, RequestedStatus},
    profile::{Profile, Role},
    timing::{parse_day, VenueTiming},
    venue::{Sport, Venue, VenueSport},
};
use crate::error::AppError;
use std::sync::Arc;
use chrono::{NaiveTime, Utc};
use sqlx::types::Json as DbJson;
use tracing::info;

fn required(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn parse_time(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("Invalid time '{}' (HH:MM)", value)))
}

fn parse_timing(venue_id: &str, input: &TimingInput) -> Result<VenueTiming, AppError> {
    let day = parse_day(&input.day_of_week)
        .ok_or(AppError::Validation(format!("Unknown day '{}'", input.day_of_week)))?;
    let start = parse_time(&input.start_time)?;
    let end = parse_time(&input.end_time)?;
    if start >= end {
        return Err(AppError::Validation("Start time must be before end time".into()));
    }
    Ok(VenueTiming::new(venue_id.to_string(), day, start, end, input.is_morning))
}

// --- Venues ---

pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateVenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let venue = Venue::new(
        required(&payload.name, "Name")?,
        payload.address.trim().to_string(),
        payload.location.trim().to_string(),
        payload.images,
    );
    let created = state.venue_repo.create(&venue).await?;
    info!("Admin {} created venue {}", admin.user_id, created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_venues(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let venues = state.venue_repo.list().await?;
    Ok(Json(venues))
}

pub async fn update_venue(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(venue_id): Path<String>,
    Json(payload): Json<UpdateVenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut venue = state.venue_repo.find_by_id(&venue_id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;

    if let Some(name) = payload.name { venue.name = required(&name, "Name")?; }
    if let Some(address) = payload.address { venue.address = address.trim().to_string(); }
    if let Some(location) = payload.location { venue.location = location.trim().to_string(); }
    if let Some(images) = payload.images { venue.images = DbJson(images); }

    let updated = state.venue_repo.update(&venue).await?;
    info!("Admin {} updated venue {}", admin.user_id, venue_id);
    Ok(Json(updated))
}

pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(venue_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.venue_repo.delete(&venue_id).await?;
    info!("Admin {} deleted venue {}", admin.user_id, venue_id);
    Ok(StatusCode::NO_CONTENT)
}

// --- Sports ---

pub async fn create_sport(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateSportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let sport = Sport::new(required(&payload.name, "Name")?, payload.description);
    let created = state.sport_repo.create(&sport).await?;
    info!("Admin {} created sport {}", admin.user_id, created.name);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_sport(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(sport_id): Path<String>,
    Json(payload): Json<UpdateSportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut sport = state.sport_repo.find_by_id(&sport_id).await?
        .ok_or(AppError::NotFound("Sport not found".into()))?;

    if let Some(name) = payload.name { sport.name = required(&name, "Name")?; }
    if payload.description.is_some() { sport.description = payload.description; }

    let updated = state.sport_repo.update(&sport).await?;
    Ok(Json(updated))
}

pub async fn delete_sport(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(sport_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.sport_repo.delete(&sport_id).await?;
    info!("Admin {} deleted sport {}", admin.user_id, sport_id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn link_sport(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path((venue_id, sport_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.venue_repo.find_by_id(&venue_id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;
    state.sport_repo.find_by_id(&sport_id).await?
        .ok_or(AppError::NotFound("Sport not found".into()))?;

    let link = state.sport_repo.link(&VenueSport::new(venue_id, sport_id)).await?;
    Ok(Json(link))
}

pub async fn unlink_sport(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path((venue_id, sport_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.sport_repo.unlink(&venue_id, &sport_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Timings & Pricing ---

pub async fn get_timings(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(venue_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let timings = state.timing_repo.list_by_venue(&venue_id).await?;
    Ok(Json(timings))
}

/// Replaces the venue's whole weekly schedule. Slots already generated keep their times.
pub async fn replace_timings(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(venue_id): Path<String>,
    Json(payload): Json<ReplaceTimingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.venue_repo.find_by_id(&venue_id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;

    let timings = payload.timings.iter()
        .map(|t| parse_timing(&venue_id, t))
        .collect::<Result<Vec<_>, _>>()?;

    let stored = state.timing_repo.replace_for_venue(&venue_id, &timings).await?;
    info!("Admin {} replaced timings of venue {} ({} rows)", admin.user_id, venue_id, stored.len());
    Ok(Json(stored))
}

pub async fn get_pricing(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(venue_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let rules = state.pricing_repo.list_by_venue(&venue_id).await?;
    Ok(Json(rules))
}

// --- Bookings ---

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Query(params): Query<BookingListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = params.status
        .map(|s| s.parse::<BookingStatus>())
        .transpose()
        .map_err(AppError::Validation)?;

    let bookings = state.booking_repo.list_all(status).await?;
    Ok(Json(bookings))
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let requested: RequestedStatus = payload.status.parse().map_err(AppError::Validation)?;

    let booking = state.booking_writer.update_status(&admin, &booking_id, requested).await?;
    info!("Admin {} set booking {} to {:?}", admin.user_id, booking_id, requested);
    Ok(Json(booking))
}

// --- Profiles ---

/// Grants or revokes the admin role, creating the profile if the user has none yet.
pub async fn set_role(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<String>,
    Json(payload): Json<SetRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role: Role = payload.role.parse().map_err(AppError::Validation)?;

    let mut profile = match state.profile_repo.find_by_id(&user_id).await? {
        Some(existing) => existing,
        None => Profile::new(user_id.clone(), payload.email.unwrap_or_default(), role),
    };
    profile.role = role.as_str().to_string();
    profile.updated_at = Utc::now();

    let saved = state.profile_repo.upsert(&profile).await?;
    info!("Admin {} set role of {} to {}", admin.user_id, user_id, role.as_str());
    Ok(Json(saved))
}
