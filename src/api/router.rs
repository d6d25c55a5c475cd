use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, venue, sport, slot, booking, admin, changes};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Catalogue
        .route("/api/v1/venues", get(venue::list_venues))
        .route("/api/v1/venues/{venue_id}", get(venue::get_venue))
        .route("/api/v1/venues/{venue_id}/sports", get(venue::list_venue_sports))
        .route("/api/v1/sports", get(sport::list_sports))

        // Slots
        .route("/api/v1/venues/{venue_id}/sports/{sport_id}/slots", get(slot::list_slots))
        .route("/api/v1/slots/{slot_id}", get(slot::get_slot))

        // Bookings
        .route("/api/v1/bookings", post(booking::create_booking))
        .route("/api/v1/bookings/mine", get(booking::list_my_bookings))
        .route("/api/v1/bookings/{booking_id}/cancel", post(booking::cancel_booking))

        // Realtime
        .route("/api/v1/changes", get(changes::stream_changes))

        // Admin
        .route("/api/v1/admin/venues", post(admin::create_venue).get(admin::list_venues))
        .route("/api/v1/admin/venues/{venue_id}", put(admin::update_venue).delete(admin::delete_venue))
        .route("/api/v1/admin/sports", post(admin::create_sport))
        .route("/api/v1/admin/sports/{sport_id}", put(admin::update_sport).delete(admin::delete_sport))
        .route("/api/v1/admin/venues/{venue_id}/sports/{sport_id}", put(admin::link_sport).delete(admin::unlink_sport))
        .route("/api/v1/admin/venues/{venue_id}/timings", get(admin::get_timings).put(admin::replace_timings))
        .route("/api/v1/admin/venues/{venue_id}/pricing", get(admin::get_pricing))
        .route("/api/v1/admin/bookings", get(admin::list_bookings))
        .route("/api/v1/admin/bookings/{booking_id}", put(admin::update_booking))
        .route("/api/v1/admin/profiles/{user_id}/role", put(admin::set_role))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
