mod common;

use axum::http::StatusCode;
use chrono::{Duration, Weekday};
use common::{next_weekday, parse_body, venue_today, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let app = TestApp::new().await;
    let user_token = app.token_for("plain-user");

    let anonymous = app.send("GET", "/api/v1/admin/bookings", None, None).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let user = app.send("GET", "/api/v1/admin/bookings", Some(&user_token), None).await;
    assert_eq!(user.status(), StatusCode::FORBIDDEN);

    let create = app.send("POST", "/api/v1/admin/venues", Some(&user_token), Some(json!({
        "name": "Sneaky", "address": "-", "location": "-"
    }))).await;
    assert_eq!(create.status(), StatusCode::FORBIDDEN);

    let admin = app.send("GET", "/api/v1/admin/bookings", Some(&app.admin_token().await), None).await;
    assert_eq!(admin.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_catalogue_management() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let venue = app.send("POST", "/api/v1/admin/venues", Some(&token), Some(json!({
        "name": "  City Arena ",
        "address": "4 MG Road",
        "location": "Koramangala",
        "images": ["https://img.example.com/arena.jpg"]
    }))).await;
    assert_eq!(venue.status(), StatusCode::CREATED);
    let venue = parse_body(venue).await;
    let venue_id = venue["id"].as_str().unwrap();
    assert_eq!(venue["name"], "City Arena");
    assert_eq!(venue["images"][0], "https://img.example.com/arena.jpg");

    let sport = parse_body(app.send("POST", "/api/v1/admin/sports", Some(&token), Some(json!({
        "name": "Badminton", "description": "Indoor courts"
    }))).await).await;
    let sport_id = sport["id"].as_str().unwrap();

    let duplicate = app.send("POST", "/api/v1/admin/sports", Some(&token), Some(json!({ "name": "Badminton" }))).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let link_uri = format!("/api/v1/admin/venues/{}/sports/{}", venue_id, sport_id);
    assert_eq!(app.send("PUT", &link_uri, Some(&token), None).await.status(), StatusCode::OK);
    assert_eq!(app.send("PUT", &link_uri, Some(&token), None).await.status(), StatusCode::OK);

    let offered = parse_body(app.send("GET", &format!("/api/v1/venues/{}/sports", venue_id), None, None).await).await;
    assert_eq!(offered.as_array().unwrap().len(), 1);
    assert_eq!(offered[0]["name"], "Badminton");

    let renamed = app.send("PUT", &format!("/api/v1/admin/venues/{}", venue_id), Some(&token), Some(json!({
        "name": "City Arena North"
    }))).await;
    assert_eq!(renamed.status(), StatusCode::OK);
    let renamed = parse_body(renamed).await;
    assert_eq!(renamed["name"], "City Arena North");
    assert_eq!(renamed["address"], "4 MG Road");

    let blank = app.send("PUT", &format!("/api/v1/admin/sports/{}", sport_id), Some(&token), Some(json!({ "name": " " }))).await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.send("DELETE", &link_uri, Some(&token), None).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.send("DELETE", &link_uri, Some(&token), None).await.status(), StatusCode::NOT_FOUND);

    let delete = app.send("DELETE", &format!("/api/v1/admin/venues/{}", venue_id), Some(&token), None).await;
    assert_eq!(delete.status(), StatusCode::NO_CONTENT);
    let gone = app.send("GET", &format!("/api/v1/venues/{}", venue_id), None, None).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_venue_with_bookings_cannot_be_deleted() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (venue_id, sport_id) = app.seed_venue_with_sport().await;
    let slots = app.slots(&venue_id, &sport_id, venue_today() + Duration::days(1)).await;
    app.book(&app.token_for("user-1"), slots[0]["id"].as_str().unwrap()).await;

    let response = app.send("DELETE", &format!("/api/v1/admin/venues/{}", venue_id), Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_timings_are_validated_and_replaced() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (venue_id, sport_id) = app.seed_venue_with_sport().await;
    let uri = format!("/api/v1/admin/venues/{}/timings", venue_id);

    let inverted = app.send("PUT", &uri, Some(&token), Some(json!({
        "timings": [{ "day_of_week": "friday", "start_time": "20:00", "end_time": "18:00", "is_morning": false }]
    }))).await;
    assert_eq!(inverted.status(), StatusCode::BAD_REQUEST);

    let replaced = app.send("PUT", &uri, Some(&token), Some(json!({
        "timings": [
            { "day_of_week": "Friday", "start_time": "06:00", "end_time": "08:00", "is_morning": true },
            { "day_of_week": "friday", "start_time": "18:00", "end_time": "20:00", "is_morning": false }
        ]
    }))).await;
    assert_eq!(replaced.status(), StatusCode::OK);
    assert_eq!(parse_body(replaced).await.as_array().unwrap().len(), 2);

    let slots = app.slots(&venue_id, &sport_id, next_weekday(Weekday::Fri)).await;
    assert_eq!(slots.len(), 8);
    assert_eq!(slots[4]["start_time"], "18:00:00");
    assert_eq!(slots[4]["price"], 650);

    let listed = parse_body(app.send("GET", &uri, Some(&token), None).await).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let pricing = parse_body(app.send("GET", &format!("/api/v1/admin/venues/{}/pricing", venue_id), Some(&token), None).await).await;
    assert_eq!(pricing[0]["price"], 500);

    let clashing = app.send("PUT", &uri, Some(&token), Some(json!({
        "timings": [
            { "day_of_week": "monday", "start_time": "06:00", "end_time": "08:00", "is_morning": true },
            { "day_of_week": "monday", "start_time": "06:00", "end_time": "09:00", "is_morning": true }
        ]
    }))).await;
    assert_eq!(clashing.status(), StatusCode::CONFLICT);
    let kept = parse_body(app.send("GET", &uri, Some(&token), None).await).await;
    assert_eq!(kept.as_array().unwrap().len(), 2);

    let missing = app.send("PUT", "/api/v1/admin/venues/nope/timings", Some(&token), Some(json!({ "timings": [] }))).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_status_changes_drive_availability() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (venue_id, sport_id) = app.seed_venue_with_sport().await;
    let slots = app.slots(&venue_id, &sport_id, venue_today() + Duration::days(1)).await;
    let slot_id = slots[7]["id"].as_str().unwrap();
    let slot_uri = format!("/api/v1/slots/{}", slot_id);

    let booking = parse_body(app.book(&app.token_for("user-1"), slot_id).await).await;
    let booking_uri = format!("/api/v1/admin/bookings/{}", booking["id"].as_str().unwrap());

    // Completed is display-only.
    let completed = app.send("PUT", &booking_uri, Some(&token), Some(json!({ "status": "completed" }))).await;
    assert_eq!(completed.status(), StatusCode::OK);
    assert_eq!(parse_body(completed).await["status"], "confirmed");
    assert_eq!(parse_body(app.send("GET", &slot_uri, None, None).await).await["available"], false);

    let cancelled = app.send("PUT", &booking_uri, Some(&token), Some(json!({ "status": "cancelled" }))).await;
    assert_eq!(parse_body(cancelled).await["status"], "cancelled");
    assert_eq!(parse_body(app.send("GET", &slot_uri, None, None).await).await["available"], true);

    let confirmed = app.send("PUT", &booking_uri, Some(&token), Some(json!({ "status": "confirmed" }))).await;
    assert_eq!(parse_body(confirmed).await["status"], "confirmed");
    assert_eq!(parse_body(app.send("GET", &slot_uri, None, None).await).await["available"], false);

    let bogus = app.send("PUT", &booking_uri, Some(&token), Some(json!({ "status": "archived" }))).await;
    assert_eq!(bogus.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reconfirm_rejected_once_slot_is_rebooked() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (venue_id, sport_id) = app.seed_venue_with_sport().await;
    let slots = app.slots(&venue_id, &sport_id, venue_today() + Duration::days(1)).await;
    let slot_id = slots[12]["id"].as_str().unwrap();

    let first = parse_body(app.book(&app.token_for("user-1"), slot_id).await).await;
    let first_uri = format!("/api/v1/admin/bookings/{}", first["id"].as_str().unwrap());
    app.send("PUT", &first_uri, Some(&token), Some(json!({ "status": "cancelled" }))).await;

    let second = app.book(&app.token_for("user-2"), slot_id).await;
    assert_eq!(second.status(), StatusCode::CREATED);

    let reconfirm = app.send("PUT", &first_uri, Some(&token), Some(json!({ "status": "confirmed" }))).await;
    assert_eq!(reconfirm.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_booking_list_filters_by_status() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (venue_id, sport_id) = app.seed_venue_with_sport().await;
    let slots = app.slots(&venue_id, &sport_id, venue_today() + Duration::days(1)).await;
    let user = app.token_for("user-1");

    app.book(&user, slots[0]["id"].as_str().unwrap()).await;
    let to_cancel = parse_body(app.book(&user, slots[1]["id"].as_str().unwrap()).await).await;
    app.send("POST", &format!("/api/v1/bookings/{}/cancel", to_cancel["id"].as_str().unwrap()), Some(&user), None).await;

    let all = parse_body(app.send("GET", "/api/v1/admin/bookings", Some(&token), None).await).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let cancelled = parse_body(app.send("GET", "/api/v1/admin/bookings?status=cancelled", Some(&token), None).await).await;
    assert_eq!(cancelled.as_array().unwrap().len(), 1);
    assert_eq!(cancelled[0]["id"], to_cancel["id"]);

    let bad = app.send("GET", "/api/v1/admin/bookings?status=completed", Some(&token), None).await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_role_can_be_granted_and_revoked() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let member = app.token_for("member-1");
    let uri = "/api/v1/admin/profiles/member-1/role";

    let denied = app.send("PUT", uri, Some(&member), Some(json!({ "role": "admin" }))).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let invalid = app.send("PUT", uri, Some(&admin), Some(json!({ "role": "owner" }))).await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let granted = app.send("PUT", uri, Some(&admin), Some(json!({ "role": "admin", "email": "member@example.com" }))).await;
    assert_eq!(granted.status(), StatusCode::OK);
    let profile = parse_body(granted).await;
    assert_eq!(profile["role"], "admin");
    assert_eq!(profile["email"], "member@example.com");

    let listing = app.send("GET", "/api/v1/admin/bookings", Some(&member), None).await;
    assert_eq!(listing.status(), StatusCode::OK);

    let revoked = parse_body(app.send("PUT", uri, Some(&admin), Some(json!({ "role": "user" }))).await).await;
    assert_eq!(revoked["role"], "user");
    assert_eq!(revoked["email"], "member@example.com");

    let listing = app.send("GET", "/api/v1/admin/bookings", Some(&member), None).await;
    assert_eq!(listing.status(), StatusCode::FORBIDDEN);
}
