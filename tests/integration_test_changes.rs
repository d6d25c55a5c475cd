mod common;

use axum::{http::{header, StatusCode}, response::Response};
use chrono::Duration;
use common::{parse_body, venue_today, TestApp};
use futures::StreamExt;
use std::time::Duration as StdDuration;
use tokio::time::timeout;
use venue_booking::domain::models::change::{ChangeFilter, ChangeKind, Table};

#[tokio::test]
async fn test_booking_insert_reaches_slot_subscriber() {
    let app = TestApp::new().await;
    let (venue_id, sport_id) = app.seed_venue_with_sport().await;
    let slots = app.slots(&venue_id, &sport_id, venue_today() + Duration::days(1)).await;
    let slot_id = slots[0]["id"].as_str().unwrap();
    let other_slot_id = slots[1]["id"].as_str().unwrap();

    let mut bookings = app.state.change_feed.subscribe(ChangeFilter::column_eq(Table::Bookings, "slot_id", slot_id));
    let token = app.token_for("user-1");

    app.book(&token, other_slot_id).await;
    let booking = parse_body(app.book(&token, slot_id).await).await;

    let event = timeout(StdDuration::from_secs(2), bookings.next()).await
        .expect("no booking event within timeout")
        .expect("feed closed");
    assert_eq!(event.kind, ChangeKind::Insert);
    assert_eq!(event.record["id"], booking["id"]);
    assert_eq!(event.record["slot_id"], slot_id);
}

#[tokio::test]
async fn test_slot_flip_is_published_after_booking() {
    let app = TestApp::new().await;
    let (venue_id, sport_id) = app.seed_venue_with_sport().await;
    let slots = app.slots(&venue_id, &sport_id, venue_today() + Duration::days(1)).await;
    let slot_id = slots[20]["id"].as_str().unwrap();

    let mut slot_changes = app.state.change_feed.subscribe(ChangeFilter::column_eq(Table::Slots, "id", slot_id));
    let token = app.token_for("user-1");
    let booking = parse_body(app.book(&token, slot_id).await).await;

    let taken = timeout(StdDuration::from_secs(2), slot_changes.next()).await.unwrap().unwrap();
    assert_eq!(taken.kind, ChangeKind::Update);
    assert_eq!(taken.record["available"], false);
    assert_eq!(taken.old_record.as_ref().unwrap()["available"], true);

    app.send("POST", &format!("/api/v1/bookings/{}/cancel", booking["id"].as_str().unwrap()), Some(&token), None).await;

    let released = timeout(StdDuration::from_secs(2), slot_changes.next()).await.unwrap().unwrap();
    assert_eq!(released.record["available"], true);
}

#[tokio::test]
async fn test_generated_slots_are_published() {
    let app = TestApp::new().await;
    let (venue_id, sport_id) = app.seed_venue_with_sport().await;
    let mut inserts = app.state.change_feed.subscribe(ChangeFilter::table(Table::Slots));

    let slots = app.slots(&venue_id, &sport_id, venue_today() + Duration::days(3)).await;

    let first = timeout(StdDuration::from_secs(2), inserts.next()).await.unwrap().unwrap();
    assert_eq!(first.kind, ChangeKind::Insert);
    assert_eq!(first.record["id"], slots[0]["id"]);
}

/// Reads SSE frames until one mentions `needle`, returning everything read so far.
async fn read_until(response: Response, needle: &str) -> String {
    let mut body = response.into_body().into_data_stream();
    let mut seen = String::new();
    while !seen.contains(needle) {
        let chunk = timeout(StdDuration::from_secs(2), body.next()).await
            .unwrap_or_else(|_| panic!("no frame containing {} within timeout, got: {}", needle, seen))
            .expect("stream ended")
            .unwrap();
        seen.push_str(&String::from_utf8_lossy(&chunk));
    }
    seen
}

#[tokio::test]
async fn test_sse_endpoint() {
    let app = TestApp::new().await;
    let token = app.token_for("user-1");

    let stream = app.send("GET", "/api/v1/changes?table=bookings&column=slot_id&value=abc", Some(&token), None).await;
    assert_eq!(stream.status(), StatusCode::OK);
    assert_eq!(stream.headers()[header::CONTENT_TYPE], "text/event-stream");

    let unknown = app.send("GET", "/api/v1/changes?table=venues", Some(&token), None).await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

    let half_filter = app.send("GET", "/api/v1/changes?table=slots&column=id", Some(&token), None).await;
    assert_eq!(half_filter.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_change_stream_requires_a_token() {
    let app = TestApp::new().await;

    let anonymous = app.send("GET", "/api/v1/changes?table=bookings", None, None).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let slots = app.send("GET", "/api/v1/changes?table=slots", None, None).await;
    assert_eq!(slots.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_users_cannot_follow_someone_elses_bookings() {
    let app = TestApp::new().await;
    let token = app.token_for("user-1");

    let response = app.send("GET", "/api/v1/changes?table=bookings&column=user_id&value=user-2", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let own = app.send("GET", "/api/v1/changes?table=bookings&column=user_id&value=user-1", Some(&token), None).await;
    assert_eq!(own.status(), StatusCode::OK);

    let admin = app.admin_token().await;
    let any = app.send("GET", "/api/v1/changes?table=bookings&column=user_id&value=user-2", Some(&admin), None).await;
    assert_eq!(any.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_booking_stream_only_carries_own_bookings() {
    let app = TestApp::new().await;
    let (venue_id, sport_id) = app.seed_venue_with_sport().await;
    let slots = app.slots(&venue_id, &sport_id, venue_today() + Duration::days(1)).await;

    let watcher = app.token_for("watcher");
    let stream = app.send("GET", "/api/v1/changes?table=bookings", Some(&watcher), None).await;
    assert_eq!(stream.status(), StatusCode::OK);

    let other = app.token_for("someone-else");
    assert_eq!(app.book(&other, slots[0]["id"].as_str().unwrap()).await.status(), StatusCode::CREATED);
    assert_eq!(app.book(&watcher, slots[1]["id"].as_str().unwrap()).await.status(), StatusCode::CREATED);

    let frames = read_until(stream, "\"user_id\":\"watcher\"").await;
    assert!(!frames.contains("someone-else"), "foreign booking leaked: {}", frames);
    assert!(frames.contains(slots[1]["id"].as_str().unwrap()));
}

#[tokio::test]
async fn test_admin_stream_sees_every_booking() {
    let app = TestApp::new().await;
    let (venue_id, sport_id) = app.seed_venue_with_sport().await;
    let slots = app.slots(&venue_id, &sport_id, venue_today() + Duration::days(1)).await;

    let admin = app.admin_token().await;
    let stream = app.send("GET", "/api/v1/changes?table=bookings", Some(&admin), None).await;

    let token = app.token_for("user-1");
    assert_eq!(app.book(&token, slots[0]["id"].as_str().unwrap()).await.status(), StatusCode::CREATED);

    let frames = read_until(stream, "\"user_id\":\"user-1\"").await;
    assert!(frames.contains("event: INSERT"));
}
