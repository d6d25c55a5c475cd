use venue_booking::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::{
        profile::{Profile, Role},
        venue::{Sport, Venue, VenueSport},
    },
    infra::{factory::sqlite_repositories, realtime::broadcast_feed::BroadcastChangeFeed},
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use jsonwebtoken::{encode, EncodingKey, Header};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::{json, Value};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-with-enough-length";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret: TEST_JWT_SECRET.to_string(),
            auth_audience: "authenticated".to_string(),
            venue_timezone: chrono_tz::Asia::Kolkata,
            booking_horizon_days: 30,
            change_feed_capacity: 64,
        };

        let state = Arc::new(AppState::assemble(
            config,
            sqlite_repositories(pool.clone()),
            Arc::new(BroadcastChangeFeed::new(64)),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Bearer token for `user_id` as the identity provider would issue it.
    pub fn token_for(&self, user_id: &str) -> String {
        let claims = json!({
            "sub": user_id,
            "aud": "authenticated",
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
            "email": format!("{}@example.com", user_id),
        });
        encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes())).unwrap()
    }

    /// Token for a fresh user with the admin role on file.
    pub async fn admin_token(&self) -> String {
        let admin_id = Uuid::new_v4().to_string();
        self.state.profile_repo
            .upsert(&Profile::new(admin_id.clone(), "admin@example.com".into(), Role::Admin))
            .await
            .unwrap();
        self.token_for(&admin_id)
    }

    pub async fn seed_venue_with_sport(&self) -> (String, String) {
        let venue = self.state.venue_repo
            .create(&Venue::new("Green Turf".into(), "12 Park Road".into(), "Indiranagar".into(), vec![]))
            .await
            .unwrap();
        let sport = self.state.sport_repo
            .create(&Sport::new(format!("Football {}", &venue.id[..8]), None))
            .await
            .unwrap();
        self.state.sport_repo
            .link(&VenueSport::new(venue.id.clone(), sport.id.clone()))
            .await
            .unwrap();
        (venue.id, sport.id)
    }

    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Slots for the key, generating them on first call.
    pub async fn slots(&self, venue_id: &str, sport_id: &str, date: NaiveDate) -> Vec<Value> {
        let response = self.send(
            "GET",
            &format!("/api/v1/venues/{}/sports/{}/slots?date={}", venue_id, sport_id, date),
            None,
            None,
        ).await;
        assert_eq!(response.status(), 200);
        parse_body(response).await["slots"].as_array().unwrap().clone()
    }

    pub async fn book(&self, token: &str, slot_id: &str) -> Response {
        self.send("POST", "/api/v1/bookings", Some(token), Some(json!({
            "slot_id": slot_id,
            "full_name": "Asha Rao",
            "phone": "98765 43210",
        }))).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn venue_today() -> NaiveDate {
    let tz: Tz = chrono_tz::Asia::Kolkata;
    Utc::now().with_timezone(&tz).date_naive()
}

/// Next date strictly after today falling on `day`.
#[allow(dead_code)]
pub fn next_weekday(day: Weekday) -> NaiveDate {
    let mut date = venue_today() + Duration::days(1);
    while date.weekday() != day {
        date += Duration::days(1);
    }
    date
}
