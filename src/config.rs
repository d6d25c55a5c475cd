use std::env;
use chrono_tz::Tz;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String, // HS256 secret shared with the identity provider
    pub auth_audience: String,
    pub venue_timezone: Tz,
    pub booking_horizon_days: i64,
    pub change_feed_capacity: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_secret: env::var("AUTH_JWT_SECRET").expect("AUTH_JWT_SECRET must be set"),
            auth_audience: env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "authenticated".to_string()),
            venue_timezone: env::var("VENUE_TIMEZONE")
                .unwrap_or_else(|_| "Asia/Kolkata".to_string())
                .parse()
                .expect("VENUE_TIMEZONE must be an IANA time zone name"),
            booking_horizon_days: env::var("BOOKING_HORIZON_DAYS").unwrap_or_else(|_| "30".to_string()).parse().expect("BOOKING_HORIZON_DAYS must be a number"),
            change_feed_capacity: env::var("CHANGE_FEED_CAPACITY").unwrap_or_else(|_| "256".to_string()).parse().expect("CHANGE_FEED_CAPACITY must be a number"),
        }
    }
}
