use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct VenueTiming {
    pub id: String,
    pub venue_id: String,
    pub day_of_week: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_morning: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VenueTiming {
    pub fn new(venue_id: String, day: Weekday, start_time: NaiveTime, end_time: NaiveTime, is_morning: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            venue_id,
            day_of_week: day_name(day).to_string(),
            start_time,
            end_time,
            is_morning,
            created_at: now,
            updated_at: now,
        }
    }
}

pub const WEEK: [Weekday; 7] = [
    Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu,
    Weekday::Fri, Weekday::Sat, Weekday::Sun,
];

/// Lowercase English day name, the form stored in `venue_timings.day_of_week`.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

pub fn parse_day(name: &str) -> Option<Weekday> {
    WEEK.iter().copied().find(|d| day_name(*d).eq_ignore_ascii_case(name.trim()))
}
