use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Slot {
    pub id: String,
    pub venue_id: String,
    pub sport_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub price: i32,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewSlotParams<'a> {
    pub venue_id: &'a str,
    pub sport_id: &'a str,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub price: i32,
}

impl Slot {
    pub fn new(params: NewSlotParams<'_>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            venue_id: params.venue_id.to_string(),
            sport_id: params.sport_id.to_string(),
            date: params.date,
            start_time: params.start_time,
            end_time: params.end_time,
            price: params.price,
            available: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Venue-local `"YYYY-MM-DD HH:MM:SS"`, as copied onto bookings.
    pub fn slot_time(&self) -> String {
        format!("{} {}", self.date.format("%Y-%m-%d"), self.start_time.format("%H:%M:%S"))
    }
}
