use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use super::slot::Slot;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub venue_id: String,
    pub sport_id: String,
    pub slot_id: Option<String>,
    pub slot_time: String,
    pub status: String,
    pub full_name: String,
    pub phone: String,
    pub amount: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub user_id: String,
    pub full_name: String,
    pub phone: String,
}

impl Booking {
    /// A confirmed booking for `slot`, charged at the slot's price.
    pub fn for_slot(slot: &Slot, params: NewBookingParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: params.user_id,
            venue_id: slot.venue_id.clone(),
            sport_id: slot.sport_id.clone(),
            slot_id: Some(slot.id.clone()),
            slot_time: slot.slot_time(),
            status: BookingStatus::Confirmed.as_str().to_string(),
            full_name: params.full_name,
            phone: params.phone,
            amount: slot.price,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> Option<BookingStatus> {
        self.status.parse().ok()
    }
}

/// Status values the store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status '{}'", other)),
        }
    }
}

/// Status as chosen in the admin panel. `Completed` is display-only and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestedStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl FromStr for RequestedStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confirmed" => Ok(RequestedStatus::Confirmed),
            "cancelled" => Ok(RequestedStatus::Cancelled),
            "completed" => Ok(RequestedStatus::Completed),
            other => Err(format!("unknown booking status '{}'", other)),
        }
    }
}

impl RequestedStatus {
    pub fn persisted(self) -> Option<BookingStatus> {
        match self {
            RequestedStatus::Confirmed => Some(BookingStatus::Confirmed),
            RequestedStatus::Cancelled => Some(BookingStatus::Cancelled),
            RequestedStatus::Completed => None,
        }
    }
}
