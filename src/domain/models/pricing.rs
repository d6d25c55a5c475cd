use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-venue rate card row. Seeded and listed, never consulted when pricing a slot.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct VenuePricing {
    pub id: String,
    pub venue_id: String,
    pub day_group: String,
    pub is_morning: bool,
    pub time_range: String,
    pub price: i32,
    pub per_duration: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewPricingParams {
    pub venue_id: String,
    pub day_group: String,
    pub is_morning: bool,
    pub time_range: String,
    pub price: i32,
    pub per_duration: String,
}

impl VenuePricing {
    pub fn new(params: NewPricingParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            venue_id: params.venue_id,
            day_group: params.day_group,
            is_morning: params.is_morning,
            time_range: params.time_range,
            price: params.price,
            per_duration: params.per_duration,
            created_at: now,
            updated_at: now,
        }
    }
}
