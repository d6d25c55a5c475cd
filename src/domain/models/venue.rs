use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: String,
    pub images: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Venue {
    pub fn new(name: String, address: String, location: String, images: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            address,
            location,
            images: Json(images),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Sport {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sport {
    pub fn new(name: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A sport offered at a venue.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct VenueSport {
    pub id: String,
    pub venue_id: String,
    pub sport_id: String,
    pub created_at: DateTime<Utc>,
}

impl VenueSport {
    pub fn new(venue_id: String, sport_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            venue_id,
            sport_id,
            created_at: Utc::now(),
        }
    }
}
