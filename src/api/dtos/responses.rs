use serde::Serialize;
use chrono::NaiveDate;
use crate::domain::models::{slot::Slot, venue::{Sport, Venue}};

#[derive(Serialize)]
pub struct SlotsResponse {
    pub venue_id: String,
    pub sport_id: String,
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}

#[derive(Serialize)]
pub struct VenueDetailResponse {
    #[serde(flatten)]
    pub venue: Venue,
    pub sports: Vec<Sport>,
}
