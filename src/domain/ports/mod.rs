use crate::domain::models::{
    venue::{Venue, Sport, VenueSport}, timing::VenueTiming, pricing::VenuePricing,
    slot::Slot, booking::{Booking, BookingStatus}, profile::Profile,
    change::{ChangeEvent, ChangeFilter, ChangeSubscription}
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait VenueRepository: Send + Sync {
    async fn create(&self, venue: &Venue) -> Result<Venue, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Venue>, AppError>;
    async fn list(&self) -> Result<Vec<Venue>, AppError>;
    async fn update(&self, venue: &Venue) -> Result<Venue, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait SportRepository: Send + Sync {
    async fn create(&self, sport: &Sport) -> Result<Sport, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Sport>, AppError>;
    async fn list(&self) -> Result<Vec<Sport>, AppError>;
    async fn update(&self, sport: &Sport) -> Result<Sport, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list_by_venue(&self, venue_id: &str) -> Result<Vec<Sport>, AppError>;
    async fn link(&self, link: &VenueSport) -> Result<VenueSport, AppError>;
    async fn unlink(&self, venue_id: &str, sport_id: &str) -> Result<(), AppError>;
    async fn is_offered(&self, venue_id: &str, sport_id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait VenueTimingRepository: Send + Sync {
    async fn list_by_venue(&self, venue_id: &str) -> Result<Vec<VenueTiming>, AppError>;
    async fn list_by_day(&self, venue_id: &str, day_of_week: &str) -> Result<Vec<VenueTiming>, AppError>;
    /// Rows whose (venue, day, start) key already exists are skipped.
    async fn create_many(&self, timings: &[VenueTiming]) -> Result<(), AppError>;
    async fn replace_for_venue(&self, venue_id: &str, timings: &[VenueTiming]) -> Result<Vec<VenueTiming>, AppError>;
}

#[async_trait]
pub trait VenuePricingRepository: Send + Sync {
    async fn list_by_venue(&self, venue_id: &str) -> Result<Vec<VenuePricing>, AppError>;
    /// Rules already on file for the same (venue, day group, band, range) are skipped.
    async fn create_many(&self, rules: &[VenuePricing]) -> Result<(), AppError>;
}

#[async_trait]
pub trait SlotRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Slot>, AppError>;
    async fn list_for_day(&self, venue_id: &str, sport_id: &str, date: NaiveDate) -> Result<Vec<Slot>, AppError>;
    /// Inserts one batch atomically. Rows whose (venue, sport, date, start) key already
    /// exists are skipped and missing from the result.
    async fn insert_batch(&self, slots: &[Slot]) -> Result<Vec<Slot>, AppError>;
    async fn set_available(&self, id: &str, available: bool) -> Result<Option<Slot>, AppError>;
    /// Flips `available` from true to false. `None` if the slot is missing or already taken.
    async fn claim(&self, id: &str) -> Result<Option<Slot>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_all(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>, AppError>;
    async fn update_status(&self, id: &str, status: BookingStatus) -> Result<Booking, AppError>;
    async fn find_confirmed_by_slot(&self, slot_id: &str) -> Result<Option<Booking>, AppError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, AppError>;
    async fn upsert(&self, profile: &Profile) -> Result<Profile, AppError>;
}

pub trait ChangeFeed: Send + Sync {
    fn publish(&self, event: ChangeEvent);
    fn subscribe(&self, filter: ChangeFilter) -> ChangeSubscription;
}
