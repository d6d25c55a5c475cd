pub mod sqlite_venue_repo;
pub mod sqlite_sport_repo;
pub mod sqlite_timing_repo;
pub mod sqlite_pricing_repo;
pub mod sqlite_slot_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_profile_repo;

pub mod postgres_venue_repo;
pub mod postgres_sport_repo;
pub mod postgres_timing_repo;
pub mod postgres_pricing_repo;
pub mod postgres_slot_repo;
pub mod postgres_booking_repo;
pub mod postgres_profile_repo;
