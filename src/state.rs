use std::sync::Arc;
use crate::domain::ports::{
    BookingRepository, ChangeFeed, ProfileRepository, SlotRepository, SportRepository,
    VenuePricingRepository, VenueRepository, VenueTimingRepository,
};
use crate::domain::services::{
    booking_writer::BookingWriter, reconciler::AvailabilityReconciler, slot_generator::SlotGenerator,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub venue_repo: Arc<dyn VenueRepository>,
    pub sport_repo: Arc<dyn SportRepository>,
    pub timing_repo: Arc<dyn VenueTimingRepository>,
    pub pricing_repo: Arc<dyn VenuePricingRepository>,
    pub slot_repo: Arc<dyn SlotRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub change_feed: Arc<dyn ChangeFeed>,
    pub slot_generator: Arc<SlotGenerator>,
    pub booking_writer: Arc<BookingWriter>,
}

/// Repository set for one backend.
pub struct Repositories {
    pub venue_repo: Arc<dyn VenueRepository>,
    pub sport_repo: Arc<dyn SportRepository>,
    pub timing_repo: Arc<dyn VenueTimingRepository>,
    pub pricing_repo: Arc<dyn VenuePricingRepository>,
    pub slot_repo: Arc<dyn SlotRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
}

impl AppState {
    /// Wires the domain services on top of a repository set.
    pub fn assemble(config: Config, repos: Repositories, change_feed: Arc<dyn ChangeFeed>) -> Self {
        let slot_generator = Arc::new(SlotGenerator::new(
            repos.venue_repo.clone(),
            repos.sport_repo.clone(),
            repos.timing_repo.clone(),
            repos.pricing_repo.clone(),
            repos.slot_repo.clone(),
            change_feed.clone(),
        ));
        let reconciler = Arc::new(AvailabilityReconciler::new(repos.slot_repo.clone(), change_feed.clone()));
        let booking_writer = Arc::new(BookingWriter::new(
            repos.slot_repo.clone(),
            repos.booking_repo.clone(),
            reconciler,
            change_feed.clone(),
            config.venue_timezone,
        ));

        Self {
            config,
            venue_repo: repos.venue_repo,
            sport_repo: repos.sport_repo,
            timing_repo: repos.timing_repo,
            pricing_repo: repos.pricing_repo,
            slot_repo: repos.slot_repo,
            booking_repo: repos.booking_repo,
            profile_repo: repos.profile_repo,
            change_feed,
            slot_generator,
            booking_writer,
        }
    }
}
