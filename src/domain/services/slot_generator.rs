use std::sync::Arc;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::models::{
    change::{ChangeEvent, Table},
    pricing::VenuePricing,
    slot::{NewSlotParams, Slot},
    timing::{day_name, VenueTiming},
};
use crate::domain::ports::{
    ChangeFeed, SlotRepository, SportRepository, VenuePricingRepository, VenueRepository,
    VenueTimingRepository,
};
use crate::domain::services::{defaults, pricing::resolve_price};
use crate::error::AppError;

pub const SLOT_MINUTES: i64 = 30;
pub const INSERT_BATCH_SIZE: usize = 10;

/// Outcome of one generation run. `slots` holds only rows this run inserted.
#[derive(Debug, Default, Serialize)]
pub struct GenerationReport {
    pub slots: Vec<Slot>,
    pub candidates: usize,
    pub failed_batches: usize,
    pub skipped_existing: usize,
}

/// Half-hour windows for every timing row of the day, priced and marked available.
/// A trailing window shorter than 30 minutes is dropped.
pub fn build_candidates(venue_id: &str, sport_id: &str, date: NaiveDate, timings: &[VenueTiming]) -> Vec<Slot> {
    let day = date.weekday();
    let step = Duration::minutes(SLOT_MINUTES);
    let mut candidates: Vec<Slot> = Vec::new();

    for timing in timings {
        if timing.start_time >= timing.end_time {
            warn!("Skipping timing {} with start {} not before end {}", timing.id, timing.start_time, timing.end_time);
            continue;
        }

        let mut cursor = timing.start_time;
        loop {
            let (end, wrapped) = cursor.overflowing_add_signed(step);
            if wrapped != 0 || end > timing.end_time {
                break;
            }
            if !candidates.iter().any(|c| c.start_time == cursor) {
                candidates.push(Slot::new(NewSlotParams {
                    venue_id,
                    sport_id,
                    date,
                    start_time: cursor,
                    end_time: end,
                    price: resolve_price(day, cursor, timing.is_morning),
                }));
            }
            cursor = end;
        }
    }

    candidates.sort_by_key(|s| s.start_time);
    candidates
}

pub struct SlotGenerator {
    venue_repo: Arc<dyn VenueRepository>,
    sport_repo: Arc<dyn SportRepository>,
    timing_repo: Arc<dyn VenueTimingRepository>,
    pricing_repo: Arc<dyn VenuePricingRepository>,
    slot_repo: Arc<dyn SlotRepository>,
    change_feed: Arc<dyn ChangeFeed>,
}

impl SlotGenerator {
    pub fn new(
        venue_repo: Arc<dyn VenueRepository>,
        sport_repo: Arc<dyn SportRepository>,
        timing_repo: Arc<dyn VenueTimingRepository>,
        pricing_repo: Arc<dyn VenuePricingRepository>,
        slot_repo: Arc<dyn SlotRepository>,
        change_feed: Arc<dyn ChangeFeed>,
    ) -> Self {
        Self { venue_repo, sport_repo, timing_repo, pricing_repo, slot_repo, change_feed }
    }

    /// Slots for (venue, sport, date), generating them on the first request for the key.
    /// The venue must offer the sport.
    pub async fn slots_for_day(&self, venue_id: &str, sport_id: &str, date: NaiveDate) -> Result<Vec<Slot>, AppError> {
        if !self.sport_repo.is_offered(venue_id, sport_id).await? {
            self.venue_repo.find_by_id(venue_id).await?
                .ok_or(AppError::NotFound("Venue not found".into()))?;
            self.sport_repo.find_by_id(sport_id).await?
                .ok_or(AppError::NotFound("Sport not found".into()))?;
            return Err(AppError::NotFound("Sport not offered at this venue".into()));
        }

        let existing = self.slot_repo.list_for_day(venue_id, sport_id, date).await?;
        if !existing.is_empty() {
            debug!("Found {} existing slots for {}/{} on {}", existing.len(), venue_id, sport_id, date);
            return Ok(existing);
        }

        let report = self.generate_slots(venue_id, sport_id, date).await?;

        if report.skipped_existing > 0 {
            info!(
                "Another request generated slots for {}/{} on {} first, re-reading",
                venue_id, sport_id, date
            );
            return self.slot_repo.list_for_day(venue_id, sport_id, date).await;
        }

        Ok(report.slots)
    }

    /// Materializes the day's slots. Callers check for existing rows first.
    pub async fn generate_slots(&self, venue_id: &str, sport_id: &str, date: NaiveDate) -> Result<GenerationReport, AppError> {
        let day = date.weekday();
        let timings = self.ensure_timings(venue_id, day).await?;
        let rules = self.ensure_pricing(venue_id).await?;
        debug!("Venue {} has {} pricing rules on file", venue_id, rules.len());

        let candidates = build_candidates(venue_id, sport_id, date, &timings);
        let mut report = GenerationReport {
            candidates: candidates.len(),
            ..Default::default()
        };

        for (index, batch) in candidates.chunks(INSERT_BATCH_SIZE).enumerate() {
            match self.slot_repo.insert_batch(batch).await {
                Ok(inserted) => {
                    report.skipped_existing += batch.len() - inserted.len();
                    for slot in &inserted {
                        self.change_feed.publish(ChangeEvent::insert(Table::Slots, slot));
                    }
                    report.slots.extend(inserted);
                }
                Err(e) => {
                    warn!(batch = index, error = ?e, "Slot batch insert failed, continuing");
                    report.failed_batches += 1;
                }
            }
        }

        info!(
            venue_id, sport_id, %date,
            candidates = report.candidates,
            inserted = report.slots.len(),
            failed_batches = report.failed_batches,
            skipped = report.skipped_existing,
            "Slot generation finished"
        );
        Ok(report)
    }

    async fn ensure_timings(&self, venue_id: &str, day: Weekday) -> Result<Vec<VenueTiming>, AppError> {
        let rows = self.timing_repo.list_by_day(venue_id, day_name(day)).await?;
        if !rows.is_empty() {
            return Ok(rows);
        }

        let seeded = if self.timing_repo.list_by_venue(venue_id).await?.is_empty() {
            info!("Venue {} has no timings, seeding default week", venue_id);
            defaults::default_week(venue_id)
        } else {
            info!("Venue {} has no timings for {}, seeding defaults", venue_id, day_name(day));
            defaults::default_timings(venue_id, day)
        };
        self.timing_repo.create_many(&seeded).await?;

        // A concurrent request may have seeded first; what is stored wins.
        self.timing_repo.list_by_day(venue_id, day_name(day)).await
    }

    async fn ensure_pricing(&self, venue_id: &str) -> Result<Vec<VenuePricing>, AppError> {
        let rules = self.pricing_repo.list_by_venue(venue_id).await?;
        if !rules.is_empty() {
            return Ok(rules);
        }

        info!("Venue {} has no pricing, seeding default rule", venue_id);
        self.pricing_repo.create_many(&[defaults::default_pricing(venue_id)]).await?;
        self.pricing_repo.list_by_venue(venue_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use crate::domain::services::defaults::default_timings;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn sunday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_default_day_yields_34_contiguous_slots() {
        let date = sunday();
        let slots = build_candidates("v1", "s1", date, &default_timings("v1", date.weekday()));

        assert_eq!(slots.len(), 34);
        assert_eq!(slots.first().unwrap().start_time, t(6, 0));
        assert_eq!(slots.last().unwrap().end_time, t(23, 0));
        for pair in slots.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time, "gap or overlap at {}", pair[0].end_time);
        }
        assert!(slots.iter().all(|s| s.available && s.date == date));
    }

    #[test]
    fn test_morning_and_evening_counts() {
        let date = sunday();
        let timings = default_timings("v1", date.weekday());
        let morning = build_candidates("v1", "s1", date, &timings[..1]);
        let evening = build_candidates("v1", "s1", date, &timings[1..]);
        assert_eq!(morning.len(), 12);
        assert_eq!(evening.len(), 22);
    }

    #[test]
    fn test_partial_trailing_window_dropped() {
        let date = sunday();
        let timing = VenueTiming::new("v1".into(), date.weekday(), t(9, 0), t(10, 45), true);
        let slots = build_candidates("v1", "s1", date, &[timing]);
        let starts: Vec<_> = slots.iter().map(|s| s.start_time).collect();
        assert_eq!(starts, vec![t(9, 0), t(9, 30), t(10, 0)]);
    }

    #[test]
    fn test_window_ending_at_midnight_does_not_wrap() {
        let date = sunday();
        let timing = VenueTiming::new("v1".into(), date.weekday(), t(23, 0), t(23, 59), false);
        let slots = build_candidates("v1", "s1", date, &[timing]);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start_time, t(23, 0));
    }

    #[test]
    fn test_overlapping_rows_do_not_duplicate_starts() {
        let date = sunday();
        let a = VenueTiming::new("v1".into(), date.weekday(), t(8, 0), t(10, 0), true);
        let b = VenueTiming::new("v1".into(), date.weekday(), t(9, 0), t(11, 0), true);
        let slots = build_candidates("v1", "s1", date, &[a, b]);
        assert_eq!(slots.len(), 6);
    }

    #[test]
    fn test_inverted_row_is_skipped() {
        let date = sunday();
        let bad = VenueTiming::new("v1".into(), date.weekday(), t(12, 0), t(6, 0), true);
        assert!(build_candidates("v1", "s1", date, &[bad]).is_empty());
    }

    #[test]
    fn test_candidates_are_priced_by_tier() {
        let date = sunday();
        let slots = build_candidates("v1", "s1", date, &default_timings("v1", date.weekday()));
        let price_at = |h, m| slots.iter().find(|s| s.start_time == t(h, m)).unwrap().price;
        assert_eq!(price_at(6, 0), 650);
        assert_eq!(price_at(17, 30), 650);
        assert_eq!(price_at(19, 0), 700);
    }
}
