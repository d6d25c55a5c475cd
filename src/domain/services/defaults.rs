use chrono::{NaiveTime, Weekday};
use crate::domain::models::{
    timing::{VenueTiming, WEEK},
    pricing::{NewPricingParams, VenuePricing},
};

pub const DEFAULT_MORNING_BAND: (u32, u32) = (6, 12);
pub const DEFAULT_EVENING_BAND: (u32, u32) = (12, 23);

pub const DEFAULT_PRICE: i32 = 500;
pub const DEFAULT_DAY_GROUP: &str = "monday-sunday";
pub const DEFAULT_TIME_RANGE: &str = "6-23";
pub const DEFAULT_PER_DURATION: &str = "30 minutes";

fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Morning 06:00-12:00 and non-morning 12:00-23:00 for one day.
pub fn default_timings(venue_id: &str, day: Weekday) -> Vec<VenueTiming> {
    vec![
        VenueTiming::new(venue_id.to_string(), day, hour(DEFAULT_MORNING_BAND.0), hour(DEFAULT_MORNING_BAND.1), true),
        VenueTiming::new(venue_id.to_string(), day, hour(DEFAULT_EVENING_BAND.0), hour(DEFAULT_EVENING_BAND.1), false),
    ]
}

pub fn default_week(venue_id: &str) -> Vec<VenueTiming> {
    WEEK.iter().flat_map(|day| default_timings(venue_id, *day)).collect()
}

pub fn default_pricing(venue_id: &str) -> VenuePricing {
    VenuePricing::new(NewPricingParams {
        venue_id: venue_id.to_string(),
        day_group: DEFAULT_DAY_GROUP.to_string(),
        is_morning: true,
        time_range: DEFAULT_TIME_RANGE.to_string(),
        price: DEFAULT_PRICE,
        per_duration: DEFAULT_PER_DURATION.to_string(),
    })
}
