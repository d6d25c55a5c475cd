use chrono::{NaiveTime, Timelike, Weekday};

pub const FALLBACK_PRICE: i32 = 600;

/// Price of the half-hour slot starting at `start` on `day`.
///
/// Only the hour of day and Sunday-vs-other-day select the tier. The morning band flag is
/// accepted so callers can pass the timing row through unchanged, but no tier depends on it,
/// and the venue's `venue_pricing` rows are not consulted.
pub fn resolve_price(day: Weekday, start: NaiveTime, _is_morning: bool) -> i32 {
    let hour = start.hour();
    match day {
        Weekday::Sun => match hour {
            5..=6 => 650,
            7..=17 => 650,
            18..=22 => 700,
            _ => FALLBACK_PRICE,
        },
        _ => match hour {
            16..=17 => 600,
            18..=22 => 650,
            _ => FALLBACK_PRICE,
        },
    }
}
