//! Day-offset to calendar-date mapping for the publishing calendar.
//!
//! Events carry a day offset inside a rolling 28-day window. New plans are
//! anchored at generation time (see [`crate::PublishingPlan::anchor`]) so the
//! stored `scheduled_date` never drifts; [`map_day_to_date`] remains for
//! unanchored events and relative previews.

use chrono::{Days, NaiveDate, Utc};

use crate::strategy::CalendarEvent;

pub const CALENDAR_WINDOW_DAYS: u32 = 28;

/// Map a 1-based day offset onto a date relative to `today`.
///
/// Day 1 is `today`, day 28 is `today + 27`. Offsets outside
/// `1..=CALENDAR_WINDOW_DAYS` fall back to `today`.
#[must_use]
pub fn map_day_to_date(day: i64, today: NaiveDate) -> NaiveDate {
    if !(1..=i64::from(CALENDAR_WINDOW_DAYS)).contains(&day) {
        return today;
    }
    #[allow(clippy::cast_sign_loss)]
    let offset = (day - 1) as u64;
    today.checked_add_days(Days::new(offset)).unwrap_or(today)
}

/// [`map_day_to_date`] against the current UTC date.
#[must_use]
pub fn map_day_to_date_today(day: i64) -> NaiveDate {
    map_day_to_date(day, Utc::now().date_naive())
}

/// The date an event renders on: its anchored date if it has one, otherwise
/// the offset mapped onto `today`.
#[must_use]
pub fn event_date(event: &CalendarEvent, today: NaiveDate) -> NaiveDate {
    event
        .scheduled_date
        .unwrap_or_else(|| map_day_to_date(i64::from(event.day), today))
}
