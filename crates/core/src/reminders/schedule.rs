//! Quarterly reminder schedule: the 23rd of March, June, September and
//! December at 19:00 local time.

use std::time::Duration;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Months that carry a reminder.
pub const REMINDER_MONTHS: [u32; 4] = [3, 6, 9, 12];
/// Day of month.
pub const REMINDER_DAY: u32 = 23;
/// Hour of day, local time.
pub const REMINDER_HOUR: u32 = 19;

fn slot(year: i32, month: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, REMINDER_DAY)?.and_hms_opt(REMINDER_HOUR, 0, 0)
}

/// First reminder instant strictly after `now`.
///
/// Returns `None` only at the end of the representable calendar.
#[must_use]
pub fn next_reminder_at(now: NaiveDateTime) -> Option<NaiveDateTime> {
    REMINDER_MONTHS
        .iter()
        .filter_map(|&month| slot(now.year(), month))
        .find(|&at| at > now)
        .or_else(|| slot(now.year().checked_add(1)?, REMINDER_MONTHS[0]))
}

/// Time to wait from `now` until the next reminder.
#[must_use]
pub fn until_next_reminder(now: NaiveDateTime) -> Option<(NaiveDateTime, Duration)> {
    let next = next_reminder_at(now)?;
    let wait = (next - now).to_std().unwrap_or_default();
    Some((next, wait))
}
