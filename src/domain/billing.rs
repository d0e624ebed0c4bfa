//! Billing date calculator.
//!
//! Pure functions deriving renewal countdowns, binding-period countdowns and
//! expiry flags from stored timestamps and an injected "now". Nothing here
//! reads the system clock; callers pass the current time in the application
//! timezone so day-of-month comparisons follow the studio's calendar.

use chrono::{DateTime, Datelike, Months, TimeZone, Utc};

use crate::domain::foundation::Timestamp;

/// Default window, in days, for "expiring soon" warnings.
pub const DEFAULT_EXPIRY_THRESHOLD_DAYS: i64 = 30;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days from `now` until `target`, rounded toward negative infinity.
///
/// Negative when `target` lies in the past.
pub fn days_until<Tz: TimeZone>(target: &Timestamp, now: &DateTime<Tz>) -> i64 {
    let now = Timestamp::from_datetime(now.clone());
    target
        .duration_since(&now)
        .num_milliseconds()
        .div_euclid(MILLIS_PER_DAY)
}

/// Whole calendar months from `now` until `binding_end`.
///
/// One month is subtracted when the end date's day-of-month is earlier than
/// today's. Never negative.
pub fn months_until_binding_end<Tz: TimeZone>(binding_end: &Timestamp, now: &DateTime<Tz>) -> u32 {
    let end = binding_end.in_timezone(&now.timezone());

    let mut months = (end.year() - now.year()) * 12 + (end.month() as i32 - now.month() as i32);
    if end.day() < now.day() {
        months -= 1;
    }

    months.max(0) as u32
}

/// True iff `0 < days_until(expiry, now) <= threshold_days`.
pub fn is_expiring_soon<Tz: TimeZone>(
    expiry: &Timestamp,
    now: &DateTime<Tz>,
    threshold_days: i64,
) -> bool {
    let days = days_until(expiry, now);
    days > 0 && days <= threshold_days
}

/// A subscription may be cancelled once its binding period has elapsed.
///
/// No binding means cancellation is always allowed. The end instant itself
/// still counts as inside the binding period.
pub fn can_cancel<Tz: TimeZone>(binding_end: Option<&Timestamp>, now: &DateTime<Tz>) -> bool {
    match binding_end {
        None => true,
        Some(end) => Timestamp::from_datetime(now.clone()).is_after(end),
    }
}

/// True while `now` is at or before `binding_end`.
pub fn within_binding<Tz: TimeZone>(binding_end: Option<&Timestamp>, now: &DateTime<Tz>) -> bool {
    !can_cancel(binding_end, now)
}

/// Adds calendar months in the timezone of `now`.
///
/// Month ends clamp (Jan 31 + 1 month = Feb 28/29). If the local result does
/// not exist the addition falls back to UTC.
pub fn add_months<Tz: TimeZone>(now: &DateTime<Tz>, months: u32) -> Timestamp {
    let delta = Months::new(months);
    now.clone()
        .checked_add_months(delta)
        .map(Timestamp::from_datetime)
        .or_else(|| {
            now.with_timezone(&Utc)
                .checked_add_months(delta)
                .map(Timestamp::from_datetime)
        })
        .unwrap_or_else(|| Timestamp::from_datetime(now.clone()).add_days(i64::from(months) * 30))
}

/// Binding end for a fresh commitment, or `None` when the plan has none.
pub fn binding_end_from<Tz: TimeZone>(now: &DateTime<Tz>, commitment_months: u32) -> Option<Timestamp> {
    (commitment_months > 0).then(|| add_months(now, commitment_months))
}
