//! Cake day arithmetic.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};

use crate::summary::from_epoch;

/// Gregorian leap year test.
pub fn is_leap_year(year: i32) -> bool {
    if year % 400 == 0 {
        true
    } else if year % 100 == 0 {
        false
    } else {
        year % 4 == 0
    }
}

/// The cake day window in `now`'s year, both ends inclusive.
///
/// The window opens at the account's creation time of day on its creation
/// date and lasts one day. Accounts created on Feb 29 celebrate on Mar 1 in
/// non-leap years.
pub fn cakeday_window(
    created: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let year = now.year();
    let day = TimeDelta::days(1);
    let leap_day = created.month() == 2 && created.day() == 29;

    if leap_day && !is_leap_year(year) {
        let anchor = NaiveDate::from_ymd_opt(year, 2, 28)?
            .and_time(created.time())
            .and_utc();
        Some((anchor + day, anchor + day * 2))
    } else {
        let anchor = NaiveDate::from_ymd_opt(year, created.month(), created.day())?
            .and_time(created.time())
            .and_utc();
        Some((anchor, anchor + day))
    }
}

/// Whether `now` falls on the cake day of an account created at `created_utc`.
pub fn is_cakeday(created_utc: f64, now: DateTime<Utc>) -> bool {
    let Some(created) = from_epoch(created_utc) else {
        return false;
    };
    match cakeday_window(created, now) {
        Some((start, end)) => start <= now && now <= end,
        None => false,
    }
}
