//! Decoding of numeric time coordinates.
//!
//! Time coordinates store numbers relative to a reference date, described by a
//! units string such as `"hours since 2000-01-01 00:00:00"`. Only the proleptic
//! Gregorian calendar is supported.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const SECONDS_PER_DAY: i64 = 86_400;

/// 0001-01-01 00:00:00 as seconds since the Unix epoch.
const MIN_SECONDS: i64 = -62_135_596_800;
/// 9999-12-31 23:59:59 as seconds since the Unix epoch.
const MAX_SECONDS: i64 = 253_402_300_799;

/// A point in time as whole seconds since 1970-01-01 00:00:00 UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    pub fn unix_seconds(&self) -> i64 {
        self.0
    }

    /// Build a timestamp from calendar fields, or `None` if any field is out of range.
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        if !(1..=12).contains(&month)
            || day == 0
            || day > days_in_month(year, month)
            || hour > 23
            || minute > 59
            || second > 59
        {
            return None;
        }
        let days = ymd_to_days(year, month, day);
        let secs = i64::from(hour) * 3600 + i64::from(minute) * 60 + i64::from(second);
        Some(Self(days * SECONDS_PER_DAY + secs))
    }

    /// Split into `(year, month, day, hour, minute, second)`.
    pub fn to_ymd_hms(&self) -> (i32, u32, u32, u32, u32, u32) {
        let days = self.0.div_euclid(SECONDS_PER_DAY);
        let secs_today = self.0.rem_euclid(SECONDS_PER_DAY);
        let (year, month, day) = days_to_ymd(days);
        let hours = (secs_today / 3600) as u32;
        let mins = ((secs_today % 3600) / 60) as u32;
        let secs = (secs_today % 60) as u32;
        (year, month, day, hours, mins, secs)
    }

    /// Elapsed seconds from `earlier` to `self`.
    pub fn seconds_since(&self, earlier: Timestamp) -> i64 {
        self.0 - earlier.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day, hour, min, sec) = self.to_ymd_hms();
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            year, month, day, hour, min, sec
        )
    }
}

/// Parsed `"<unit> since <reference date>"` units of a time coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnits {
    step_seconds: f64,
    origin: Timestamp,
}

impl TimeUnits {
    /// Parse a CF-style units string.
    ///
    /// Accepted units are seconds, minutes, hours and days (plus common
    /// abbreviations). The reference date may be `YYYY-MM-DD`, optionally
    /// followed by a time of day separated by a space or `T`.
    pub fn parse(units: &str) -> Result<Self> {
        let invalid = || Error::InvalidUnits {
            units: units.to_string(),
        };

        let (step, reference) = units.split_once(" since ").ok_or_else(invalid)?;
        let step_seconds = match step.trim().to_ascii_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => 1.0,
            "minutes" | "minute" | "mins" | "min" => 60.0,
            "hours" | "hour" | "hrs" | "hr" | "h" => 3600.0,
            "days" | "day" | "d" => 86_400.0,
            _ => return Err(invalid()),
        };
        let origin = parse_reference(reference.trim()).ok_or_else(invalid)?;

        Ok(Self {
            step_seconds,
            origin,
        })
    }

    pub fn origin(&self) -> Timestamp {
        self.origin
    }

    /// Length of one unit step in seconds.
    pub fn step_seconds(&self) -> f64 {
        self.step_seconds
    }

    /// Convert a numeric point to an absolute timestamp, rounded to the second.
    ///
    /// # Errors
    /// [`Error::TimeOutOfRange`] for non-finite points (such as NaN) and for
    /// points that land outside the years 1 to 9999, which is where netCDF
    /// fill values end up.
    pub fn num2date(&self, value: f64) -> Result<Timestamp> {
        let offset = (value * self.step_seconds).round();
        let span = (MAX_SECONDS - MIN_SECONDS) as f64;
        if !offset.is_finite() || offset.abs() > span {
            return Err(Error::TimeOutOfRange { value });
        }
        self.origin
            .0
            .checked_add(offset as i64)
            .filter(|seconds| (MIN_SECONDS..=MAX_SECONDS).contains(seconds))
            .map(Timestamp)
            .ok_or(Error::TimeOutOfRange { value })
    }
}

fn parse_reference(reference: &str) -> Option<Timestamp> {
    let reference = reference.trim_end_matches('Z').trim_end_matches(" UTC");
    let (date, time) = match reference.split_once(['T', ' ']) {
        Some((date, time)) => (date, Some(time.trim())),
        None => (reference, None),
    };

    let mut date_parts = date.split('-');
    let year = date_parts.next()?.parse().ok()?;
    let month = date_parts.next()?.parse().ok()?;
    let day = date_parts.next()?.parse().ok()?;
    if date_parts.next().is_some() {
        return None;
    }

    let (hour, minute, second) = match time {
        Some(time) if !time.is_empty() => {
            let mut time_parts = time.split(':');
            let hour = time_parts.next()?.parse().ok()?;
            let minute = time_parts.next().map_or(Some(0), |m| m.parse().ok())?;
            // Fractional seconds in reference dates are dropped
            let second = time_parts
                .next()
                .map_or(Some(0.0), |s| s.parse::<f64>().ok())?
                .floor() as u32;
            (hour, minute, second)
        }
        _ => (0, 0, 0),
    };

    Timestamp::from_ymd_hms(year, month, day, hour, minute, second)
}

/// Convert days since Unix epoch to year/month/day.
fn days_to_ymd(days: i64) -> (i32, u32, u32) {
    let mut remaining_days = days;
    let mut year = 1970i32;

    while remaining_days < 0 {
        year -= 1;
        remaining_days += days_in_year(year);
    }
    loop {
        let days_in_year = days_in_year(year);
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let mut month = 1u32;
    while month < 12 {
        let days_in_month = i64::from(days_in_month(year, month));
        if remaining_days < days_in_month {
            break;
        }
        remaining_days -= days_in_month;
        month += 1;
    }

    (year, month, remaining_days as u32 + 1)
}

/// Convert a calendar date to days since Unix epoch.
fn ymd_to_days(year: i32, month: u32, day: u32) -> i64 {
    let mut days = 0i64;
    if year >= 1970 {
        for y in 1970..year {
            days += days_in_year(y);
        }
    } else {
        for y in year..1970 {
            days -= days_in_year(y);
        }
    }
    for m in 1..month {
        days += i64::from(days_in_month(year, m));
    }
    days + i64::from(day) - 1
}

fn days_in_year(year: i32) -> i64 {
    if is_leap_year(year) { 366 } else { 365 }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Check if a year is a leap year.
fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
