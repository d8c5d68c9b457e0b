//! Age derivation from birth date and a reference (cutoff) date

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::warn;

/// Age returned when the reference date precedes the birth date
///
/// Flags future-dated birth records without aborting the roster expansion.
pub const INVALID_BIRTH_AGE: i32 = -1;

/// Integer age as of the most recent birthday on or before `reference`
///
/// Calendar-year difference, adjusted down by one when the (month, day) of
/// the reference falls before the birthday that year.
pub fn age(birth: NaiveDate, reference: NaiveDate) -> i32 {
    use chrono::Datelike;

    if reference < birth {
        return INVALID_BIRTH_AGE;
    }

    let mut years = reference.year() - birth.year();
    if (reference.month(), reference.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years
}

/// Date formats accepted from upstream spreadsheets
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Normalize a raw date-like value to a calendar date
///
/// Rosters arrive with dates serialized as plain dates, datetimes, or
/// numeric epochs depending on which spreadsheet exported them. Epoch
/// values above 10^11 are taken as milliseconds, otherwise seconds.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }

    if let Ok(epoch) = trimmed.parse::<i64>() {
        let seconds = if epoch.abs() >= 100_000_000_000 {
            epoch / 1000
        } else {
            epoch
        };
        return DateTime::from_timestamp(seconds, 0).map(|dt| dt.date_naive());
    }

    None
}

/// Age from a raw birth-date value against a typed reference date
///
/// An unparseable birth date yields age 0 with a warning. This conflates a
/// data error with a newborn; callers that need to distinguish must check
/// the raw value themselves.
pub fn age_of(raw_birth: &str, reference: NaiveDate) -> i32 {
    match parse_date(raw_birth) {
        Some(birth) => age(birth, reference),
        None => {
            warn!("Unparseable birth date '{}', treating as age 0", raw_birth);
            0
        }
    }
}
