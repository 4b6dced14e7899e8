use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Seconds since the Unix epoch at midnight UTC of `date`.
#[must_use]
pub fn date_to_unix_seconds(date: NaiveDate) -> f64 {
    date.and_time(NaiveTime::default()).and_utc().timestamp() as f64
}

/// Inverse of [`date_to_unix_seconds`], truncating to the calendar day.
///
/// Returns `None` for non-finite input or timestamps chrono cannot represent.
#[must_use]
pub fn unix_seconds_to_date(seconds: f64) -> Option<NaiveDate> {
    if !seconds.is_finite() || seconds.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(seconds.floor() as i64, 0).map(|time| time.date_naive())
}

/// Parses `REF_DATE` values (`YYYY-MM` or `YYYY-MM-DD`) to the first day of
/// the month. Anything else yields `None`.
#[must_use]
pub fn parse_ref_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date = match raw.len() {
        7 => NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok()?,
        10 => NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?,
        _ => return None,
    };
    date.with_day(1)
}

/// Parses a `VALUE` decimal string. Empty, malformed or non-finite values
/// are missing.
#[must_use]
pub fn parse_value(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let decimal = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()?;
    decimal_to_f64(decimal, "VALUE")
        .ok()
        .filter(|value| value.is_finite())
}

/// First day of the calendar month preceding `date`'s month.
#[must_use]
pub fn previous_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}
