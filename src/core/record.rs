use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{parse_ref_date, parse_value};

/// One row as delivered by the external CSV loader, using the source column
/// names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "REF_DATE")]
    pub ref_date: String,
    #[serde(rename = "GEO")]
    pub geo: String,
    #[serde(rename = "Products and product groups")]
    pub product_group: String,
    #[serde(rename = "VALUE", default)]
    pub value: String,
}

/// A parsed CPI observation.
///
/// `date` is always the first day of a calendar month. `value` is `None`
/// when the source cell was empty or malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub geography: String,
    pub category: String,
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl Record {
    /// `date` is truncated to the first day of its month.
    #[must_use]
    pub fn new(
        geography: impl Into<String>,
        category: impl Into<String>,
        date: NaiveDate,
        value: Option<f64>,
    ) -> Self {
        Self {
            geography: geography.into(),
            category: category.into(),
            date: date.with_day(1).unwrap_or(date),
            value: value.filter(|v| v.is_finite()),
        }
    }

    /// Parses a raw row. Rows whose date cannot be parsed carry no usable
    /// observation and yield `None`.
    #[must_use]
    pub fn from_raw(raw: &RawRecord) -> Option<Self> {
        let date = parse_ref_date(&raw.ref_date)?;
        Some(Self {
            geography: raw.geo.trim().to_owned(),
            category: raw.product_group.trim().to_owned(),
            date,
            value: parse_value(&raw.value),
        })
    }
}

/// Parses a batch of raw rows, dropping rows without a valid date.
#[must_use]
pub fn parse_records<'a, I>(rows: I) -> Vec<Record>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    rows.into_iter().filter_map(Record::from_raw).collect()
}
