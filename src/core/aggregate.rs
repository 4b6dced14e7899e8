use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::primitives::previous_month;
use crate::core::record::Record;
use crate::core::series::{DuplicatePolicy, Series, SeriesPoint};

/// Mean of one category's defined values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMean {
    pub category: String,
    /// `None` when the category had no defined value ("no data").
    pub mean: Option<f64>,
    /// Number of defined values averaged.
    pub count: usize,
}

/// Month-over-month percentage change at one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangePoint {
    pub date: NaiveDate,
    pub change: Option<f64>,
}

/// Arithmetic mean of `value` per category, ignoring missing values.
///
/// Categories keep the order in which they first appear. A category whose
/// records are all missing is reported with `mean: None`.
#[must_use]
pub fn mean_by_category<'a, I>(records: I) -> Vec<CategoryMean>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut sums: IndexMap<&'a str, (f64, usize)> = IndexMap::new();
    for record in records {
        let entry = sums.entry(record.category.as_str()).or_insert((0.0, 0));
        if let Some(value) = record.value {
            entry.0 += value;
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(category, (sum, count))| CategoryMean {
            category: category.to_owned(),
            mean: (count > 0).then(|| sum / count as f64),
            count,
        })
        .collect()
}

/// Groups records into one chronological series per category, in order of
/// first appearance.
#[must_use]
pub fn group_series<'a, I>(records: I, policy: DuplicatePolicy) -> Vec<Series>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut groups: IndexMap<&'a str, Vec<SeriesPoint>> = IndexMap::new();
    for record in records {
        groups
            .entry(record.category.as_str())
            .or_default()
            .push(SeriesPoint::new(record.date, record.value));
    }

    groups
        .into_iter()
        .map(|(category, points)| Series::from_points(category, points, policy))
        .collect()
}

/// Percentage change against the previous calendar month:
/// `(value[m] / value[m - 1] - 1) * 100`.
///
/// January looks back to December of the prior year. The change is `None`
/// when either month is missing or the previous value is zero.
#[must_use]
pub fn month_over_month(series: &Series) -> Vec<ChangePoint> {
    series
        .points()
        .iter()
        .map(|point| {
            let previous = previous_month(point.date)
                .and_then(|date| series.get(date))
                .and_then(|previous| previous.value);
            let change = match (point.value, previous) {
                (Some(current), Some(previous)) if previous != 0.0 => {
                    Some((current / previous - 1.0) * 100.0)
                }
                _ => None,
            };
            ChangePoint {
                date: point.date,
                change,
            }
        })
        .collect()
}

/// The month-over-month changes of `series` as a series of their own.
#[must_use]
pub fn change_series(series: &Series) -> Series {
    let points = month_over_month(series)
        .into_iter()
        .map(|change| SeriesPoint::new(change.date, change.change))
        .collect();
    Series::from_points(series.category.clone(), points, DuplicatePolicy::LastWriteWins)
}
