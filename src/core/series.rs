use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::DataPoint;
use crate::core::primitives::{date_to_unix_seconds, unix_seconds_to_date};

/// One monthly observation of a category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl SeriesPoint {
    #[must_use]
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// Chronological observations of one category; dates strictly increase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub category: String,
    points: Vec<SeriesPoint>,
}

/// Resolution of several observations for the same `(category, date)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// The observation that appears last in source order is kept.
    #[default]
    LastWriteWins,
    /// Defined values are averaged; missing only when all are missing.
    Mean,
}

impl Series {
    /// Sorts `points` by date and merges duplicate dates per `policy`.
    #[must_use]
    pub fn from_points(
        category: impl Into<String>,
        points: Vec<SeriesPoint>,
        policy: DuplicatePolicy,
    ) -> Self {
        let mut indexed: Vec<(usize, SeriesPoint)> = points.into_iter().enumerate().collect();
        // Stable on source order so "last" keeps its meaning after sorting.
        indexed.sort_by_key(|(order, point)| (point.date, *order));

        let mut merged: Vec<SeriesPoint> = Vec::with_capacity(indexed.len());
        let mut run_sum = 0.0;
        let mut run_count = 0usize;
        for (_, point) in indexed {
            match merged.last_mut() {
                Some(last) if last.date == point.date => match policy {
                    DuplicatePolicy::LastWriteWins => *last = point,
                    DuplicatePolicy::Mean => {
                        if let Some(value) = point.value {
                            run_sum += value;
                            run_count += 1;
                            last.value = Some(run_sum / run_count as f64);
                        }
                    }
                },
                _ => {
                    run_sum = point.value.unwrap_or(0.0);
                    run_count = usize::from(point.value.is_some());
                    merged.push(point);
                }
            }
        }

        Self {
            category: category.into(),
            points: merged,
        }
    }

    #[must_use]
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Observation at `date`, if the series has one.
    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<SeriesPoint> {
        self.points
            .binary_search_by_key(&date, |point| point.date)
            .ok()
            .map(|index| self.points[index])
    }

    /// Defined values in chronological order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|point| point.value)
    }
}

/// Behaviour of [`SeriesIndex::nearest`] for queries past either end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgePolicy {
    /// Return the first/last sample.
    #[default]
    Clamp,
    /// Return nothing for queries outside `[first.x, last.x]`.
    Suppress,
}

/// A resolved nearest sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearestSample {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub date: NaiveDate,
}

/// Sorted `(x, y)` samples of one series with defined values only.
///
/// `x` is the date in Unix seconds, matching the time scale domain.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesIndex {
    xs: Vec<f64>,
    ys: Vec<f64>,
    dates: Vec<NaiveDate>,
}

impl SeriesIndex {
    #[must_use]
    pub fn from_series(series: &Series) -> Self {
        let mut index = Self::default();
        for point in series.points() {
            if let Some(value) = point.value {
                index.xs.push(date_to_unix_seconds(point.date));
                index.ys.push(value);
                index.dates.push(point.date);
            }
        }
        index
    }

    /// Builds an index from raw `(x, y)` samples, dropping non-finite ones.
    #[must_use]
    pub fn from_points(points: &[DataPoint]) -> Self {
        let mut sorted: Vec<DataPoint> = points
            .iter()
            .copied()
            .filter(|point| point.x.is_finite() && point.y.is_finite())
            .collect();
        sorted.sort_by(|left, right| left.x.total_cmp(&right.x));

        let mut index = Self::default();
        for point in sorted {
            index.xs.push(point.x);
            index.ys.push(point.y);
            index
                .dates
                .push(unix_seconds_to_date(point.x).unwrap_or_default());
        }
        index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Sample closest to `query` by bisection.
    ///
    /// Candidates are the samples on either side of the insertion point; on
    /// equal distance the later sample wins.
    #[must_use]
    pub fn nearest(&self, query: f64, edge: EdgePolicy) -> Option<NearestSample> {
        if self.xs.is_empty() || query.is_nan() {
            return None;
        }
        let last = self.xs.len() - 1;
        if edge == EdgePolicy::Suppress && (query < self.xs[0] || query > self.xs[last]) {
            return None;
        }

        let insertion = self.xs.partition_point(|x| *x < query);
        let candidates: SmallVec<[usize; 2]> = match insertion {
            0 => smallvec::smallvec![0],
            i if i > last => smallvec::smallvec![last],
            i => smallvec::smallvec![i - 1, i],
        };

        let best = match candidates.as_slice() {
            [left, right] => {
                let left_distance = query - self.xs[*left];
                let right_distance = self.xs[*right] - query;
                if left_distance < right_distance {
                    *left
                } else {
                    *right
                }
            }
            [only] => *only,
            _ => return None,
        };

        Some(NearestSample {
            index: best,
            x: self.xs[best],
            y: self.ys[best],
            date: self.dates[best],
        })
    }
}
