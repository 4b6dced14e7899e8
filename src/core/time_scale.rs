use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{date_to_unix_seconds, unix_seconds_to_date};
use crate::core::scale::{ContinuousScale, LinearScale, extent_or_fallback};
use crate::error::ChartResult;

/// Span used when a time extent collapses to a single month.
const SINGLE_MONTH_SPAN_SECONDS: f64 = 30.0 * 86_400.0;

/// Candidate year intervals for axis ticks, smallest first.
const YEAR_TICK_STEPS: [i32; 8] = [1, 2, 5, 10, 20, 25, 50, 100];
/// Candidate month intervals for axis ticks on short spans.
const MONTH_TICK_STEPS: [u32; 4] = [1, 2, 3, 6];

/// Time axis over Unix seconds, linear in elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(start: NaiveDate, end: NaiveDate, range: (f64, f64)) -> ChartResult<Self> {
        Self::from_seconds(
            (date_to_unix_seconds(start), date_to_unix_seconds(end)),
            range,
        )
    }

    pub fn from_seconds(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        Ok(Self {
            linear: LinearScale::new(domain, range)?,
        })
    }

    /// Fits the domain to the date extent; a single month is widened to a
    /// month-long span and no dates fall back to `[0, 1]`.
    pub fn from_dates<I>(dates: I, range: (f64, f64)) -> ChartResult<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let domain = extent_or_fallback(
            dates.into_iter().map(date_to_unix_seconds),
            SINGLE_MONTH_SPAN_SECONDS,
        );
        Self::from_seconds(domain, range)
    }

    #[must_use]
    pub fn linear(self) -> LinearScale {
        self.linear
    }

    #[must_use]
    pub fn map_date(self, date: NaiveDate) -> f64 {
        self.linear.map(date_to_unix_seconds(date))
    }

    #[must_use]
    pub fn invert_to_date(self, pixel: f64) -> Option<NaiveDate> {
        unix_seconds_to_date(self.linear.invert(pixel))
    }

    /// Calendar-aligned tick dates inside the domain, at most `max_count`.
    ///
    /// Spans of two years or more tick on January 1 at a round year step;
    /// shorter spans tick on month starts.
    #[must_use]
    pub fn ticks(self, max_count: usize) -> Vec<NaiveDate> {
        let max_count = max_count.max(1);
        let (start, end) = self.linear.domain();
        let (Some(first), Some(last)) = (unix_seconds_to_date(start), unix_seconds_to_date(end))
        else {
            return Vec::new();
        };

        let years = last.year() - first.year();
        if years >= 2 {
            let step = YEAR_TICK_STEPS
                .iter()
                .copied()
                .find(|step| (years / step + 1) as usize <= max_count)
                .unwrap_or(100);
            let mut year = first.year().div_euclid(step) * step;
            let mut ticks = Vec::new();
            while year <= last.year() {
                if let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1) {
                    if date >= first && date <= last {
                        ticks.push(date);
                    }
                }
                year += step;
            }
            return ticks;
        }

        let months = (last.year() - first.year()) * 12 + last.month() as i32 - first.month() as i32;
        let step = MONTH_TICK_STEPS
            .iter()
            .copied()
            .find(|step| (months / *step as i32 + 1) as usize <= max_count)
            .unwrap_or(12);
        let mut ticks = Vec::new();
        let mut cursor = NaiveDate::from_ymd_opt(first.year(), first.month(), 1);
        while let Some(date) = cursor {
            if date > last {
                break;
            }
            if date >= first && (date.month0() % step) == 0 {
                ticks.push(date);
            }
            cursor = date.checked_add_months(chrono::Months::new(1));
        }
        ticks
    }
}

impl ContinuousScale for TimeScale {
    fn map(&self, value: f64) -> f64 {
        self.linear.map(value)
    }

    fn invert(&self, pixel: f64) -> f64 {
        self.linear.invert(pixel)
    }

    fn domain(&self) -> (f64, f64) {
        self.linear.domain()
    }

    fn range(&self) -> (f64, f64) {
        self.linear.range()
    }

    fn with_domain(&self, start: f64, end: f64) -> ChartResult<Self> {
        Ok(Self {
            linear: self.linear.with_domain(start, end)?,
        })
    }
}
