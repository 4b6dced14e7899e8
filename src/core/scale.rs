use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ChartError, ChartResult};

/// Default tick count used by [`LinearScale::nice`].
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Shared contract of continuous domain-to-pixel scales.
///
/// Zoom rescaling is expressed against this trait so line, heatmap and bar
/// charts share one implementation.
pub trait ContinuousScale: Sized + Copy {
    fn map(&self, value: f64) -> f64;

    fn invert(&self, pixel: f64) -> f64;

    fn domain(&self) -> (f64, f64);

    fn range(&self) -> (f64, f64);

    /// Returns a copy with the same range and a new domain.
    fn with_domain(&self, start: f64, end: f64) -> ChartResult<Self>;

    #[must_use]
    fn range_extent(&self) -> f64 {
        let (start, end) = self.range();
        (end - start).abs()
    }
}

/// Affine numeric scale.
///
/// `map` extrapolates past the domain unless clamping is enabled. The range
/// may be reversed, e.g. `(height, 0.0)` for an upward y axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
    clamp: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        validate_domain(domain.0, domain.1)?;
        validate_range(range.0, range.1)?;
        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
            clamp: false,
        })
    }

    /// Fits the domain to the extent of `values`, skipping non-finite ones.
    ///
    /// No values fall back to `[0, 1]`; a single distinct value is padded to
    /// a unit-wide span around it.
    pub fn from_extent<I>(values: I, range: (f64, f64)) -> ChartResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (start, end) = extent_or_fallback(values, 1.0);
        Self::new((start, end), range)
    }

    /// Fits `[0, max(values)]`, the shape used for value axes.
    pub fn zero_based<I>(values: I, range: (f64, f64)) -> ChartResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let max = values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() || max <= 0.0 {
            warn!(max, "value axis has no positive extent, using [0, 1]");
            return Self::new((0.0, 1.0), range);
        }
        Self::new((0.0, max), range)
    }

    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    #[must_use]
    pub fn is_clamped(self) -> bool {
        self.clamp
    }

    /// Extends the domain outward to round tick boundaries.
    #[must_use]
    pub fn nice(self, count: usize) -> Self {
        let mut start = self.domain_start;
        let mut end = self.domain_end;
        let mut previous_step = None;

        for _ in 0..10 {
            let step = tick_step(start, end, count);
            if !step.is_finite() || step <= 0.0 || previous_step == Some(step) {
                break;
            }
            start = (start / step).floor() * step;
            end = (end / step).ceil() * step;
            previous_step = Some(step);
        }

        Self {
            domain_start: start,
            domain_end: end,
            ..self
        }
    }

    /// Round tick values inside the domain, ascending.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        let (lo, hi) = (self.domain_start, self.domain_end);
        let step = tick_step(lo, hi, count);
        if !step.is_finite() || step <= 0.0 {
            return if lo == hi { vec![lo] } else { Vec::new() };
        }

        // Steps below one are applied as a division by the inverse so values
        // like 0.3 come out exact.
        let inverse = if step < 1.0 { (1.0 / step).round() } else { 0.0 };
        let to_value = |index: f64| {
            if inverse > 0.0 {
                index / inverse
            } else {
                index * step
            }
        };
        let (first, last) = if inverse > 0.0 {
            ((lo * inverse).ceil(), (hi * inverse).floor())
        } else {
            ((lo / step).ceil(), (hi / step).floor())
        };
        if last < first {
            return Vec::new();
        }

        let count = (last - first) as usize + 1;
        (0..count).map(|i| to_value(first + i as f64)).collect()
    }
}

impl ContinuousScale for LinearScale {
    fn map(&self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        if span == 0.0 {
            return (self.range_start + self.range_end) / 2.0;
        }
        let mut normalized = (value - self.domain_start) / span;
        if self.clamp {
            normalized = normalized.clamp(0.0, 1.0);
        }
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    fn invert(&self, pixel: f64) -> f64 {
        let normalized = (pixel - self.range_start) / (self.range_end - self.range_start);
        let value = self.domain_start + normalized * (self.domain_end - self.domain_start);
        if self.clamp {
            value.clamp(self.domain_start, self.domain_end)
        } else {
            value
        }
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    fn with_domain(&self, start: f64, end: f64) -> ChartResult<Self> {
        validate_domain(start, end)?;
        Ok(Self {
            domain_start: start,
            domain_end: end,
            ..*self
        })
    }
}

pub(crate) fn validate_domain(start: f64, end: f64) -> ChartResult<()> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ChartError::InvalidConfig(
            "scale domain must be finite".to_owned(),
        ));
    }
    if start > end {
        return Err(ChartError::InvalidConfig(format!(
            "scale domain start {start} must not exceed end {end}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_range(start: f64, end: f64) -> ChartResult<()> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ChartError::InvalidConfig(
            "scale range must be finite".to_owned(),
        ));
    }
    if start == end {
        return Err(ChartError::InvalidConfig(
            "scale range must have non-zero length".to_owned(),
        ));
    }
    Ok(())
}

/// Min/max of the finite values, widened to `min_span` when degenerate.
pub(crate) fn extent_or_fallback<I>(values: I, min_span: f64) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values.into_iter().filter(|value| value.is_finite()) {
        min = min.min(value);
        max = max.max(value);
    }

    if min > max {
        warn!("scale extent has no finite values, using [0, 1]");
        return (0.0, 1.0);
    }
    if min == max {
        warn!(value = min, "scale extent is a single value, padding domain");
        let half = min_span / 2.0;
        return (min - half, max + half);
    }
    (min, max)
}

/// Tick spacing of 1, 2 or 5 times a power of ten giving about `count`
/// ticks over `[start, end]`.
pub(crate) fn tick_step(start: f64, end: f64, count: usize) -> f64 {
    let span = end - start;
    if !span.is_finite() || span <= 0.0 {
        return 0.0;
    }
    let raw = span / count.max(1) as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_step_picks_round_increments() {
        assert_eq!(tick_step(0.0, 10.0, 10), 1.0);
        assert_eq!(tick_step(0.0, 100.0, 10), 10.0);
        assert_eq!(tick_step(0.0, 35.0, 10), 5.0);
        assert!((tick_step(0.0, 1.0, 5) - 0.2).abs() <= 1e-12);
    }

    #[test]
    fn degenerate_extent_is_padded() {
        assert_eq!(extent_or_fallback([4.0, 4.0], 1.0), (3.5, 4.5));
        assert_eq!(extent_or_fallback([], 1.0), (0.0, 1.0));
        assert_eq!(extent_or_fallback([f64::NAN], 1.0), (0.0, 1.0));
    }
}
