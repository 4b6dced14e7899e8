use serde::{Deserialize, Serialize};

use crate::core::scale::{ContinuousScale, LinearScale};
use crate::error::{ChartError, ChartResult};

/// Band padding used by the categorical bar charts.
pub const DEFAULT_BAND_PADDING: f64 = 0.2;

/// Index scale for "one slot per category" charts.
///
/// The base domain is `[0, count]`. Slot `i` spans `[i, i + 1)` and is drawn
/// over `[map(i + padding), map(i + 1 - padding)]`. The domain may be
/// narrowed by zoom rescaling while `count` stays fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexScale {
    count: usize,
    padding: f64,
    linear: LinearScale,
}

impl IndexScale {
    /// Builds a scale over `count` slots.
    ///
    /// `padding` must lie in `[0, 0.5)`. An empty scale keeps a unit domain
    /// so the mapping stays well defined, but has no slots.
    pub fn new(count: usize, range: (f64, f64), padding: f64) -> ChartResult<Self> {
        validate_padding(padding)?;
        let span = count.max(1) as f64;
        Ok(Self {
            count,
            padding,
            linear: LinearScale::new((0.0, span), range)?,
        })
    }

    #[must_use]
    pub fn count(self) -> usize {
        self.count
    }

    #[must_use]
    pub fn padding(self) -> f64 {
        self.padding
    }

    /// Drawn pixel extent of slot `index`, ordered as `(start, end)` along
    /// the range direction. `None` when the slot does not exist.
    #[must_use]
    pub fn slot_extent(self, index: usize) -> Option<(f64, f64)> {
        if index >= self.count {
            return None;
        }
        let position = index as f64;
        Some((
            self.linear.map(position + self.padding),
            self.linear.map(position + 1.0 - self.padding),
        ))
    }

    /// Pixel width of one drawn slot under the current domain.
    #[must_use]
    pub fn bandwidth(self) -> f64 {
        (self.linear.map(1.0 - self.padding) - self.linear.map(self.padding)).abs()
    }

    /// Pixel position of the centre of slot `index`.
    #[must_use]
    pub fn slot_center(self, index: usize) -> Option<f64> {
        (index < self.count).then(|| self.linear.map(index as f64 + 0.5))
    }

    /// Slot whose drawn extent contains `pixel`; padding gaps return `None`.
    #[must_use]
    pub fn slot_at(self, pixel: f64) -> Option<usize> {
        let position = self.linear.invert(pixel);
        if !position.is_finite() || position < 0.0 {
            return None;
        }
        let index = position.floor();
        let offset = position - index;
        let index = index as usize;
        if index >= self.count || offset < self.padding || offset > 1.0 - self.padding {
            return None;
        }
        Some(index)
    }
}

impl ContinuousScale for IndexScale {
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
            ..*self
        })
    }
}

fn validate_padding(padding: f64) -> ChartResult<()> {
    if !padding.is_finite() || !(0.0..0.5).contains(&padding) {
        return Err(ChartError::InvalidConfig(format!(
            "band padding must be finite and in [0, 0.5), got {padding}"
        )));
    }
    Ok(())
}
