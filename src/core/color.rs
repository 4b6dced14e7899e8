use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ChartError, ChartResult};

/// Headroom applied to diverging bounds.
pub const DEFAULT_BUFFER_FACTOR: f64 = 1.1;

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Opaque color from a `0xRRGGBB` value.
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| f64::from((hex >> shift) & 0xff) / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    /// `#rrggbb` form, alpha dropped.
    #[must_use]
    pub fn to_hex_string(self) -> String {
        let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.red),
            channel(self.green),
            channel(self.blue)
        )
    }

    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self::rgba(
            mix(self.red, other.red),
            mix(self.green, other.green),
            mix(self.blue, other.blue),
            mix(self.alpha, other.alpha),
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Fill used for cells and bars without data.
pub const NO_DATA_COLOR: Color = Color::rgb(0.8, 0.8, 0.8);

const BLUES: &[u32] = &[
    0xf7fbff, 0xdeebf7, 0xc6dbef, 0x9ecae1, 0x6baed6, 0x4292c6, 0x2171b5, 0x08519c, 0x08306b,
];
const VIRIDIS: &[u32] = &[
    0x440154, 0x472d7b, 0x3b528b, 0x2c728e, 0x21918c, 0x28ae80, 0x5ec962, 0xaddc30, 0xfde725,
];
const RD_BU: &[u32] = &[
    0x67001f, 0xb2182b, 0xd6604d, 0xf4a582, 0xfddbc7, 0xf7f7f7, 0xd1e5f0, 0x92c5de, 0x4393c3,
    0x2166ac, 0x053061,
];
const PU_OR: &[u32] = &[
    0x7f3b08, 0xb35806, 0xe08214, 0xfdb863, 0xfee0b6, 0xf7f7f7, 0xd8daeb, 0xb2abd2, 0x8073ac,
    0x542788, 0x2d004b,
];
const CATEGORY10: &[u32] = &[
    0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f, 0xbcbd22,
    0x17becf,
];

/// Piecewise-linear color ramps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorScheme {
    Blues,
    Viridis,
    #[default]
    RdBu,
    PuOr,
}

impl ColorScheme {
    fn stops(self) -> &'static [u32] {
        match self {
            Self::Blues => BLUES,
            Self::Viridis => VIRIDIS,
            Self::RdBu => RD_BU,
            Self::PuOr => PU_OR,
        }
    }

    #[must_use]
    pub fn is_diverging(self) -> bool {
        matches!(self, Self::RdBu | Self::PuOr)
    }

    /// Color at `t`, clamped into `[0, 1]`; NaN maps to the midpoint.
    #[must_use]
    pub fn interpolate(self, t: f64) -> Color {
        let stops = self.stops();
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        let segments = stops.len() - 1;
        let scaled = t * segments as f64;
        let index = (scaled.floor() as usize).min(segments - 1);
        let local = scaled - index as f64;
        Color::from_hex(stops[index]).lerp(Color::from_hex(stops[index + 1]), local)
    }

    #[must_use]
    pub fn midpoint(self) -> Color {
        self.interpolate(0.5)
    }
}

/// How a value set is turned into a color domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorMode {
    /// `[min, max]` of the values.
    #[default]
    Absolute,
    /// Symmetric around zero, for percentage changes.
    Diverging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainKind {
    Sequential,
    Diverging,
}

/// Numeric domain of a color scale.
///
/// Diverging domains are stored as `(bound, -bound)`: positive values land
/// at the start of the interpolator and negative values at its end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorDomain {
    pub kind: DomainKind,
    pub bounds: (f64, f64),
}

impl ColorDomain {
    #[must_use]
    pub fn from_values<I>(values: I, mode: ColorMode) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        match mode {
            ColorMode::Absolute => Self::sequential(values),
            ColorMode::Diverging => Self::diverging_with(values, DEFAULT_BUFFER_FACTOR),
        }
    }

    /// Like [`Self::from_values`] with an explicit diverging headroom factor.
    pub fn from_values_buffered<I>(values: I, mode: ColorMode, buffer: f64) -> ChartResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        validate_buffer_factor(buffer)?;
        Ok(match mode {
            ColorMode::Absolute => Self::sequential(values),
            ColorMode::Diverging => Self::diverging_with(values, buffer),
        })
    }

    fn sequential<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values.into_iter().filter(|value| value.is_finite()) {
            min = min.min(value);
            max = max.max(value);
        }
        let bounds = if min > max {
            warn!("color domain has no finite values, collapsing to [0, 0]");
            (0.0, 0.0)
        } else {
            (min, max)
        };
        Self {
            kind: DomainKind::Sequential,
            bounds,
        }
    }

    fn diverging_with<I>(values: I, buffer: f64) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let max_abs = values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold(0.0_f64, |acc, value| acc.max(value.abs()));
        let bound = (max_abs * buffer).ceil();
        if bound == 0.0 {
            warn!("diverging color domain is empty, collapsing to [0, 0]");
        }
        Self {
            kind: DomainKind::Diverging,
            bounds: (bound, -bound),
        }
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.bounds.0 == self.bounds.1
    }

    /// Position of `value` along the interpolator.
    ///
    /// Degenerate domains and non-finite values sit at the midpoint. Values
    /// outside the domain are clamped.
    #[must_use]
    pub fn normalize(self, value: f64) -> f64 {
        let (start, end) = self.bounds;
        if self.is_degenerate() || !value.is_finite() {
            return 0.5;
        }
        ((value - start) / (end - start)).clamp(0.0, 1.0)
    }

    /// `count` evenly spaced values from `bounds.0` to `bounds.1`.
    #[must_use]
    pub fn legend_values(self, count: usize) -> Vec<f64> {
        let (start, end) = self.bounds;
        match count {
            0 => Vec::new(),
            1 => vec![(start + end) / 2.0],
            _ => (0..count)
                .map(|i| start + (end - start) * i as f64 / (count - 1) as f64)
                .collect(),
        }
    }
}

pub(crate) fn validate_buffer_factor(buffer: f64) -> ChartResult<()> {
    if !buffer.is_finite() || buffer <= 0.0 {
        return Err(ChartError::InvalidConfig(format!(
            "color buffer factor must be finite and > 0, got {buffer}"
        )));
    }
    Ok(())
}

/// A color domain bound to a scheme; shared by chart cells and the legend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    pub domain: ColorDomain,
    pub scheme: ColorScheme,
}

impl ColorScale {
    #[must_use]
    pub fn new(domain: ColorDomain, scheme: ColorScheme) -> Self {
        Self { domain, scheme }
    }

    #[must_use]
    pub fn color(self, value: f64) -> Color {
        self.scheme.interpolate(self.domain.normalize(value))
    }

    /// Missing values get [`NO_DATA_COLOR`].
    #[must_use]
    pub fn color_or_no_data(self, value: Option<f64>) -> Color {
        value.map_or(NO_DATA_COLOR, |value| self.color(value))
    }

    /// `(value, color)` pairs for a legend, from `bounds.0` to `bounds.1`.
    #[must_use]
    pub fn legend_stops(self, count: usize) -> Vec<(f64, Color)> {
        self.domain
            .legend_values(count)
            .into_iter()
            .map(|value| (value, self.color(value)))
            .collect()
    }
}

/// Stable category → palette slot assignment.
///
/// Names are sorted before slots are handed out so a category keeps its
/// color whenever the same set is selected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryPalette {
    slots: IndexMap<String, usize>,
}

impl CategoryPalette {
    #[must_use]
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sorted: BTreeSet<String> = categories.into_iter().map(Into::into).collect();
        let slots = sorted
            .into_iter()
            .enumerate()
            .map(|(slot, category)| (category, slot % CATEGORY10.len()))
            .collect();
        Self { slots }
    }

    #[must_use]
    pub fn slot(&self, category: &str) -> Option<usize> {
        self.slots.get(category).copied()
    }

    #[must_use]
    pub fn color(&self, category: &str) -> Option<Color> {
        self.slot(category).map(|slot| Color::from_hex(CATEGORY10[slot]))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Categories in slot order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }
}
