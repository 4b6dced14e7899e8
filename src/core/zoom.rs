use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::Viewport;
use crate::core::scale::ContinuousScale;
use crate::error::{ChartError, ChartResult};

/// Wheel delta multiplier in pixel mode.
const WHEEL_PIXEL_STEP: f64 = 0.002;
/// Wheel delta multiplier in line mode.
const WHEEL_LINE_STEP: f64 = 0.05;
const WHEEL_MAX_EXPONENT: f64 = 1000.0;

/// Accumulated pan/zoom state: screen point `p` shows content point
/// `(p - t) / k`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    k: f64,
    x: f64,
    y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub fn new(k: f64, x: f64, y: f64) -> ChartResult<Self> {
        if !k.is_finite() || k <= 0.0 {
            return Err(ChartError::InvalidData(
                "zoom scale factor must be finite and > 0".to_owned(),
            ));
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(ChartError::InvalidData(
                "zoom translation must be finite".to_owned(),
            ));
        }
        Ok(Self { k, x, y })
    }

    #[must_use]
    pub fn k(self) -> f64 {
        self.k
    }

    #[must_use]
    pub fn x(self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn y(self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    #[must_use]
    pub fn apply_x(self, x: f64) -> f64 {
        x * self.k + self.x
    }

    #[must_use]
    pub fn apply_y(self, y: f64) -> f64 {
        y * self.k + self.y
    }

    #[must_use]
    pub fn invert_x(self, x: f64) -> f64 {
        (x - self.x) / self.k
    }

    #[must_use]
    pub fn invert_y(self, y: f64) -> f64 {
        (y - self.y) / self.k
    }

    /// Composition applying `self` first and `next` second.
    #[must_use]
    pub fn then(self, next: Self) -> Self {
        Self {
            k: self.k * next.k,
            x: next.k * self.x + next.x,
            y: next.k * self.y + next.y,
        }
    }

    /// Rescales a horizontal base scale so that
    /// `rescaled.map(v) == k * base.map(v) + x`.
    pub fn rescale_x<S: ContinuousScale>(self, base: &S) -> ChartResult<S> {
        let (r0, r1) = base.range();
        rescaled(base, self.invert_x(r0), self.invert_x(r1))
    }

    /// Vertical counterpart of [`Self::rescale_x`] using the `y` translation.
    pub fn rescale_y<S: ContinuousScale>(self, base: &S) -> ChartResult<S> {
        let (r0, r1) = base.range();
        rescaled(base, self.invert_y(r0), self.invert_y(r1))
    }
}

fn rescaled<S: ContinuousScale>(base: &S, pixel_start: f64, pixel_end: f64) -> ChartResult<S> {
    let start = base.invert(pixel_start);
    let end = base.invert(pixel_end);
    base.with_domain(start.min(end), start.max(end))
}

/// How far the transform may pan, in untransformed pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TranslateBounds {
    /// Panning is never constrained.
    Unbounded,
    /// Content may not leave the viewport rectangle.
    Viewport,
    /// Content may not leave the given rectangle.
    Fixed {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    },
}

impl TranslateBounds {
    fn rect(self, viewport: Viewport) -> Option<(f64, f64, f64, f64)> {
        match self {
            Self::Unbounded => None,
            Self::Viewport => Some((0.0, 0.0, viewport.width_px(), viewport.height_px())),
            Self::Fixed { x0, y0, x1, y1 } => Some((x0, y0, x1, y1)),
        }
    }
}

/// Browser wheel `deltaMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelDeltaMode {
    Pixel,
    Line,
    Page,
}

/// Zoom factor for one wheel event: `2^(-delta_y * step)`.
///
/// The exponent is bounded so the factor stays finite and positive; huge
/// deltas then clamp `k` to the scale extent.
pub fn wheel_factor(delta_y: f64, mode: WheelDeltaMode) -> ChartResult<f64> {
    if !delta_y.is_finite() {
        return Err(ChartError::InvalidData(
            "wheel delta must be finite".to_owned(),
        ));
    }
    let step = match mode {
        WheelDeltaMode::Pixel => WHEEL_PIXEL_STEP,
        WheelDeltaMode::Line => WHEEL_LINE_STEP,
        WheelDeltaMode::Page => 1.0,
    };
    let exponent = (-delta_y * step).clamp(-WHEEL_MAX_EXPONENT, WHEEL_MAX_EXPONENT);
    Ok(exponent.exp2())
}

/// Zoom constraints applied on every gesture update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomBehavior {
    pub scale_extent: (f64, f64),
    #[serde(default = "default_translate_bounds")]
    pub translate_bounds: TranslateBounds,
}

fn default_translate_bounds() -> TranslateBounds {
    TranslateBounds::Viewport
}

impl Default for ZoomBehavior {
    fn default() -> Self {
        Self {
            scale_extent: (1.0, 8.0),
            translate_bounds: default_translate_bounds(),
        }
    }
}

impl ZoomBehavior {
    pub fn new(k_min: f64, k_max: f64) -> ChartResult<Self> {
        Self {
            scale_extent: (k_min, k_max),
            ..Self::default()
        }
        .validate()
    }

    #[must_use]
    pub fn with_translate_bounds(mut self, bounds: TranslateBounds) -> Self {
        self.translate_bounds = bounds;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        let (k_min, k_max) = self.scale_extent;
        if !k_min.is_finite() || !k_max.is_finite() || k_min <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "zoom scale extent must be finite and > 0".to_owned(),
            ));
        }
        if k_min > k_max {
            return Err(ChartError::InvalidConfig(format!(
                "zoom scale extent min {k_min} must not exceed max {k_max}"
            )));
        }
        if let TranslateBounds::Fixed { x0, y0, x1, y1 } = self.translate_bounds {
            if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) || x0 > x1 || y0 > y1 {
                return Err(ChartError::InvalidConfig(
                    "zoom translate extent must be finite and ordered".to_owned(),
                ));
            }
        }
        Ok(self)
    }

    #[must_use]
    pub fn clamp_k(self, k: f64) -> f64 {
        let (k_min, k_max) = self.scale_extent;
        if k.is_nan() {
            return k_min;
        }
        k.clamp(k_min, k_max)
    }

    /// Multiplies `k` by `factor`, keeping the content under `anchor` fixed
    /// unless clamping moves it.
    pub fn scale_by(
        self,
        transform: ZoomTransform,
        factor: f64,
        anchor: (f64, f64),
        viewport: Viewport,
    ) -> ChartResult<ZoomTransform> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ChartError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        self.scale_to(transform, transform.k * factor, anchor, viewport)
    }

    /// Sets `k` (clamped), keeping the content under `anchor` fixed.
    pub fn scale_to(
        self,
        transform: ZoomTransform,
        k: f64,
        anchor: (f64, f64),
        viewport: Viewport,
    ) -> ChartResult<ZoomTransform> {
        validate_point(anchor)?;
        let k = self.clamp_k(k);
        let content = (transform.invert_x(anchor.0), transform.invert_y(anchor.1));
        let next = ZoomTransform {
            k,
            x: anchor.0 - content.0 * k,
            y: anchor.1 - content.1 * k,
        };
        trace!(k = next.k, x = next.x, y = next.y, "zoom scale");
        Ok(self.constrain(next, viewport))
    }

    /// Pans by a screen-space pixel delta.
    pub fn translate_by(
        self,
        transform: ZoomTransform,
        dx: f64,
        dy: f64,
        viewport: Viewport,
    ) -> ChartResult<ZoomTransform> {
        validate_point((dx, dy))?;
        let next = ZoomTransform {
            x: transform.x + dx,
            y: transform.y + dy,
            ..transform
        };
        trace!(x = next.x, y = next.y, "zoom translate");
        Ok(self.constrain(next, viewport))
    }

    /// Applies a pre-composed gesture delta after `transform`.
    ///
    /// When the composed scale leaves the scale extent, `k` is clamped about
    /// the viewport centre.
    pub fn apply_delta(
        self,
        transform: ZoomTransform,
        delta: ZoomTransform,
        viewport: Viewport,
    ) -> ChartResult<ZoomTransform> {
        let composed = transform.then(delta);
        if composed.k == self.clamp_k(composed.k) {
            return Ok(self.constrain(composed, viewport));
        }
        let center = (viewport.width_px() / 2.0, viewport.height_px() / 2.0);
        self.scale_to(composed, composed.k, center, viewport)
    }

    /// Shifts the translation so the content stays inside the translate
    /// bounds; centres it when it is smaller than the viewport.
    #[must_use]
    pub fn constrain(self, transform: ZoomTransform, viewport: Viewport) -> ZoomTransform {
        let Some((tx0, ty0, tx1, ty1)) = self.translate_bounds.rect(viewport) else {
            return transform;
        };
        let (width, height) = (viewport.width_px(), viewport.height_px());

        let dx0 = transform.invert_x(0.0) - tx0;
        let dx1 = transform.invert_x(width) - tx1;
        let dy0 = transform.invert_y(0.0) - ty0;
        let dy1 = transform.invert_y(height) - ty1;

        let shift_x = constrained_shift(dx0, dx1);
        let shift_y = constrained_shift(dy0, dy1);
        ZoomTransform {
            k: transform.k,
            x: transform.x + transform.k * shift_x,
            y: transform.y + transform.k * shift_y,
        }
    }
}

fn constrained_shift(d0: f64, d1: f64) -> f64 {
    if d1 > d0 {
        return (d0 + d1) / 2.0;
    }
    let low = d0.min(0.0);
    if low != 0.0 { low } else { d1.max(0.0) }
}

fn validate_point(point: (f64, f64)) -> ChartResult<()> {
    if !point.0.is_finite() || !point.1.is_finite() {
        return Err(ChartError::InvalidData(
            "zoom gesture coordinates must be finite".to_owned(),
        ));
    }
    Ok(())
}
