use serde::{Deserialize, Serialize};

use crate::core::color::validate_buffer_factor;
use crate::core::{
    DEFAULT_BAND_PADDING, DEFAULT_BUFFER_FACTOR, DuplicatePolicy, EdgePolicy, IndexScale,
    Viewport, ZoomBehavior,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::TooltipMode;

/// Chart families sharing the interaction engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartKind {
    /// One time-series line per category.
    #[default]
    Line,
    /// One bar per category holding its mean over the selection.
    Bar,
    /// Month × year calendar grid of the selection's monthly mean.
    Heatmap,
}

/// Axes that follow the zoom transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZoomAxes {
    #[default]
    X,
    Y,
    Both,
}

impl ZoomAxes {
    #[must_use]
    pub fn includes_x(self) -> bool {
        matches!(self, Self::X | Self::Both)
    }

    #[must_use]
    pub fn includes_y(self) -> bool {
        matches!(self, Self::Y | Self::Both)
    }
}

/// Chart controller bootstrap configuration.
///
/// Serializable so hosts can keep chart setup next to their own settings.
/// All pixel values are relative to the plot area described by `viewport`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub kind: ChartKind,
    #[serde(default)]
    pub zoom: ZoomBehavior,
    #[serde(default)]
    pub zoom_axes: ZoomAxes,
    #[serde(default)]
    pub edge_policy: EdgePolicy,
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
    #[serde(default)]
    pub tooltip_mode: TooltipMode,
    #[serde(default = "default_band_padding")]
    pub band_padding: f64,
    #[serde(default = "default_color_buffer_factor")]
    pub color_buffer_factor: f64,
    #[serde(default = "default_nice_value_axis")]
    pub nice_value_axis: bool,
    #[serde(default = "default_legend_stops")]
    pub legend_stops: usize,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

fn default_band_padding() -> f64 {
    DEFAULT_BAND_PADDING
}

fn default_color_buffer_factor() -> f64 {
    DEFAULT_BUFFER_FACTOR
}

fn default_nice_value_axis() -> bool {
    true
}

fn default_legend_stops() -> usize {
    9
}

fn default_stroke_width() -> f64 {
    1.5
}

impl ChartConfig {
    #[must_use]
    pub fn new(viewport: Viewport, kind: ChartKind) -> Self {
        Self {
            viewport,
            kind,
            zoom: ZoomBehavior::default(),
            zoom_axes: ZoomAxes::default(),
            edge_policy: EdgePolicy::default(),
            duplicate_policy: DuplicatePolicy::default(),
            tooltip_mode: TooltipMode::default(),
            band_padding: default_band_padding(),
            color_buffer_factor: default_color_buffer_factor(),
            nice_value_axis: default_nice_value_axis(),
            legend_stops: default_legend_stops(),
            stroke_width: default_stroke_width(),
        }
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: ZoomBehavior) -> Self {
        self.zoom = zoom;
        self
    }

    #[must_use]
    pub fn with_zoom_axes(mut self, axes: ZoomAxes) -> Self {
        self.zoom_axes = axes;
        self
    }

    #[must_use]
    pub fn with_edge_policy(mut self, policy: EdgePolicy) -> Self {
        self.edge_policy = policy;
        self
    }

    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    #[must_use]
    pub fn with_tooltip_mode(mut self, mode: TooltipMode) -> Self {
        self.tooltip_mode = mode;
        self
    }

    #[must_use]
    pub fn with_band_padding(mut self, padding: f64) -> Self {
        self.band_padding = padding;
        self
    }

    #[must_use]
    pub fn with_color_buffer_factor(mut self, factor: f64) -> Self {
        self.color_buffer_factor = factor;
        self
    }

    #[must_use]
    pub fn with_nice_value_axis(mut self, nice: bool) -> Self {
        self.nice_value_axis = nice;
        self
    }

    /// Checks every field; a failure here is a caller bug, not a data issue.
    pub fn validate(self) -> ChartResult<Self> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        self.zoom.validate()?;
        // Padding bounds are owned by the index scale.
        IndexScale::new(0, (0.0, 1.0), self.band_padding)?;
        validate_buffer_factor(self.color_buffer_factor)?;
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "stroke width must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }

    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| ChartError::InvalidData(format!("serialize chart config: {err}")))
    }

    pub fn from_json(json: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| ChartError::InvalidConfig(format!("parse chart config: {err}")))?;
        config.validate()
    }
}
