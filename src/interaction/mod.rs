use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Idle,
    Panning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TooltipMode {
    /// Tooltip snaps to the nearest data sample.
    #[default]
    Snap,
    /// Tooltip follows the raw pointer without resolving data.
    Follow,
    /// Tooltip stays hidden regardless of pointer movement.
    Hidden,
}

/// The data item a tooltip is pinned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipTarget {
    pub category: String,
    /// `None` for per-category aggregates (bar charts).
    pub date: Option<NaiveDate>,
    pub value: f64,
    pub x: f64,
    pub y: f64,
}

/// Tooltip state exposed to host applications.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipState {
    pub visible: bool,
    pub x: f64,
    pub y: f64,
    pub target: Option<TooltipTarget>,
}

/// Pointer-driven state owned by the chart controller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionState {
    mode: InteractionMode,
    tooltip_mode: TooltipMode,
    tooltip: TooltipState,
}

impl InteractionState {
    #[must_use]
    pub fn new(tooltip_mode: TooltipMode) -> Self {
        Self {
            tooltip_mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn tooltip_mode(&self) -> TooltipMode {
        self.tooltip_mode
    }

    pub fn set_tooltip_mode(&mut self, mode: TooltipMode) {
        self.tooltip_mode = mode;
        if mode == TooltipMode::Hidden {
            self.on_pointer_leave();
        }
    }

    #[must_use]
    pub fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    #[must_use]
    pub fn pointer(&self) -> Option<(f64, f64)> {
        self.tooltip
            .visible
            .then_some((self.tooltip.x, self.tooltip.y))
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        if self.tooltip_mode == TooltipMode::Hidden {
            return;
        }
        self.tooltip.visible = true;
        self.tooltip.x = x;
        self.tooltip.y = y;
    }

    pub fn on_pointer_leave(&mut self) {
        self.tooltip.visible = false;
        self.tooltip.target = None;
    }

    pub fn set_tooltip_target(&mut self, target: Option<TooltipTarget>) {
        self.tooltip.target = match self.tooltip_mode {
            TooltipMode::Snap if self.tooltip.visible => target,
            _ => None,
        };
    }

    pub fn on_pan_start(&mut self) {
        self.mode = InteractionMode::Panning;
    }

    pub fn on_pan_end(&mut self) {
        self.mode = InteractionMode::Idle;
    }
}
