use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{WheelDeltaMode, ZoomTransform, wheel_factor};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{InteractionMode, InteractionState, TooltipMode};

use super::{ChartConfig, FilterSelection};

/// Input handled by [`super::ChartController::dispatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartEvent {
    /// Pointer moved to `(x, y)` in plot-local pixels.
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    /// Wheel gesture anchored at `(x, y)`.
    Wheel {
        delta_y: f64,
        delta_mode: WheelDeltaMode,
        x: f64,
        y: f64,
    },
    /// Programmatic zoom by `factor` about `(x, y)`.
    ZoomBy { factor: f64, x: f64, y: f64 },
    DragStart,
    /// Drag delta in screen pixels; ignored outside a drag.
    Drag { dx: f64, dy: f64 },
    DragEnd,
    ResetZoom,
    SetSelection(FilterSelection),
    SetTooltipMode(TooltipMode),
}

/// What a reduced event invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    None,
    Pointer,
    Zoom,
    Selection,
}

/// Everything the controller mutates in response to events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartState {
    pub selection: FilterSelection,
    pub zoom: ZoomTransform,
    pub interaction: InteractionState,
}

impl ChartState {
    #[must_use]
    pub fn new(selection: FilterSelection, tooltip_mode: TooltipMode) -> Self {
        Self {
            selection,
            zoom: ZoomTransform::IDENTITY,
            interaction: InteractionState::new(tooltip_mode),
        }
    }

    /// Applies `event` and returns the next state with what it invalidated.
    ///
    /// Pure: derived data (scales, indexes, tooltip targets) is left to the
    /// controller.
    pub fn reduce(
        &self,
        event: &ChartEvent,
        config: &ChartConfig,
    ) -> ChartResult<(Self, StateChange)> {
        let mut next = self.clone();
        let behavior = config.zoom;
        let viewport = config.viewport;

        let change = match event {
            ChartEvent::PointerMove { x, y } => {
                if !x.is_finite() || !y.is_finite() {
                    return Err(ChartError::InvalidData(
                        "pointer position must be finite".to_owned(),
                    ));
                }
                next.interaction.on_pointer_move(*x, *y);
                StateChange::Pointer
            }
            ChartEvent::PointerLeave => {
                next.interaction.on_pointer_leave();
                StateChange::Pointer
            }
            ChartEvent::Wheel {
                delta_y,
                delta_mode,
                x,
                y,
            } => {
                let factor = wheel_factor(*delta_y, *delta_mode)?;
                trace!(delta_y, factor, "wheel zoom");
                next.zoom = behavior.scale_by(self.zoom, factor, (*x, *y), viewport)?;
                StateChange::Zoom
            }
            ChartEvent::ZoomBy { factor, x, y } => {
                next.zoom = behavior.scale_by(self.zoom, *factor, (*x, *y), viewport)?;
                StateChange::Zoom
            }
            ChartEvent::DragStart => {
                next.interaction.on_pan_start();
                StateChange::None
            }
            ChartEvent::Drag { dx, dy } => {
                if self.interaction.mode() != InteractionMode::Panning {
                    return Ok((next, StateChange::None));
                }
                next.zoom = behavior.translate_by(self.zoom, *dx, *dy, viewport)?;
                StateChange::Zoom
            }
            ChartEvent::DragEnd => {
                next.interaction.on_pan_end();
                StateChange::None
            }
            ChartEvent::ResetZoom => {
                next.zoom = ZoomTransform::IDENTITY;
                StateChange::Zoom
            }
            ChartEvent::SetSelection(selection) => {
                selection.validate()?;
                next.selection = selection.clone();
                StateChange::Selection
            }
            ChartEvent::SetTooltipMode(mode) => {
                next.interaction.set_tooltip_mode(*mode);
                StateChange::Pointer
            }
        };

        Ok((next, change))
    }
}
