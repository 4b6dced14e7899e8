use tracing::{debug, trace};

use crate::core::{Record, ZoomTransform};
use crate::error::ChartResult;
use crate::interaction::{TooltipMode, TooltipState};
use crate::render::{RenderFrame, Renderer};

use super::chart_scene::SceneScales;
use super::projection::{ProjectionInput, project_frame};
use super::{ChartConfig, ChartEvent, ChartScene, ChartState, FilterSelection, StateChange};

/// Single owner of chart state.
///
/// Events go through [`ChartController::dispatch`]; derived data (scene,
/// tooltip target) is recomputed from the reduced state before it is
/// committed, so a failing event leaves the controller untouched.
pub struct ChartController<R: Renderer> {
    renderer: R,
    config: ChartConfig,
    records: Vec<Record>,
    state: ChartState,
    scene: ChartScene,
}

impl<R: Renderer> ChartController<R> {
    pub fn new(
        renderer: R,
        config: ChartConfig,
        records: Vec<Record>,
        selection: FilterSelection,
    ) -> ChartResult<Self> {
        let config = config.validate()?;
        selection.validate()?;
        let scene = ChartScene::build(&records, &selection, &config)?;
        debug!(
            kind = ?config.kind,
            width = config.viewport.width,
            height = config.viewport.height,
            records = records.len(),
            "chart controller created"
        );
        Ok(Self {
            renderer,
            state: ChartState::new(selection, config.tooltip_mode),
            config,
            records,
            scene,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn state(&self) -> &ChartState {
        &self.state
    }

    #[must_use]
    pub fn selection(&self) -> &FilterSelection {
        &self.state.selection
    }

    #[must_use]
    pub fn zoom(&self) -> ZoomTransform {
        self.state.zoom
    }

    #[must_use]
    pub fn tooltip(&self) -> &TooltipState {
        self.state.interaction.tooltip()
    }

    #[must_use]
    pub fn scene(&self) -> &ChartScene {
        &self.scene
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Base scales with the current zoom applied.
    pub fn effective_scales(&self) -> ChartResult<SceneScales> {
        self.scene
            .base
            .rescaled(self.state.zoom, self.config.zoom_axes)
    }

    /// Replaces the loaded records and rebuilds the scene under the current
    /// selection. Zoom is kept.
    pub fn set_records(&mut self, records: Vec<Record>) -> ChartResult<()> {
        let scene = ChartScene::build(&records, &self.state.selection, &self.config)?;
        let mut state = self.state.clone();
        refresh_tooltip(&mut state, &scene, &self.config)?;
        debug!(records = records.len(), "set records");
        self.records = records;
        self.scene = scene;
        self.state = state;
        Ok(())
    }

    /// Applies one input event.
    pub fn dispatch(&mut self, event: ChartEvent) -> ChartResult<StateChange> {
        let (mut next, change) = self.state.reduce(&event, &self.config)?;

        let rebuilt = match change {
            StateChange::Selection => Some(ChartScene::build(
                &self.records,
                &next.selection,
                &self.config,
            )?),
            _ => None,
        };
        if change != StateChange::None {
            refresh_tooltip(&mut next, rebuilt.as_ref().unwrap_or(&self.scene), &self.config)?;
        }

        trace!(
            ?event,
            ?change,
            k = next.zoom.k(),
            tx = next.zoom.x(),
            ty = next.zoom.y(),
            "chart event"
        );
        if let Some(scene) = rebuilt {
            self.scene = scene;
        }
        self.state = next;
        Ok(change)
    }

    /// Projects the current state into a frame without rendering it.
    pub fn build_frame(&self) -> ChartResult<RenderFrame> {
        project_frame(ProjectionInput {
            scene: &self.scene,
            scales: self.effective_scales()?,
            config: &self.config,
            view_mode: self.state.selection.view_mode,
            tooltip: self.state.interaction.tooltip(),
        })
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_frame()?;
        trace!(
            rects = frame.rects.len(),
            polylines = frame.polylines.len(),
            lines = frame.lines.len(),
            texts = frame.texts.len(),
            "render frame"
        );
        self.renderer.render(&frame)
    }
}

/// Re-resolves the tooltip target against `scene` at the stored pointer.
fn refresh_tooltip(
    state: &mut ChartState,
    scene: &ChartScene,
    config: &ChartConfig,
) -> ChartResult<()> {
    let pointer = match state.interaction.pointer() {
        Some(pointer) if state.interaction.tooltip_mode() == TooltipMode::Snap => pointer,
        _ => {
            state.interaction.set_tooltip_target(None);
            return Ok(());
        }
    };
    let scales = scene.base.rescaled(state.zoom, config.zoom_axes)?;
    let target = scene.resolve_tooltip(scales, pointer, config.edge_policy);
    state.interaction.set_tooltip_target(target);
    Ok(())
}
