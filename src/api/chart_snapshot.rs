use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{ColorScale, ZoomTransform};
use crate::error::{ChartError, ChartResult};
use crate::interaction::TooltipState;
use crate::render::Renderer;

use super::chart_scene::{SceneData, SceneScales};
use super::{ChartConfig, ChartController, FilterSelection};

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub config: ChartConfig,
    pub selection: FilterSelection,
    pub zoom: ZoomTransform,
    pub base_scales: SceneScales,
    pub effective_scales: SceneScales,
    pub color: ColorScale,
    pub tooltip: TooltipState,
    /// Category → palette slot, in slot order.
    pub category_slots: IndexMap<String, usize>,
    /// Category (or heatmap year) → number of marks drawn for it.
    pub mark_counts: IndexMap<String, usize>,
}

impl<R: Renderer> ChartController<R> {
    pub fn snapshot(&self) -> ChartResult<ChartSnapshot> {
        let scene = self.scene();
        let category_slots = scene
            .palette
            .categories()
            .filter_map(|category| {
                scene
                    .palette
                    .slot(category)
                    .map(|slot| (category.to_owned(), slot))
            })
            .collect();

        let mark_counts = match &scene.data {
            SceneData::Line { series, .. } => series
                .iter()
                .map(|series| (series.category.clone(), series.values().count()))
                .collect(),
            SceneData::Bar { bars } => bars
                .iter()
                .map(|bar| (bar.category.clone(), usize::from(bar.mean.is_some())))
                .collect(),
            SceneData::Heatmap { years, cells } => years
                .iter()
                .map(|year| {
                    let defined = cells
                        .iter()
                        .filter(|cell| cell.year == *year && cell.value.is_some())
                        .count();
                    (year.to_string(), defined)
                })
                .collect(),
        };

        Ok(ChartSnapshot {
            config: *self.config(),
            selection: self.selection().clone(),
            zoom: self.zoom(),
            base_scales: scene.base,
            effective_scales: self.effective_scales()?,
            color: scene.color,
            tooltip: self.tooltip().clone(),
            category_slots,
            mark_counts,
        })
    }

    /// Serializes snapshot as pretty JSON for fixture-based regression checks.
    pub fn snapshot_json(&self) -> ChartResult<String> {
        let snapshot = self.snapshot()?;
        serde_json::to_string_pretty(&snapshot)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}
