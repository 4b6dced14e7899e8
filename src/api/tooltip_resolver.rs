use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::core::{ContinuousScale, EdgePolicy, IndexScale, LinearScale, SeriesIndex, TimeScale};
use crate::interaction::TooltipTarget;

use super::chart_scene::{HEATMAP_SERIES_NAME, HeatmapCell, SceneData, SceneScales};
use super::ChartScene;

impl ChartScene {
    /// Data item under `pointer` for the given (possibly zoomed) scales.
    ///
    /// Line charts snap to the nearest sample across all series by pixel
    /// distance. Bars and heatmap cells resolve by hit-testing their slots.
    #[must_use]
    pub fn resolve_tooltip(
        &self,
        scales: SceneScales,
        pointer: (f64, f64),
        edge: EdgePolicy,
    ) -> Option<TooltipTarget> {
        if !pointer.0.is_finite() || !pointer.1.is_finite() {
            return None;
        }
        match (&self.data, scales) {
            (SceneData::Line { series, indexes }, SceneScales::Line { x, y }) => {
                let categories = series.iter().map(|series| series.category.as_str());
                nearest_line_sample(categories, indexes, x, y, pointer, edge)
            }
            (SceneData::Bar { bars }, SceneScales::Bar { x, y }) => {
                let slot = x.slot_at(pointer.0)?;
                let bar = bars.get(slot)?;
                let mean = bar.mean?;
                Some(TooltipTarget {
                    category: bar.category.clone(),
                    date: None,
                    value: mean,
                    x: x.slot_center(slot)?,
                    y: y.map(mean),
                })
            }
            (SceneData::Heatmap { cells, .. }, SceneScales::Heatmap { x, y }) => {
                heatmap_cell_at(cells, x, y, pointer)
            }
            _ => None,
        }
    }
}

fn nearest_line_sample<'a>(
    categories: impl Iterator<Item = &'a str>,
    indexes: &[SeriesIndex],
    x: TimeScale,
    y: LinearScale,
    pointer: (f64, f64),
    edge: EdgePolicy,
) -> Option<TooltipTarget> {
    let query = x.invert(pointer.0);
    let mut candidates: SmallVec<[(OrderedFloat<f64>, TooltipTarget); 8]> = SmallVec::new();
    for (category, index) in categories.zip(indexes) {
        let Some(sample) = index.nearest(query, edge) else {
            continue;
        };
        let x_px = x.map(sample.x);
        let y_px = y.map(sample.y);
        let dist = OrderedFloat((x_px - pointer.0).hypot(y_px - pointer.1));
        candidates.push((
            dist,
            TooltipTarget {
                category: category.to_owned(),
                date: Some(sample.date),
                value: sample.y,
                x: x_px,
                y: y_px,
            },
        ));
    }

    candidates
        .into_iter()
        .min_by_key(|item| item.0)
        .map(|(_, target)| target)
}

fn heatmap_cell_at(
    cells: &[HeatmapCell],
    x: IndexScale,
    y: IndexScale,
    pointer: (f64, f64),
) -> Option<TooltipTarget> {
    let column = x.slot_at(pointer.0)?;
    let row = y.slot_at(pointer.1)?;
    let cell = cells.get(row * x.count() + column)?;
    Some(TooltipTarget {
        category: HEATMAP_SERIES_NAME.to_owned(),
        date: cell.date(),
        value: cell.value?,
        x: x.slot_center(column)?,
        y: y.slot_center(row)?,
    })
}
