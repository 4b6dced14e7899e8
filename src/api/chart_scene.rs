use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    CategoryMean, CategoryPalette, ColorDomain, ColorScale, ContinuousScale, DEFAULT_TICK_COUNT,
    DuplicatePolicy, IndexScale, LinearScale, Record, Series, SeriesIndex, SeriesPoint, TimeScale,
    ZoomTransform, change_series, group_series, mean_by_category, month_over_month,
};
use crate::error::ChartResult;

use super::{ChartConfig, ChartKind, FilterSelection, ViewMode, ZoomAxes};

/// Heatmap cells are separated by a thin gap.
const HEATMAP_CELL_PADDING: f64 = 0.02;
/// Name of the merged series a heatmap is drawn from.
pub const HEATMAP_SERIES_NAME: &str = "Selection";

/// One month of the calendar heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub year: i32,
    /// Calendar month, 1-based.
    pub month: u32,
    pub value: Option<f64>,
}

impl HeatmapCell {
    #[must_use]
    pub fn date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

/// Aggregated data a chart draws.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneData {
    Line {
        series: Vec<Series>,
        indexes: Vec<SeriesIndex>,
    },
    Bar {
        bars: Vec<CategoryMean>,
    },
    Heatmap {
        years: Vec<i32>,
        cells: Vec<HeatmapCell>,
    },
}

/// Scales of one chart, either the fitted base or their zoomed form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SceneScales {
    Line { x: TimeScale, y: LinearScale },
    Bar { x: IndexScale, y: LinearScale },
    Heatmap { x: IndexScale, y: IndexScale },
}

impl SceneScales {
    /// Applies `zoom` to the axes selected by `axes`.
    pub fn rescaled(self, zoom: ZoomTransform, axes: ZoomAxes) -> ChartResult<Self> {
        Ok(match self {
            Self::Line { x, y } => Self::Line {
                x: rescale_axis(zoom, &x, axes.includes_x(), true)?,
                y: rescale_axis(zoom, &y, axes.includes_y(), false)?,
            },
            Self::Bar { x, y } => Self::Bar {
                x: rescale_axis(zoom, &x, axes.includes_x(), true)?,
                y: rescale_axis(zoom, &y, axes.includes_y(), false)?,
            },
            Self::Heatmap { x, y } => Self::Heatmap {
                x: rescale_axis(zoom, &x, axes.includes_x(), true)?,
                y: rescale_axis(zoom, &y, axes.includes_y(), false)?,
            },
        })
    }

    #[must_use]
    pub fn x_domain(self) -> (f64, f64) {
        match self {
            Self::Line { x, .. } => x.domain(),
            Self::Bar { x, .. } | Self::Heatmap { x, .. } => x.domain(),
        }
    }

    #[must_use]
    pub fn y_domain(self) -> (f64, f64) {
        match self {
            Self::Line { y, .. } | Self::Bar { y, .. } => y.domain(),
            Self::Heatmap { y, .. } => y.domain(),
        }
    }
}

fn rescale_axis<S: ContinuousScale>(
    zoom: ZoomTransform,
    base: &S,
    enabled: bool,
    horizontal: bool,
) -> ChartResult<S> {
    match (enabled, horizontal) {
        (false, _) => Ok(*base),
        (true, true) => zoom.rescale_x(base),
        (true, false) => zoom.rescale_y(base),
    }
}

/// Everything derived from records and the active selection.
///
/// Rebuilt on selection changes only; zoom and pointer events reuse it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    pub data: SceneData,
    pub base: SceneScales,
    pub palette: CategoryPalette,
    pub color: ColorScale,
}

impl ChartScene {
    pub fn build(
        records: &[Record],
        selection: &FilterSelection,
        config: &ChartConfig,
    ) -> ChartResult<Self> {
        let filtered: Vec<&Record> = selection.filter.apply(records).collect();
        let scene = match config.kind {
            ChartKind::Line => build_line(&filtered, selection, config)?,
            ChartKind::Bar => build_bar(&filtered, selection, config)?,
            ChartKind::Heatmap => build_heatmap(&filtered, selection, config)?,
        };
        debug!(
            kind = ?config.kind,
            records = records.len(),
            selected = filtered.len(),
            categories = scene.palette.len(),
            x_domain = ?scene.base.x_domain(),
            y_domain = ?scene.base.y_domain(),
            color_bounds = ?scene.color.domain.bounds,
            "chart scene rebuilt"
        );
        Ok(scene)
    }

    /// Defined values the scene's color domain was derived from.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        match &self.data {
            SceneData::Line { series, .. } => series.iter().flat_map(Series::values).collect(),
            SceneData::Bar { bars } => bars.iter().filter_map(|bar| bar.mean).collect(),
            SceneData::Heatmap { cells, .. } => {
                cells.iter().filter_map(|cell| cell.value).collect()
            }
        }
    }
}

fn build_line(
    filtered: &[&Record],
    selection: &FilterSelection,
    config: &ChartConfig,
) -> ChartResult<ChartScene> {
    let mut series = group_series(filtered.iter().copied(), config.duplicate_policy);
    if selection.view_mode == ViewMode::Changes {
        series = series.iter().map(change_series).collect();
    }

    let x = TimeScale::from_dates(
        series
            .iter()
            .flat_map(|series| series.points().iter().map(|point| point.date)),
        (0.0, config.viewport.width_px()),
    )?;
    let values: Vec<f64> = series.iter().flat_map(Series::values).collect();
    let y = value_scale(&values, selection.view_mode, config)?;
    let indexes = series.iter().map(SeriesIndex::from_series).collect();
    let palette = CategoryPalette::new(series.iter().map(|series| series.category.clone()));
    let color = color_scale(&values, selection, config)?;

    Ok(ChartScene {
        data: SceneData::Line { series, indexes },
        base: SceneScales::Line { x, y },
        palette,
        color,
    })
}

fn build_bar(
    filtered: &[&Record],
    selection: &FilterSelection,
    config: &ChartConfig,
) -> ChartResult<ChartScene> {
    let bars = match selection.view_mode {
        ViewMode::Absolute => mean_by_category(filtered.iter().copied()),
        ViewMode::Changes => group_series(filtered.iter().copied(), config.duplicate_policy)
            .iter()
            .map(mean_change)
            .collect(),
    };

    let x = IndexScale::new(
        bars.len(),
        (0.0, config.viewport.width_px()),
        config.band_padding,
    )?;
    let values: Vec<f64> = bars.iter().filter_map(|bar| bar.mean).collect();
    let y = value_scale(&values, selection.view_mode, config)?;
    let palette = CategoryPalette::new(bars.iter().map(|bar| bar.category.clone()));
    let color = color_scale(&values, selection, config)?;

    Ok(ChartScene {
        data: SceneData::Bar { bars },
        base: SceneScales::Bar { x, y },
        palette,
        color,
    })
}

fn mean_change(series: &Series) -> CategoryMean {
    let changes: Vec<f64> = month_over_month(series)
        .into_iter()
        .filter_map(|point| point.change)
        .collect();
    CategoryMean {
        category: series.category.clone(),
        mean: (!changes.is_empty()).then(|| changes.iter().sum::<f64>() / changes.len() as f64),
        count: changes.len(),
    }
}

fn build_heatmap(
    filtered: &[&Record],
    selection: &FilterSelection,
    config: &ChartConfig,
) -> ChartResult<ChartScene> {
    // Categories are merged into one monthly mean before any change is taken.
    let merged = Series::from_points(
        HEATMAP_SERIES_NAME,
        filtered
            .iter()
            .map(|record| SeriesPoint::new(record.date, record.value))
            .collect(),
        DuplicatePolicy::Mean,
    );
    let merged = match selection.view_mode {
        ViewMode::Absolute => merged,
        ViewMode::Changes => change_series(&merged),
    };

    let years: Vec<i32> = match (merged.points().first(), merged.points().last()) {
        (Some(first), Some(last)) => (first.date.year()..=last.date.year()).collect(),
        _ => Vec::new(),
    };
    let cells: Vec<HeatmapCell> = years
        .iter()
        .flat_map(|year| (1..=12).map(move |month| (*year, month)))
        .map(|(year, month)| HeatmapCell {
            year,
            month,
            value: NaiveDate::from_ymd_opt(year, month, 1)
                .and_then(|date| merged.get(date))
                .and_then(|point| point.value),
        })
        .collect();

    let x = IndexScale::new(12, (0.0, config.viewport.width_px()), HEATMAP_CELL_PADDING)?;
    let y = IndexScale::new(
        years.len(),
        (0.0, config.viewport.height_px()),
        HEATMAP_CELL_PADDING,
    )?;
    let values: Vec<f64> = cells.iter().filter_map(|cell| cell.value).collect();
    let categories: BTreeSet<&str> = filtered
        .iter()
        .map(|record| record.category.as_str())
        .collect();
    let palette = CategoryPalette::new(categories);
    let color = color_scale(&values, selection, config)?;

    Ok(ChartScene {
        data: SceneData::Heatmap { years, cells },
        base: SceneScales::Heatmap { x, y },
        palette,
        color,
    })
}

/// Upward value axis: `[0, max]` for index values, the extent including
/// zero for changes.
fn value_scale(values: &[f64], mode: ViewMode, config: &ChartConfig) -> ChartResult<LinearScale> {
    let range = (config.viewport.height_px(), 0.0);
    let scale = match mode {
        ViewMode::Absolute => LinearScale::zero_based(values.iter().copied(), range)?,
        ViewMode::Changes => {
            LinearScale::from_extent(values.iter().copied().chain(std::iter::once(0.0)), range)?
        }
    };
    Ok(if config.nice_value_axis {
        scale.nice(DEFAULT_TICK_COUNT)
    } else {
        scale
    })
}

fn color_scale(
    values: &[f64],
    selection: &FilterSelection,
    config: &ChartConfig,
) -> ChartResult<ColorScale> {
    let domain = ColorDomain::from_values_buffered(
        values.iter().copied(),
        selection.view_mode.color_mode(),
        config.color_buffer_factor,
    )?;
    Ok(ColorScale::new(domain, selection.color_scheme))
}
