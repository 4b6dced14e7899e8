use chrono::Datelike;

use crate::core::{
    CategoryMean, CategoryPalette, Color, ColorScale, ContinuousScale, DEFAULT_TICK_COUNT,
    IndexScale, LinearScale, Series, TimeScale, Viewport,
};
use crate::error::ChartResult;
use crate::interaction::{TooltipState, TooltipTarget};
use crate::render::{
    LinePrimitive, PolylinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};

use super::chart_scene::{HeatmapCell, SceneData, SceneScales};
use super::{ChartConfig, ChartScene, ViewMode};

const AXIS_COLOR: Color = Color::rgb(0.35, 0.35, 0.35);
const LABEL_COLOR: Color = Color::rgb(0.15, 0.15, 0.15);
const GUIDE_COLOR: Color = Color::rgba(0.2, 0.2, 0.2, 0.6);
const FALLBACK_SERIES_COLOR: Color = Color::rgb(0.12, 0.47, 0.71);
const LABEL_FONT_PX: f64 = 11.0;
const TICK_LENGTH_PX: f64 = 6.0;
const AXIS_STROKE_PX: f64 = 1.0;
/// Minimum horizontal room per time-axis label.
const TIME_LABEL_SPACING_PX: f64 = 80.0;
const LEGEND_OFFSET_PX: f64 = 16.0;
const LEGEND_SWATCH_PX: f64 = 10.0;
const LEGEND_ROW_PX: f64 = 16.0;
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
pub const NO_DATA_LABEL: &str = "no data";

/// Everything needed to turn a scene into draw commands.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput<'a> {
    pub scene: &'a ChartScene,
    /// Scales after zoom has been applied.
    pub scales: SceneScales,
    pub config: &'a ChartConfig,
    pub view_mode: ViewMode,
    pub tooltip: &'a TooltipState,
}

/// Builds the full frame: marks, axes, legend and tooltip guide.
pub fn project_frame(input: ProjectionInput<'_>) -> ChartResult<RenderFrame> {
    let viewport = input.config.viewport;
    let mut frame = RenderFrame::new(viewport);
    let scene = input.scene;

    match (&scene.data, input.scales) {
        (SceneData::Line { series, .. }, SceneScales::Line { x, y }) => {
            for series in series {
                let color = scene
                    .palette
                    .color(&series.category)
                    .unwrap_or(FALLBACK_SERIES_COLOR);
                frame.polylines.extend(project_series_path(
                    series,
                    x,
                    y,
                    input.config.stroke_width,
                    color,
                ));
            }
            project_time_axis(&mut frame, x, viewport);
            project_value_axis(&mut frame, y, viewport);
            project_category_legend(&mut frame, &scene.palette, viewport);
        }
        (SceneData::Bar { bars }, SceneScales::Bar { x, y }) => {
            let fill = |bar: &CategoryMean| match input.view_mode {
                ViewMode::Absolute => scene.palette.color(&bar.category),
                ViewMode::Changes => bar.mean.map(|mean| scene.color.color(mean)),
            };
            project_bars(&mut frame, bars, x, y, fill);
            project_slot_labels(
                &mut frame,
                x,
                bars.iter().map(|bar| bar.category.as_str()),
                viewport,
            );
            project_value_axis(&mut frame, y, viewport);
            match input.view_mode {
                ViewMode::Absolute => project_category_legend(&mut frame, &scene.palette, viewport),
                ViewMode::Changes => {
                    let stops = input.config.legend_stops;
                    project_color_legend(&mut frame, scene.color, stops, viewport);
                }
            }
        }
        (SceneData::Heatmap { years, cells }, SceneScales::Heatmap { x, y }) => {
            project_heatmap_cells(&mut frame, cells, x, y, scene.color);
            project_slot_labels(&mut frame, x, MONTH_LABELS.iter().copied(), viewport);
            project_year_labels(&mut frame, y, years);
            project_color_legend(&mut frame, scene.color, input.config.legend_stops, viewport);
        }
        _ => {}
    }

    project_tooltip(&mut frame, input.tooltip, input.view_mode, viewport);
    Ok(frame)
}

/// Splits a series into connected pixel runs; missing values break the path.
#[must_use]
pub fn project_series_path(
    series: &Series,
    x: TimeScale,
    y: LinearScale,
    stroke_width: f64,
    color: Color,
) -> Vec<PolylinePrimitive> {
    let mut runs = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for point in series.points() {
        match point.value {
            Some(value) => current.push((x.map_date(point.date), y.map(value))),
            None if !current.is_empty() => {
                runs.push(PolylinePrimitive::new(
                    std::mem::take(&mut current),
                    stroke_width,
                    color,
                ));
            }
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(PolylinePrimitive::new(current, stroke_width, color));
    }
    runs
}

fn project_bars<F>(
    frame: &mut RenderFrame,
    bars: &[CategoryMean],
    x: IndexScale,
    y: LinearScale,
    fill: F,
) where
    F: Fn(&CategoryMean) -> Option<Color>,
{
    let baseline = y.map(0.0);
    for (slot, bar) in bars.iter().enumerate() {
        let Some((x0, x1)) = x.slot_extent(slot) else {
            continue;
        };
        match bar.mean {
            Some(mean) => frame.rects.push(RectPrimitive::from_corners(
                x0,
                baseline,
                x1,
                y.map(mean),
                fill(bar).unwrap_or(FALLBACK_SERIES_COLOR),
            )),
            None => frame.texts.push(TextPrimitive::new(
                NO_DATA_LABEL,
                (x0 + x1) / 2.0,
                baseline - TICK_LENGTH_PX,
                LABEL_FONT_PX,
                LABEL_COLOR,
                TextHAlign::Center,
            )),
        }
    }
}

fn project_heatmap_cells(
    frame: &mut RenderFrame,
    cells: &[HeatmapCell],
    x: IndexScale,
    y: IndexScale,
    color: ColorScale,
) {
    let columns = x.count().max(1);
    for (position, cell) in cells.iter().enumerate() {
        let (Some((x0, x1)), Some((y0, y1))) = (
            x.slot_extent(position % columns),
            y.slot_extent(position / columns),
        ) else {
            continue;
        };
        frame.rects.push(RectPrimitive::from_corners(
            x0,
            y0,
            x1,
            y1,
            color.color_or_no_data(cell.value),
        ));
    }
}

fn project_time_axis(frame: &mut RenderFrame, x: TimeScale, viewport: Viewport) {
    let width = viewport.width_px();
    let height = viewport.height_px();
    frame.lines.push(LinePrimitive::new(
        0.0,
        height,
        width,
        height,
        AXIS_STROKE_PX,
        AXIS_COLOR,
    ));

    let max_ticks = ((width / TIME_LABEL_SPACING_PX).floor() as usize).max(2);
    let ticks = x.ticks(max_ticks);
    let yearly = ticks.iter().all(|date| date.month() == 1);
    for date in ticks {
        let px = x.map_date(date);
        if !(0.0..=width).contains(&px) {
            continue;
        }
        let label = if yearly {
            date.format("%Y").to_string()
        } else {
            date.format("%b %Y").to_string()
        };
        push_tick(frame, (px, height), (px, height + TICK_LENGTH_PX));
        frame.texts.push(TextPrimitive::new(
            label,
            px,
            height + TICK_LENGTH_PX + LABEL_FONT_PX,
            LABEL_FONT_PX,
            LABEL_COLOR,
            TextHAlign::Center,
        ));
    }
}

fn project_value_axis(frame: &mut RenderFrame, y: LinearScale, viewport: Viewport) {
    let height = viewport.height_px();
    frame.lines.push(LinePrimitive::new(
        0.0,
        0.0,
        0.0,
        height,
        AXIS_STROKE_PX,
        AXIS_COLOR,
    ));

    for value in y.ticks(DEFAULT_TICK_COUNT) {
        let py = y.map(value);
        if !(0.0..=height).contains(&py) {
            continue;
        }
        push_tick(frame, (-TICK_LENGTH_PX, py), (0.0, py));
        frame.texts.push(TextPrimitive::new(
            format_value(value),
            -TICK_LENGTH_PX - 2.0,
            py,
            LABEL_FONT_PX,
            LABEL_COLOR,
            TextHAlign::Right,
        ));
    }
}

fn project_slot_labels<'a>(
    frame: &mut RenderFrame,
    x: IndexScale,
    labels: impl Iterator<Item = &'a str>,
    viewport: Viewport,
) {
    let width = viewport.width_px();
    let baseline = viewport.height_px() + TICK_LENGTH_PX + LABEL_FONT_PX;
    for (slot, label) in labels.enumerate() {
        let Some(center) = x.slot_center(slot) else {
            break;
        };
        if label.is_empty() || !(0.0..=width).contains(&center) {
            continue;
        }
        frame.texts.push(TextPrimitive::new(
            label,
            center,
            baseline,
            LABEL_FONT_PX,
            LABEL_COLOR,
            TextHAlign::Center,
        ));
    }
}

fn project_year_labels(frame: &mut RenderFrame, y: IndexScale, years: &[i32]) {
    let (range_start, range_end) = y.range();
    let (low, high) = (range_start.min(range_end), range_start.max(range_end));
    for (row, year) in years.iter().enumerate() {
        let Some(center) = y.slot_center(row) else {
            break;
        };
        if !(low..=high).contains(&center) {
            continue;
        }
        frame.texts.push(TextPrimitive::new(
            year.to_string(),
            -TICK_LENGTH_PX,
            center,
            LABEL_FONT_PX,
            LABEL_COLOR,
            TextHAlign::Right,
        ));
    }
}

fn project_category_legend(frame: &mut RenderFrame, palette: &CategoryPalette, viewport: Viewport) {
    let left = viewport.width_px() + LEGEND_OFFSET_PX;
    for (row, category) in palette.categories().enumerate() {
        let Some(color) = palette.color(category) else {
            continue;
        };
        let top = row as f64 * LEGEND_ROW_PX;
        frame.rects.push(RectPrimitive::from_corners(
            left,
            top,
            left + LEGEND_SWATCH_PX,
            top + LEGEND_SWATCH_PX,
            color,
        ));
        if !category.is_empty() {
            frame.texts.push(TextPrimitive::new(
                category,
                left + LEGEND_SWATCH_PX + 6.0,
                top + LEGEND_SWATCH_PX,
                LABEL_FONT_PX,
                LABEL_COLOR,
                TextHAlign::Left,
            ));
        }
    }
}

/// Legend swatches come from the same [`ColorScale`] as the cells, so a
/// swatch and a cell of equal value always share a color.
fn project_color_legend(
    frame: &mut RenderFrame,
    color: ColorScale,
    stops: usize,
    viewport: Viewport,
) {
    let left = viewport.width_px() + LEGEND_OFFSET_PX;
    for (row, (value, fill)) in color.legend_stops(stops).into_iter().enumerate() {
        let top = row as f64 * LEGEND_ROW_PX;
        frame.rects.push(RectPrimitive::from_corners(
            left,
            top,
            left + LEGEND_SWATCH_PX,
            top + LEGEND_SWATCH_PX,
            fill,
        ));
        frame.texts.push(TextPrimitive::new(
            format_value(value),
            left + LEGEND_SWATCH_PX + 6.0,
            top + LEGEND_SWATCH_PX,
            LABEL_FONT_PX,
            LABEL_COLOR,
            TextHAlign::Left,
        ));
    }
}

fn project_tooltip(
    frame: &mut RenderFrame,
    tooltip: &TooltipState,
    view_mode: ViewMode,
    viewport: Viewport,
) {
    if !tooltip.visible {
        return;
    }
    let height = viewport.height_px();
    let guide_x = tooltip.target.as_ref().map_or(tooltip.x, |target| target.x);
    frame.lines.push(LinePrimitive::new(
        guide_x,
        0.0,
        guide_x,
        height,
        AXIS_STROKE_PX,
        GUIDE_COLOR,
    ));

    if let Some(target) = &tooltip.target {
        frame.texts.push(TextPrimitive::new(
            tooltip_label(target, view_mode),
            target.x + TICK_LENGTH_PX,
            target.y - TICK_LENGTH_PX,
            LABEL_FONT_PX,
            LABEL_COLOR,
            TextHAlign::Left,
        ));
    }
}

/// Text shown next to the tooltip guide.
#[must_use]
pub fn tooltip_label(target: &TooltipTarget, view_mode: ViewMode) -> String {
    let value = match view_mode {
        ViewMode::Absolute => format_value(target.value),
        ViewMode::Changes => format!("{}%", format_value(target.value)),
    };
    match target.date {
        Some(date) => format!("{} {}: {value}", target.category, date.format("%Y-%m")),
        None => format!("{}: {value}", target.category),
    }
}

/// Formats a value with at most two decimals and no trailing zeros.
#[must_use]
pub fn format_value(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_owned(),
        other => other.to_owned(),
    }
}

fn push_tick(frame: &mut RenderFrame, from: (f64, f64), to: (f64, f64)) {
    frame.lines.push(LinePrimitive::new(
        from.0,
        from.1,
        to.0,
        to.1,
        AXIS_STROKE_PX,
        AXIS_COLOR,
    ));
}
