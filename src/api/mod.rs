mod chart_config;
mod chart_controller;
mod chart_scene;
mod chart_snapshot;
mod chart_state;
mod filter_selection;
mod projection;
mod tooltip_resolver;

pub use chart_config::{ChartConfig, ChartKind, ZoomAxes};
pub use chart_controller::ChartController;
pub use chart_scene::{ChartScene, HEATMAP_SERIES_NAME, HeatmapCell, SceneData, SceneScales};
pub use chart_snapshot::ChartSnapshot;
pub use chart_state::{ChartEvent, ChartState, StateChange};
pub use filter_selection::{FilterSelection, ViewMode};
pub use projection::{
    NO_DATA_LABEL, ProjectionInput, format_value, project_frame, project_series_path,
    tooltip_label,
};
