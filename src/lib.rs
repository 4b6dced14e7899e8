//! cpi-chart: coordinate mapping and interaction engine for consumer price
//! index charts.
//!
//! Records are filtered and aggregated into a scene (line, bar or calendar
//! heatmap), mapped through scales that follow a pan/zoom transform, and
//! projected into backend-agnostic render frames.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartConfig, ChartController, ChartEvent, FilterSelection};
pub use error::{ChartError, ChartResult};
