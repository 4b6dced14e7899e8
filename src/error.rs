use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

/// Errors surfaced by the chart core.
///
/// Missing values and degenerate domains are data conditions and never show
/// up here; they are recovered locally (`Option` values, neutral fallbacks).
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
