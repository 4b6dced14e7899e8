pub mod aggregate;
pub mod band_scale;
pub mod color;
pub mod filter;
pub mod primitives;
pub mod record;
pub mod scale;
pub mod series;
pub mod time_scale;
pub mod types;
pub mod zoom;

pub use aggregate::{
    CategoryMean, ChangePoint, change_series, group_series, mean_by_category, month_over_month,
};
pub use band_scale::{DEFAULT_BAND_PADDING, IndexScale};
pub use color::{
    CategoryPalette, Color, ColorDomain, ColorMode, ColorScale, ColorScheme,
    DEFAULT_BUFFER_FACTOR, DomainKind, NO_DATA_COLOR,
};
pub use filter::{FOOD_CATEGORIES, RecordFilter};
pub use record::{RawRecord, Record, parse_records};
pub use scale::{ContinuousScale, DEFAULT_TICK_COUNT, LinearScale};
pub use series::{DuplicatePolicy, EdgePolicy, NearestSample, Series, SeriesIndex, SeriesPoint};
pub use time_scale::TimeScale;
pub use types::{DataPoint, Viewport};
pub use zoom::{TranslateBounds, WheelDeltaMode, ZoomBehavior, ZoomTransform, wheel_factor};
