use serde::{Deserialize, Serialize};

use crate::core::{ColorMode, ColorScheme, RecordFilter};
use crate::error::ChartResult;

/// Whether charts show index values or their month-over-month change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Absolute,
    Changes,
}

impl ViewMode {
    #[must_use]
    pub fn color_mode(self) -> ColorMode {
        match self {
            Self::Absolute => ColorMode::Absolute,
            Self::Changes => ColorMode::Diverging,
        }
    }
}

/// The filter/config surface read on every recompute.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(flatten)]
    pub filter: RecordFilter,
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default)]
    pub color_scheme: ColorScheme,
}

impl FilterSelection {
    #[must_use]
    pub fn new(filter: RecordFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }

    #[must_use]
    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.filter.validate()
    }
}
