use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::record::Record;
use crate::error::{ChartError, ChartResult};

/// Food product groups kept by the dataset cleaner.
pub const FOOD_CATEGORIES: [&str; 31] = [
    "Food",
    "Food purchased from stores",
    "Meat",
    "Fresh or frozen meat (excluding poultry)",
    "Fresh or frozen beef",
    "Fresh or frozen pork",
    "Fresh or frozen poultry",
    "Fresh or frozen chicken",
    "Processed meat",
    "Fish, seafood and other marine products",
    "Fish",
    "Dairy products and eggs",
    "Dairy products",
    "Fresh milk",
    "Butter",
    "Cheese",
    "Eggs",
    "Bakery and cereal products (excluding baby food)",
    "Bakery products",
    "Cereal products (excluding baby food)",
    "Fruit, fruit preparations and nuts",
    "Fresh fruit",
    "Preserved fruit and fruit preparations",
    "Vegetables and vegetable preparations",
    "Fresh vegetables",
    "Preserved vegetables and vegetable preparations",
    "Sugar and confectionery",
    "Edible fats and oils",
    "Coffee and tea",
    "Non-alcoholic beverages",
    "Food purchased from restaurants",
];

/// First year kept by the food preset.
pub const FOOD_FIRST_YEAR: i32 = 1970;

/// Record selection. Unset fields match everything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordFilter {
    #[serde(default)]
    pub geography: Option<String>,
    #[serde(default)]
    pub categories: Option<BTreeSet<String>>,
    /// Inclusive `(start, end)` month range.
    #[serde(default)]
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl RecordFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Food categories from 1970 onwards, for one geography.
    #[must_use]
    pub fn food_since_1970(geography: impl Into<String>) -> Self {
        Self {
            geography: Some(geography.into()),
            categories: Some(FOOD_CATEGORIES.iter().map(|name| (*name).to_owned()).collect()),
            date_range: NaiveDate::from_ymd_opt(FOOD_FIRST_YEAR, 1, 1)
                .map(|start| (start, NaiveDate::MAX)),
            year: None,
        }
    }

    #[must_use]
    pub fn with_geography(mut self, geography: impl Into<String>) -> Self {
        self.geography = Some(geography.into());
        self
    }

    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some((start, end));
        self
    }

    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if let Some((start, end)) = self.date_range {
            if start > end {
                return Err(ChartError::InvalidConfig(format!(
                    "filter date range start {start} is after end {end}"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(geography) = &self.geography {
            if record.geography != *geography {
                return false;
            }
        }
        if let Some(categories) = &self.categories {
            if !categories.contains(&record.category) {
                return false;
            }
        }
        if let Some((start, end)) = self.date_range {
            if record.date < start || record.date > end {
                return false;
            }
        }
        self.year.is_none_or(|year| record.date.year() == year)
    }

    pub fn apply<'a>(&'a self, records: &'a [Record]) -> impl Iterator<Item = &'a Record> + 'a {
        records.iter().filter(move |record| self.matches(record))
    }
}
