//! Static chart configuration.
//!
//! The tracked countries, thresholds, lockdown dates and known-bad-data
//! corrections are fixed tables. They are carried in an explicit
//! [`ChartConfig`] value instead of module-level state so tests (and
//! `--config`) can substitute their own.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Category, Correction};
use crate::error::AppError;

/// Day-zero thresholds per category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub confirmed: f64,
    pub deaths: f64,
}

impl Thresholds {
    pub fn for_category(&self, category: Category) -> f64 {
        match category {
            Category::Confirmed => self.confirmed,
            Category::Deaths => self.deaths,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            confirmed: 100.0,
            deaths: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Countries to chart, in legend order. Must match the source names exactly.
    pub countries: Vec<String>,
    pub thresholds: Thresholds,
    /// Lockdown start date per country.
    pub lockdown_dates: BTreeMap<String, NaiveDate>,
    pub known_corrections: Vec<Correction>,
    /// Daily growth rate of the reference curve (0.33 = 33% per day).
    pub growth_rate: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let countries = ["France", "Italy", "Spain", "Germany", "US", "United Kingdom"]
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut lockdown_dates = BTreeMap::new();
        // Lockdown of the northern regions.
        lockdown_dates.insert("Italy".to_string(), ITALY_LOCKDOWN);
        lockdown_dates.insert("France".to_string(), FRANCE_LOCKDOWN);

        // Indices count days from the first source column (2020-01-22).
        let known_corrections = [
            (47, 30.0),  // 2020-03-09
            (55, 175.0), // 2020-03-17
            (56, 244.0), // 2020-03-18
            (57, 372.0), // 2020-03-19
        ]
        .into_iter()
        .map(|(index, value)| Correction {
            category: Category::Deaths,
            country: "France".to_string(),
            index,
            value,
        })
        .collect();

        Self {
            countries,
            thresholds: Thresholds::default(),
            lockdown_dates,
            known_corrections,
            growth_rate: 0.33,
        }
    }
}

impl ChartConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ChartConfig = serde_json::from_reader(file)
            .map_err(|e| AppError::Config(format!("invalid config file '{}': {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.countries.is_empty() {
            return Err(AppError::Config("`countries` must not be empty".to_string()));
        }
        for category in Category::ALL {
            validate_threshold(self.thresholds.for_category(category))?;
        }
        if !(self.growth_rate.is_finite() && self.growth_rate > -1.0) {
            return Err(AppError::Config(format!(
                "`growth_rate` must be a finite number greater than -1 (got {})",
                self.growth_rate
            )));
        }
        Ok(())
    }

    pub fn threshold(&self, category: Category) -> f64 {
        self.thresholds.for_category(category)
    }
}

/// Thresholds define day zero on a log axis, so they must be positive.
pub fn validate_threshold(threshold: f64) -> Result<(), AppError> {
    if threshold.is_finite() && threshold > 0.0 {
        Ok(())
    } else {
        Err(AppError::Config(format!(
            "threshold must be a positive finite number (got {threshold})"
        )))
    }
}

/// Evaluated at compile time: an invalid literal fails the build.
const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar date"),
    }
}

const ITALY_LOCKDOWN: NaiveDate = ymd(2020, 2, 27);
const FRANCE_LOCKDOWN: NaiveDate = ymd(2020, 3, 17);
