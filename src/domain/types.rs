//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built fresh for every chart request
//! - handed to the renderer and the text report unchanged
//! - (de)serialized as part of the configuration file

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which published time series to chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Confirmed,
    Deaths,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Confirmed, Category::Deaths];

    /// Lowercase name used in source file names, routes and output files.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Confirmed => "confirmed",
            Category::Deaths => "deaths",
        }
    }

    /// Human-readable label for chart titles.
    pub fn title(self) -> &'static str {
        match self {
            Category::Confirmed => "Confirmed",
            Category::Deaths => "Deaths",
        }
    }

    /// What one unit of the series counts, for axis labels.
    pub fn unit_label(self) -> &'static str {
        match self {
            Category::Confirmed => "confirmed cases",
            Category::Deaths => "deaths",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Aggregated, un-aligned national series straight out of the CSV.
///
/// Index `i` of every series is the count on `reference_start + i` days.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub reference_start: NaiveDate,
    pub latest: NaiveDate,
    /// Number of date columns in the header.
    pub days: usize,
    pub series: BTreeMap<String, Vec<f64>>,
}

/// Per-category dataset after threshold alignment.
///
/// `series[c][i] == raw[c][cutoff[c] + i]` for every tracked country `c`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub category: Category,
    pub threshold: f64,
    /// Date of index 0 of the un-aligned series (first data column).
    pub reference_start: NaiveDate,
    /// Date of the most recent data column.
    pub latest: NaiveDate,
    pub series: BTreeMap<String, Vec<f64>>,
    /// Raw-series index at which each country first reached the threshold.
    pub cutoff: BTreeMap<String, usize>,
}

impl Dataset {
    /// Countries from `order` that are present in the dataset, in that order.
    pub fn countries_in<'a>(&'a self, order: &'a [String]) -> impl Iterator<Item = &'a str> + 'a {
        order
            .iter()
            .map(String::as_str)
            .filter(|name| self.series.contains_key(*name))
    }

    /// Last (most recent) aligned value for a country.
    pub fn latest_value(&self, country: &str) -> Option<f64> {
        self.series.get(country).and_then(|s| s.last().copied())
    }

    /// Longest aligned series length (x extent of the chart).
    pub fn max_len(&self) -> usize {
        self.series.values().map(Vec::len).max().unwrap_or(0)
    }
}

/// A manual override for a known-bad source value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub category: Category,
    pub country: String,
    /// Index into the un-aligned series (days since the first data column).
    pub index: usize,
    pub value: f64,
}

/// A real-world event placed on a country's aligned day axis.
#[derive(Debug, Clone, PartialEq)]
pub struct EventMarker {
    pub country: String,
    pub label: String,
    pub date: NaiveDate,
    /// Days relative to the country's day zero; negative means before it.
    pub position: f64,
}

/// A rendered chart for one category.
#[derive(Debug, Clone)]
pub struct Chart {
    pub category: Category,
    pub latest: NaiveDate,
    pub svg: String,
}

impl Chart {
    pub const CONTENT_TYPE: &'static str = "image/svg+xml";

    /// Default file name when the chart is saved to disk.
    pub fn file_name(&self) -> String {
        format!("covid-{}.svg", self.category.slug())
    }
}
