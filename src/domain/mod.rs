//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the closed set of series categories (`Category`)
//! - raw and aligned tables (`RawTable`, `Dataset`)
//! - static chart configuration (`ChartConfig`, `Correction`, `Thresholds`)
//! - render inputs/outputs (`EventMarker`, `Chart`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
