//! `covid19-curves` library crate.
//!
//! The binary (`covid19`) is a thin wrapper around this library so that:
//!
//! - the alignment pipeline is testable without network or processes
//! - the HTTP frontend and the CLI share one `generate_chart` entry point
//! - tables (countries, thresholds, lockdowns, corrections) are plain config

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod series;
pub mod server;
