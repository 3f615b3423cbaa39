//! Input/output helpers.
//!
//! - CSV ingest + aggregation (`ingest`)
//! - aligned-series CSV export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
