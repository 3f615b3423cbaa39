//! Series transformations between ingest and rendering.
//!
//! Order of application per request:
//! 1) `patch`: known-bad-data corrections on the aggregated raw series
//! 2) `align`: re-index on the threshold day, keep the cutoff offsets
//! 3) `annotate`: place lockdown dates on the aligned axis

pub mod align;
pub mod annotate;
pub mod patch;

pub use align::*;
pub use annotate::*;
pub use patch::*;
