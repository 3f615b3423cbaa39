//! Chart rendering.

pub mod chart;

pub use chart::{Bounds, render_svg};
