//! Text reports for the terminal.

pub mod format;

pub use format::{format_dataset_header, format_dataset_table};
