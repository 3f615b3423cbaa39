//! Export aligned series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: one row per (country, aligned day).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Days;

use crate::domain::Dataset;
use crate::error::AppError;

/// Write the aligned series of `dataset` to a CSV file, countries in `order`.
pub fn write_aligned_csv(path: &Path, dataset: &Dataset, order: &[String]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_aligned(file, dataset, order).map_err(|e| AppError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::from(e),
    })
}

fn write_aligned<W: Write>(out: W, dataset: &Dataset, order: &[String]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["country", "cutoff_index", "day", "date", "value"])?;

    for name in dataset.countries_in(order) {
        let cutoff = dataset.cutoff.get(name).copied().unwrap_or(0);
        let values = &dataset.series[name];
        for (day, value) in values.iter().enumerate() {
            let date = dataset
                .reference_start
                .checked_add_days(Days::new((cutoff + day) as u64))
                .map(|d| d.to_string())
                .unwrap_or_default();
            writer.write_record([
                name.to_string(),
                cutoff.to_string(),
                day.to_string(),
                date,
                format!("{value}"),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}
