//! CSV ingest and per-country aggregation.
//!
//! This module turns the CSSE time-series CSV into one cumulative national
//! series per tracked country.
//!
//! Schema:
//! - columns 0..4 are metadata: `Province/State, Country/Region, Lat, Long`
//! - every following header column is a date in `M/D/YY` form
//! - every following row cell is a count for one sub-region (empty = 0)
//!
//! Design goals:
//! - **Single forward pass** over the rows, no buffering of the whole file
//! - **Untracked rows are skipped** before any validation (UTF-8 included)
//!   or allocation
//! - **Strict** for tracked rows: any malformed row aborts the whole read
//! - **Order independent**: sub-region rows are summed, never overwritten

use std::collections::{BTreeMap, HashSet};
use std::io::Read;

use chrono::NaiveDate;
use csv::{ByteRecord, StringRecord};
use tracing::{debug, warn};

use crate::domain::RawTable;
use crate::error::AppError;

/// Number of leading metadata columns before the first date column.
pub const METADATA_COLUMNS: usize = 4;
/// Column holding the country identifier.
pub const COUNTRY_COLUMN: usize = 1;
/// Header date format (`3/17/20`).
pub const HEADER_DATE_FORMAT: &str = "%m/%d/%y";

/// Read the whole CSV and aggregate rows for `countries`.
///
/// The reader is consumed and dropped before returning, whether or not the
/// read succeeded.
pub fn read_table<R: Read>(reader: R, countries: &[String]) -> Result<RawTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::parse(1, format!("could not read CSV header: {e}")))?
        .clone();

    let width = headers.len();
    if width <= METADATA_COLUMNS {
        return Err(AppError::parse(
            1,
            format!("header has {width} columns; expected metadata plus at least one date column"),
        ));
    }
    let days = width - METADATA_COLUMNS;

    let tracked: HashSet<&[u8]> = countries.iter().map(|c| c.as_bytes()).collect();
    let mut series: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut rows_read = 0usize;
    let mut rows_used = 0usize;

    // Rows are read as raw bytes; only tracked rows are decoded as UTF-8.
    let mut record = ByteRecord::new();
    loop {
        let more = reader
            .read_byte_record(&mut record)
            .map_err(|e| AppError::parse(error_line(&e), e.to_string()))?;
        if !more {
            break;
        }
        rows_read += 1;

        let is_tracked = record
            .get(COUNTRY_COLUMN)
            .is_some_and(|name| tracked.contains(name));
        if !is_tracked {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row = StringRecord::from_byte_record(record.clone()).map_err(|e| {
            AppError::parse(line, format!("invalid UTF-8 in tracked row: {}", e.utf8_error()))
        })?;
        let name = &row[COUNTRY_COLUMN];
        if row.len() != width {
            return Err(AppError::parse(
                line,
                format!("row for {name:?} has {} columns; header has {width}", row.len()),
            ));
        }

        let totals = series
            .entry(name.to_string())
            .or_insert_with(|| vec![0.0; days]);
        for (total, cell) in totals.iter_mut().zip(row.iter().skip(METADATA_COLUMNS)) {
            *total += parse_count(cell).map_err(|message| AppError::parse(line, message))?;
        }
        rows_used += 1;
    }

    for name in countries {
        if !series.contains_key(name) {
            warn!(country = %name, "no rows for tracked country in source data");
        }
    }
    debug!(rows_read, rows_used, days, "aggregated source rows");

    let reference_start = parse_header_date(&headers[METADATA_COLUMNS])?;
    let latest = parse_header_date(&headers[width - 1])?;

    Ok(RawTable {
        reference_start,
        latest,
        days,
        series,
    })
}

/// Parse a header date column (`M/D/YY`).
pub fn parse_header_date(raw: &str) -> Result<NaiveDate, AppError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, HEADER_DATE_FORMAT).map_err(|source| AppError::DateFormat {
        value: trimmed.to_string(),
        source,
    })
}

/// Parse one count cell. Empty cells count as zero.
fn parse_count(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let v: f64 = trimmed
        .parse()
        .map_err(|e| format!("could not parse {trimmed:?}: {e}"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("non-finite count {trimmed:?}"))
    }
}

fn error_line(err: &csv::Error) -> u64 {
    err.position().map(|p| p.line()).unwrap_or(0)
}
