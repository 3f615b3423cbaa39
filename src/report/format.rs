//! Formatted terminal output for `covid19 show`.
//!
//! We keep formatting code in one place so:
//! - the alignment code stays clean and testable
//! - output changes are localized (the tests below pin the layout)

use crate::domain::{Dataset, EventMarker};
use crate::series::day_zero;

/// Header block: category, threshold, source date range.
pub fn format_dataset_header(dataset: &Dataset) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== covid19 - {} ===\n", dataset.category.title()));
    out.push_str(&format!(
        "Source: {} .. {}\n",
        dataset.reference_start, dataset.latest
    ));
    out.push_str(&format!(
        "Day 0: first day with >= {} {}\n",
        dataset.threshold,
        dataset.category.unit_label()
    ));
    out
}

/// One row per country in `order` present in the dataset.
pub fn format_dataset_table(dataset: &Dataset, markers: &[EventMarker], order: &[String]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<20} {:>6} {:>10} {:>6} {:>12} {:>9}\n",
            "country", "cutoff", "day0", "days", "latest", "lockdown"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<20} {:-<6} {:-<10} {:-<6} {:-<12} {:-<9}\n",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for name in dataset.countries_in(order) {
        let cutoff = dataset.cutoff.get(name).copied().unwrap_or(0);
        let day0 = day_zero(dataset.reference_start, cutoff)
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let days = dataset.series.get(name).map(Vec::len).unwrap_or(0);
        let latest = dataset.latest_value(name).unwrap_or(0.0);
        let lockdown = markers
            .iter()
            .find(|m| m.country == name)
            .map(|m| format!("{:+.0}", m.position))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(
            format!(
                "{:<20} {:>6} {:>10} {:>6} {:>12.0} {:>9}\n",
                truncate(name, 20),
                cutoff,
                day0,
                days,
                latest,
                lockdown
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
