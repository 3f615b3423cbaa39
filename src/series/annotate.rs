//! Place absolute-date events on the aligned day axis.
//!
//! A country's aligned day 0 is `reference_start + cutoff` days, so an event
//! on date `d` sits at `d - (reference_start + cutoff)` days. Events before
//! day zero get negative positions.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use crate::domain::{Dataset, EventMarker};

pub const LOCKDOWN_LABEL: &str = "lockdown";

/// Calendar date of aligned day 0.
pub fn day_zero(reference_start: NaiveDate, cutoff: usize) -> Option<NaiveDate> {
    reference_start.checked_add_days(Days::new(cutoff as u64))
}

/// Position of `event` on the aligned axis, in days.
pub fn event_position(reference_start: NaiveDate, cutoff: usize, event: NaiveDate) -> f64 {
    let since_start = (event - reference_start).num_days();
    (since_start - cutoff as i64) as f64
}

/// One marker per country present in both `events` and `dataset`, in `order`.
pub fn event_markers(
    dataset: &Dataset,
    events: &BTreeMap<String, NaiveDate>,
    label: &str,
    order: &[String],
) -> Vec<EventMarker> {
    dataset
        .countries_in(order)
        .filter_map(|name| {
            let date = *events.get(name)?;
            let cutoff = *dataset.cutoff.get(name)?;
            Some(EventMarker {
                country: name.to_string(),
                label: label.to_string(),
                date,
                position: event_position(dataset.reference_start, cutoff, date),
            })
        })
        .collect()
}
