//! Threshold alignment.
//!
//! Each country's cumulative series is re-indexed so that relative day 0 is
//! the first day its count reached the threshold. The offset removed from the
//! front is kept as the cutoff index; it is needed later to place absolute
//! dates on the relative axis.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{Category, Dataset, RawTable};

/// First index whose value is `>= threshold`.
pub fn cutoff_index(values: &[f64], threshold: f64) -> Option<usize> {
    values.iter().position(|&v| v >= threshold)
}

/// Align every series of `raw` on `threshold`.
///
/// A series that never reaches the threshold keeps cutoff 0 and is returned
/// whole.
pub fn align_table(raw: RawTable, category: Category, threshold: f64) -> Dataset {
    let mut series = BTreeMap::new();
    let mut cutoff = BTreeMap::new();

    for (name, values) in raw.series {
        let (idx, aligned) = match cutoff_index(&values, threshold) {
            Some(idx) => {
                let mut values = values;
                let aligned = values.split_off(idx);
                (idx, aligned)
            }
            None => {
                debug!(country = %name, threshold, "threshold never reached; keeping full series");
                (0, values)
            }
        };
        cutoff.insert(name.clone(), idx);
        series.insert(name, aligned);
    }

    Dataset {
        category,
        threshold,
        reference_start: raw.reference_start,
        latest: raw.latest,
        series,
        cutoff,
    }
}

/// Rebuild the un-aligned series from an aligned one and its discarded prefix.
pub fn unalign(prefix: &[f64], aligned: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(prefix.len() + aligned.len());
    out.extend_from_slice(prefix);
    out.extend_from_slice(aligned);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table(entries: &[(&str, &[f64])]) -> RawTable {
        let days = entries.first().map(|(_, v)| v.len()).unwrap_or(0);
        RawTable {
            reference_start: NaiveDate::from_ymd_opt(2020, 1, 22).unwrap(),
            latest: NaiveDate::from_ymd_opt(2020, 1, 22).unwrap() + chrono::Days::new(days as u64 - 1),
            days,
            series: entries
                .iter()
                .map(|(name, v)| (name.to_string(), v.to_vec()))
                .collect(),
        }
    }

    #[test]
    fn cutoff_is_first_index_reaching_threshold() {
        let raw = table(&[
            ("Italy", &[0.0, 20.0, 99.0, 100.0, 150.0, 400.0]),
            ("Spain", &[5.0, 120.0, 90.0, 130.0, 200.0, 300.0]),
        ]);
        let ds = align_table(raw.clone(), Category::Confirmed, 100.0);

        for (name, values) in &raw.series {
            let idx = ds.cutoff[name];
            assert!(values[..idx].iter().all(|&v| v < 100.0), "{name}: cutoff not minimal");
            assert_eq!(ds.series[name][0], values[idx]);
        }
        assert_eq!(ds.cutoff["Italy"], 3);
        assert_eq!(ds.series["Italy"], vec![100.0, 150.0, 400.0]);
        // Non-monotonic data after the cutoff is kept as is.
        assert_eq!(ds.cutoff["Spain"], 1);
        assert_eq!(ds.series["Spain"], vec![120.0, 90.0, 130.0, 200.0, 300.0]);
    }

    #[test]
    fn aligned_series_reconstructs_raw() {
        let raw = table(&[
            ("France", &[1.0, 7.0, 12.0, 40.0]),
            ("Germany", &[0.0, 0.0, 0.0, 10.0]),
        ]);
        let ds = align_table(raw.clone(), Category::Deaths, 10.0);

        for (name, values) in &raw.series {
            let idx = ds.cutoff[name];
            let rebuilt = unalign(&values[..idx], &ds.series[name]);
            assert_eq!(&rebuilt, values);
            for (i, v) in ds.series[name].iter().enumerate() {
                assert_eq!(values[idx + i], *v);
            }
        }
    }

    #[test]
    fn threshold_never_reached_keeps_full_series() {
        let raw = table(&[("Germany", &[0.0, 1.0, 3.0, 9.0])]);
        let ds = align_table(raw, Category::Deaths, 10.0);
        assert_eq!(ds.cutoff["Germany"], 0);
        assert_eq!(ds.series["Germany"], vec![0.0, 1.0, 3.0, 9.0]);
    }

    #[test]
    fn reached_on_first_day() {
        let ds = align_table(table(&[("US", &[100.0, 200.0])]), Category::Confirmed, 100.0);
        assert_eq!(ds.cutoff["US"], 0);
        assert_eq!(ds.series["US"], vec![100.0, 200.0]);
        assert_eq!(cutoff_index(&[], 1.0), None);
    }

    #[test]
    fn dates_carry_through() {
        let raw = table(&[("US", &[1.0, 2.0, 3.0])]);
        let ds = align_table(raw, Category::Confirmed, 2.0);
        assert_eq!(ds.reference_start, NaiveDate::from_ymd_opt(2020, 1, 22).unwrap());
        assert_eq!(ds.latest, NaiveDate::from_ymd_opt(2020, 1, 24).unwrap());
        assert_eq!(ds.threshold, 2.0);
        assert_eq!(ds.category, Category::Confirmed);
    }
}
