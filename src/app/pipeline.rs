//! Shared chart pipeline used by the CLI and the HTTP server.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> parse/aggregate -> patch -> align -> annotate -> render
//!
//! Every call starts from scratch: nothing is cached between requests and no
//! state is shared, so concurrent calls are independent.

use tracing::info;

use crate::data::SeriesSource;
use crate::domain::{Category, Chart, ChartConfig, Dataset, EventMarker, validate_threshold};
use crate::error::AppError;
use crate::io::ingest::read_table;
use crate::series::{LOCKDOWN_LABEL, align_table, apply_corrections, event_markers};

/// All computed outputs of a single chart run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub markers: Vec<EventMarker>,
    pub chart: Chart,
}

/// Fetch, parse, patch and align one category.
pub fn build_dataset(
    source: &dyn SeriesSource,
    config: &ChartConfig,
    category: Category,
    threshold: f64,
) -> Result<Dataset, AppError> {
    // 1) Fetch + aggregate. The body stream is dropped when `read_table` returns.
    let body = source.fetch(category)?;
    let mut raw = read_table(body, &config.countries)?;

    // 2) Known-bad-data corrections on the un-aligned series.
    apply_corrections(&mut raw, category, &config.known_corrections);

    // 3) Threshold alignment.
    let dataset = align_table(raw, category, threshold);
    info!(
        %category,
        latest = %dataset.latest.format("%Y-%m-%d"),
        countries = dataset.series.len(),
        "dataset ready"
    );
    Ok(dataset)
}

/// Lockdown markers for the countries present in `dataset`.
pub fn lockdown_markers(dataset: &Dataset, config: &ChartConfig) -> Vec<EventMarker> {
    event_markers(dataset, &config.lockdown_dates, LOCKDOWN_LABEL, &config.countries)
}

/// Execute the full pipeline and return every intermediate output.
///
/// The chart uses a log axis, so `threshold` must be positive; this is
/// checked before anything is fetched.
pub fn run_chart(
    source: &dyn SeriesSource,
    config: &ChartConfig,
    category: Category,
    threshold: f64,
) -> Result<RunOutput, AppError> {
    validate_threshold(threshold)?;
    let dataset = build_dataset(source, config, category, threshold)?;
    let markers = lockdown_markers(&dataset, config);
    let svg = crate::plot::render_svg(&dataset, &markers, config)?;

    let chart = Chart {
        category,
        latest: dataset.latest,
        svg,
    };
    Ok(RunOutput {
        dataset,
        markers,
        chart,
    })
}

/// Generate the chart image for `category` aligned on `threshold`.
pub fn generate_chart(
    source: &dyn SeriesSource,
    config: &ChartConfig,
    category: Category,
    threshold: f64,
) -> Result<Chart, AppError> {
    run_chart(source, config, category, threshold).map(|run| run.chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    use chrono::NaiveDate;

    /// In-memory source serving fixed CSV bodies.
    struct StaticSource {
        confirmed: &'static str,
        deaths: &'static str,
    }

    impl SeriesSource for StaticSource {
        fn fetch(&self, category: Category) -> Result<Box<dyn Read>, AppError> {
            let body = match category {
                Category::Confirmed => self.confirmed,
                Category::Deaths => self.deaths,
            };
            Ok(Box::new(Cursor::new(body.as_bytes())))
        }
    }

    struct FailingSource;

    impl SeriesSource for FailingSource {
        fn fetch(&self, category: Category) -> Result<Box<dyn Read>, AppError> {
            Err(AppError::Fetch {
                category,
                url: "http://example.invalid".to_string(),
                message: "unreachable".to_string(),
            })
        }
    }

    const CONFIRMED: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20,1/25/20
,Italy,41.9,12.6,50,100,200,400
,France,46.2,2.2,10,40,90,120
French Guiana,France,4.0,-53.0,0,1,20,30
,Narnia,0,0,1000,2000,3000,4000
";

    const DEATHS: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20,1/25/20
,Italy,41.9,12.6,1,5,12,20
,France,46.2,2.2,2,9,9,13
";

    fn source() -> StaticSource {
        StaticSource {
            confirmed: CONFIRMED,
            deaths: DEATHS,
        }
    }

    fn config() -> ChartConfig {
        let mut config = ChartConfig::default();
        config.countries = vec!["Italy".to_string(), "France".to_string(), "US".to_string()];
        config.lockdown_dates.clear();
        config.lockdown_dates.insert("Italy".to_string(), NaiveDate::from_ymd_opt(2020, 1, 22).unwrap());
        config.known_corrections.clear();
        config
    }

    #[test]
    fn builds_aligned_dataset() {
        let ds = build_dataset(&source(), &config(), Category::Confirmed, 100.0).unwrap();
        assert_eq!(ds.cutoff["Italy"], 1);
        assert_eq!(ds.series["Italy"], vec![100.0, 200.0, 400.0]);
        // Two French rows summed: [10, 41, 110, 150].
        assert_eq!(ds.cutoff["France"], 2);
        assert_eq!(ds.series["France"], vec![110.0, 150.0]);
        assert!(!ds.series.contains_key("Narnia"));
        assert!(!ds.series.contains_key("US"));
        assert_eq!(ds.reference_start, NaiveDate::from_ymd_opt(2020, 1, 22).unwrap());
        assert_eq!(ds.latest, NaiveDate::from_ymd_opt(2020, 1, 25).unwrap());
    }

    #[test]
    fn corrections_apply_before_alignment() {
        let mut config = config();
        config.known_corrections.push(crate::domain::Correction {
            category: Category::Deaths,
            country: "France".to_string(),
            index: 2,
            value: 30.0,
        });
        let ds = build_dataset(&source(), &config, Category::Deaths, 10.0).unwrap();
        // Raw France deaths become [2, 9, 30, 13]; day 0 moves to index 2.
        assert_eq!(ds.cutoff["France"], 2);
        assert_eq!(ds.series["France"], vec![30.0, 13.0]);
    }

    #[test]
    fn corrections_for_other_category_are_ignored() {
        let mut config = config();
        config.known_corrections.push(crate::domain::Correction {
            category: Category::Confirmed,
            country: "France".to_string(),
            index: 0,
            value: 500.0,
        });
        let ds = build_dataset(&source(), &config, Category::Deaths, 10.0).unwrap();
        assert_eq!(ds.cutoff["France"], 3);
        assert_eq!(ds.series["France"], vec![13.0]);
    }

    #[test]
    fn lockdown_marker_uses_cutoff() {
        let run = run_chart(&source(), &config(), Category::Confirmed, 100.0).unwrap();
        assert_eq!(run.markers.len(), 1);
        assert_eq!(run.markers[0].country, "Italy");
        // Italy day 0 is 2020-01-23, lockdown configured on 2020-01-22.
        assert_eq!(run.markers[0].position, -1.0);
        assert!(run.chart.svg.contains("Italy - lockdown"));
        assert_eq!(run.chart.file_name(), "covid-confirmed.svg");
    }

    #[test]
    fn fetch_error_propagates_unchanged() {
        let err = generate_chart(&FailingSource, &config(), Category::Deaths, 10.0).unwrap_err();
        assert!(matches!(err, AppError::Fetch { category: Category::Deaths, .. }));
    }

    #[test]
    fn default_lockdown_table_marks_every_present_country() {
        let mut config = config();
        config.lockdown_dates = ChartConfig::default().lockdown_dates;
        let run = run_chart(&source(), &config, Category::Confirmed, 100.0).unwrap();
        let positions: Vec<(&str, f64)> = run
            .markers
            .iter()
            .map(|m| (m.country.as_str(), m.position))
            .collect();
        // France day 0 is 2020-01-24, lockdown on 2020-03-17.
        assert_eq!(positions, vec![("Italy", 35.0), ("France", 53.0)]);
    }

    #[test]
    fn invalid_threshold_is_rejected_before_fetch() {
        for threshold in [-5.0, 0.0, f64::NAN] {
            let err = generate_chart(&FailingSource, &config(), Category::Deaths, threshold).unwrap_err();
            assert!(matches!(err, AppError::Config(_)), "{threshold}: {err}");
        }
    }

    #[test]
    fn zero_threshold_dataset_keeps_full_series() {
        let ds = build_dataset(&source(), &config(), Category::Deaths, 0.0).unwrap();
        assert_eq!(ds.cutoff["Italy"], 0);
        assert_eq!(ds.series["Italy"], vec![1.0, 5.0, 12.0, 20.0]);
    }
}
