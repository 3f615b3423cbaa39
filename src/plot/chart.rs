//! Plotters-powered SVG chart of the aligned series.
//!
//! The chart shows:
//! - one line per country on a log-scale y axis, day 0 = threshold day
//! - one dashed vertical line per event marker, in the country's color
//! - a dashed reference curve `threshold * (1 + growth_rate)^day`
//!
//! Everything is computed by the caller; this module only draws.

use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::domain::{ChartConfig, Dataset, EventMarker};
use crate::error::AppError;

/// Canvas size in pixels (golden-ratio landscape).
pub const WIDTH: u32 = 1294;
pub const HEIGHT: u32 = 800;

/// Soft palette, cycled per country.
const SOFT_COLORS: [RGBColor; 7] = [
    RGBColor(241, 90, 96),
    RGBColor(122, 195, 106),
    RGBColor(90, 155, 212),
    RGBColor(250, 167, 91),
    RGBColor(158, 103, 171),
    RGBColor(206, 112, 88),
    RGBColor(215, 127, 180),
];
const REFERENCE_COLOR: RGBColor = RGBColor(64, 64, 64);

/// Axis bounds for a dataset and its markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Bounds {
    pub fn compute(dataset: &Dataset, markers: &[EventMarker]) -> Self {
        let mut x0 = 0.0_f64;
        let mut x1 = dataset.max_len().max(1) as f64;
        for m in markers.iter().filter(|m| m.position.is_finite()) {
            x0 = x0.min(m.position - 1.0);
            x1 = x1.max(m.position + 1.0);
        }

        let threshold = dataset.threshold;
        let positive = || {
            dataset
                .series
                .values()
                .flatten()
                .copied()
                .filter(|v| v.is_finite() && *v > 0.0)
        };
        let y_min = positive().fold(threshold, f64::min) * 0.8;
        let y_max = positive().fold(threshold, f64::max) * 1.5;

        Self {
            x: [x0, x1],
            y: [y_min, y_max],
        }
    }
}

/// Render the chart as an SVG document.
pub fn render_svg(dataset: &Dataset, markers: &[EventMarker], config: &ChartConfig) -> Result<String, AppError> {
    let bounds = Bounds::compute(dataset, markers);
    let [x0, x1] = bounds.x;
    let [y0, y1] = bounds.y;
    if !(x0 < x1 && y0 > 0.0 && y0 < y1) {
        return Err(AppError::Render(format!("degenerate chart bounds {bounds:?}")));
    }

    let category = dataset.category;
    let title = format!(
        "CoVid-19 - {} - {}",
        category.title(),
        dataset.latest.format("%Y-%m-%d")
    );
    let x_desc = format!(
        "Days from first {} {}",
        dataset.threshold,
        category.unit_label()
    );

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 28))
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 70)
            .set_label_area_size(LabelAreaPosition::Bottom, 50)
            .build_cartesian_2d(x0..x1, (y0..y1).log_scale())
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc(category.title())
            .x_labels(20)
            .x_label_formatter(&|v| format!("{v:.0}"))
            .y_label_formatter(&|v| format!("{v:.0}"))
            .label_style(("sans-serif", 14))
            .draw()
            .map_err(render_err)?;

        let countries: Vec<&str> = dataset.countries_in(&config.countries).collect();

        for (i, name) in countries.iter().enumerate() {
            let style = color_for(i).stroke_width(2);
            let values = &dataset.series[*name];
            // Zeros have no place on a log axis.
            let points = values
                .iter()
                .enumerate()
                .filter(|(_, v)| **v > 0.0)
                .map(|(x, v)| (x as f64, *v));
            let latest = dataset.latest_value(name).unwrap_or(0.0);

            chart
                .draw_series(LineSeries::new(points, style))
                .map_err(render_err)?
                .label(format!("{name} {:>8}", latest as i64))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }

        for marker in markers {
            let Some(i) = countries.iter().position(|c| *c == marker.country) else {
                continue;
            };
            let style = color_for(i).stroke_width(2);
            let line = vec![(marker.position, y0), (marker.position, y1)];
            chart
                .draw_series(DashedLineSeries::new(line, 8, 6, style))
                .map_err(render_err)?
                .label(format!("{} - {}", marker.country, marker.label))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 8, y)], style));
        }

        let growth = 1.0 + config.growth_rate;
        let threshold = dataset.threshold;
        let reference: Vec<(f64, f64)> = (0..=x1.ceil() as usize)
            .map(|x| (x as f64, threshold * growth.powi(x as i32)))
            .take_while(|(_, y)| *y <= y1)
            .collect();
        let style = REFERENCE_COLOR.stroke_width(2);
        chart
            .draw_series(DashedLineSeries::new(reference, 8, 6, style))
            .map_err(render_err)?
            .label(format!("{:.0}% daily growth", config.growth_rate * 100.0))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 8, y)], style));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(("sans-serif", 14))
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    Ok(svg)
}

fn color_for(i: usize) -> RGBColor {
    SOFT_COLORS[i % SOFT_COLORS.len()]
}

fn render_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Render(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use crate::domain::Category;

    fn dataset() -> Dataset {
        let mut series = BTreeMap::new();
        let mut cutoff = BTreeMap::new();
        series.insert("Italy".to_string(), vec![100.0, 150.0, 230.0, 400.0]);
        series.insert("France".to_string(), vec![110.0, 0.0, 190.0]);
        cutoff.insert("Italy".to_string(), 36);
        cutoff.insert("France".to_string(), 38);
        Dataset {
            category: Category::Confirmed,
            threshold: 100.0,
            reference_start: NaiveDate::from_ymd_opt(2020, 1, 22).unwrap(),
            latest: NaiveDate::from_ymd_opt(2020, 3, 2).unwrap(),
            series,
            cutoff,
        }
    }

    fn marker(country: &str, position: f64) -> EventMarker {
        EventMarker {
            country: country.to_string(),
            label: "lockdown".to_string(),
            date: NaiveDate::from_ymd_opt(2020, 2, 27).unwrap(),
            position,
        }
    }

    #[test]
    fn bounds_cover_series_and_markers() {
        let b = Bounds::compute(&dataset(), &[marker("Italy", -3.0), marker("France", 9.0)]);
        assert_eq!(b.x, [-4.0, 10.0]);
        assert!((b.y[0] - 80.0).abs() < 1e-9);
        assert!((b.y[1] - 600.0).abs() < 1e-9);
    }

    #[test]
    fn renders_svg_with_legend_entries() {
        let config = ChartConfig::default();
        let svg = render_svg(&dataset(), &[marker("Italy", 0.0)], &config).unwrap();

        assert!(svg.starts_with("<svg"), "{}", &svg[..svg.len().min(80)]);
        assert!(svg.contains("CoVid-19 - Confirmed - 2020-03-02"));
        assert!(svg.contains("Italy - lockdown"));
        assert!(svg.contains("33% daily growth"));
        assert!(svg.contains("Days from first 100 confirmed cases"));
    }

    #[test]
    fn markers_for_untracked_countries_are_ignored() {
        let config = ChartConfig::default();
        let svg = render_svg(&dataset(), &[marker("Narnia", 2.0)], &config).unwrap();
        assert!(!svg.contains("Narnia"));
    }

    #[test]
    fn renders_empty_dataset() {
        let mut ds = dataset();
        ds.series.clear();
        ds.cutoff.clear();
        let svg = render_svg(&ds, &[], &ChartConfig::default()).unwrap();
        assert!(svg.contains("33% daily growth"));
    }
}
