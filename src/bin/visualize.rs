//! Exploratory plots from the raw accident statistics.
//!
//! Reads the headerless per-city spreadsheet export, renders the
//! distribution of total accidents per year and a boxplot of the 2015
//! severity, and prints the cities whose severity exceeds the 25th
//! percentile.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::prelude::*;

use routesafe::dataset::{load_raw_records, quantile, RawRecord, RAW_COLUMNS};

const HISTOGRAM_BINS: usize = 20;

fn main() -> Result<()> {
    let data_path: PathBuf = env::args()
        .nth(1)
        .unwrap_or_else(|| "road_accidents.csv".to_string())
        .into();

    let records = load_raw_records(&data_path)
        .with_context(|| format!("cannot load statistics from {}", data_path.display()))?;

    let yearly = yearly_accident_series(&records);
    plot_accident_trends(&yearly, Path::new("accident_trends.png"))?;
    println!("Accident trends saved as 'accident_trends.png'.");

    let severities: Vec<f64> = records
        .iter()
        .map(|r| r.column("Severity - 2015").unwrap_or(0.0))
        .collect();
    plot_severity_distribution(&severities, Path::new("severity_distribution.png"))?;
    println!("Severity distribution saved as 'severity_distribution.png'.");

    print_high_severity_cities(&records, &severities);

    Ok(())
}

/// Per-year "Total Accidents" series for every year column the file
/// actually carries. Non-numeric cells count as 0.
fn yearly_accident_series(records: &[RawRecord]) -> Vec<(String, Vec<f64>)> {
    (2011..=2015)
        .filter_map(|year| {
            let column = format!("Total Accidents - {year}");
            if !RAW_COLUMNS.contains(&column.as_str()) {
                return None;
            }
            let values = records
                .iter()
                .map(|r| r.column(&column).unwrap_or(0.0))
                .collect();
            Some((year.to_string(), values))
        })
        .collect()
}

fn plot_accident_trends(series: &[(String, Vec<f64>)], path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_value = series
        .iter()
        .flat_map(|(_, values)| values)
        .copied()
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let bin_width = max_value / HISTOGRAM_BINS as f64;

    let binned: Vec<(String, Vec<u32>)> = series
        .iter()
        .map(|(year, values)| {
            let mut counts = vec![0u32; HISTOGRAM_BINS];
            for &value in values {
                let bin = ((value / bin_width) as usize).min(HISTOGRAM_BINS - 1);
                counts[bin] += 1;
            }
            (year.clone(), counts)
        })
        .collect();
    let max_count = binned
        .iter()
        .flat_map(|(_, counts)| counts)
        .copied()
        .max()
        .unwrap_or(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Total Accidents Distribution Across Cities (2011-2015)",
            ("sans-serif", 28),
        )
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..max_value, 0u32..max_count + 1)?;
    chart
        .configure_mesh()
        .x_desc("Number of Accidents")
        .y_desc("Frequency")
        .draw()?;

    for (index, (year, counts)) in binned.iter().enumerate() {
        let color = Palette99::pick(index);
        chart
            .draw_series(counts.iter().enumerate().map(|(bin, &count)| {
                let x0 = bin as f64 * bin_width;
                Rectangle::new([(x0, 0), (x0 + bin_width, count)], color.mix(0.45).filled())
            }))?
            .label(year.clone())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], Palette99::pick(index).filled())
            });
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;
    root.present()?;
    Ok(())
}

fn plot_severity_distribution(values: &[f64], path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let quartiles = Quartiles::new(values);
    let upper = values.iter().copied().fold(0.0_f64, f64::max).max(1.0) as f32 * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Severity Distribution (2015)", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f32..2f32, 0f32..upper)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .y_desc("Severity - 2015")
        .draw()?;

    chart.draw_series(vec![Boxplot::new_vertical(1f32, &quartiles).width(60)])?;

    root.present()?;
    Ok(())
}

fn print_high_severity_cities(records: &[RawRecord], severities: &[f64]) {
    let Some(threshold) = quantile(severities, 0.25) else {
        println!("No severity data available.");
        return;
    };

    println!("High-Severity Cities (2015), above the 25th percentile ({threshold:.2}):");
    for (record, &severity) in records.iter().zip(severities) {
        if severity > threshold {
            println!("  {}: {:.2}", record.city, severity);
        }
    }
}
