use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use plotters::prelude::*;
use tracing::{info, warn};
use crate::config::{RenderConfig, TableInput};
use crate::error::RenderError;

/// Metric columns charted for every table, with the title used on the chart
pub const METRICS: [(&str, &str); 5] = [
    ("Total", "Total Misses"),
    ("Capacity", "Capacity Misses"),
    ("Cold", "Cold Misses"),
    ("Miss Rate", "Overall Miss Rate"),
    ("MPKI", "MPKI (Misses Per Kilo Instruction)"),
];

const CHART_SIZE: (u32, u32) = (900, 480);

/// One metric plotted against one configuration column of a table, points in row order
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub title: String,
    pub x_column: String,
    pub y_column: String,
    pub y_title: String,
    pub points: Vec<(f64, f64)>,
}

/// What was drawn and what had to be left out
#[derive(Debug, Default)]
pub struct RenderSummary {
    pub rendered: Vec<PathBuf>,
    pub skipped: Vec<(PathBuf, RenderError)>,
}

/// Builds the chart series of every metric for one table
///
/// Rows are used in file order; nothing is sorted, so a table whose x column isn't monotonic
/// produces a chart that doubles back on itself
///
/// # Arguments
///
/// * `path`: A result table, or any table with the metric columns and `x_column`
/// * `x_column`: The column plotted on the x axis
/// * `prefix`: Prepended to every chart title
///
/// returns: Result<Vec<ChartSeries>, RenderError>, one series per entry of METRICS
pub fn chart_series(path: &Path, x_column: &str, prefix: &str) -> Result<Vec<ChartSeries>, RenderError> {
    if !path.is_file() {
        return Err(RenderError::MissingInputFile(path.to_path_buf()));
    }
    let table_err = |source| RenderError::Table { path: path.to_path_buf(), source };
    let mut reader = csv::Reader::from_path(path).map_err(table_err)?;
    let headers = reader.headers().map_err(table_err)?.clone();
    let column_index = |column: &str| {
        headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| RenderError::MissingColumn { path: path.to_path_buf(), column: column.to_string() })
    };
    let x_index = column_index(x_column)?;
    let y_indices = METRICS
        .iter()
        .map(|(column, _)| column_index(*column))
        .collect::<Result<Vec<_>, _>>()?;

    let mut series: Vec<ChartSeries> = METRICS
        .iter()
        .map(|(column, title)| ChartSeries {
            title: format!("{prefix}: {title} vs. {x_column}"),
            x_column: x_column.to_string(),
            y_column: column.to_string(),
            y_title: title.to_string(),
            points: Vec::new(),
        })
        .collect();

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(table_err)?;
        let number = |index: usize| {
            let value = record.get(index).unwrap_or("").trim();
            value.parse::<f64>().map_err(|_| RenderError::InvalidValue {
                path: path.to_path_buf(),
                row: row + 1,
                column: headers.get(index).unwrap_or("").to_string(),
                value: value.to_string(),
            })
        };
        let x = number(x_index)?;
        for (s, &y_index) in series.iter_mut().zip(&y_indices) {
            s.points.push((x, number(y_index)?));
        }
    }
    Ok(series)
}

/// Draws a series as a standalone SVG line chart with markers
pub fn render_chart(series: &ChartSeries) -> Result<String, RenderError> {
    let x_range = padded_range(series.points.iter().map(|p| p.0));
    let y_range = padded_range(series.points.iter().map(|p| p.1));
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(&series.title, ("sans-serif", 20).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)
            .map_err(chart_err)?;
        chart
            .configure_mesh()
            .x_desc(series.x_column.as_str())
            .y_desc(series.y_title.as_str())
            .draw()
            .map_err(chart_err)?;
        chart
            .draw_series(LineSeries::new(series.points.iter().copied(), &BLUE).point_size(3))
            .map_err(chart_err)?;
        root.present().map_err(chart_err)?;
    }
    Ok(svg)
}

/// Renders every table of the configuration into one HTML document
///
/// Tables that are missing or unreadable are logged and left out. Fails only when no table could
/// be rendered or the document can't be written
pub fn render_document(config: &RenderConfig) -> Result<RenderSummary, RenderError> {
    let mut summary = RenderSummary::default();
    let mut sections = Vec::new();
    for table in &config.tables {
        match render_section(table) {
            Ok(section) => {
                info!(table = %table.path.display(), "rendered charts");
                sections.push(section);
                summary.rendered.push(table.path.clone());
            }
            Err(e) => {
                warn!(table = %table.path.display(), error = %e, "skipping table");
                summary.skipped.push((table.path.clone(), e));
            }
        }
    }
    if sections.is_empty() {
        return Err(RenderError::NothingRendered);
    }
    let document = compose_document(&config.title, &sections);
    fs::write(&config.output, document).map_err(|source| RenderError::Io { path: config.output.clone(), source })?;
    Ok(summary)
}

/// A rendered table: its heading and its charts as SVG markup
#[derive(Debug, Clone)]
pub struct Section {
    pub heading: String,
    pub charts: Vec<String>,
}

fn render_section(table: &TableInput) -> Result<Section, RenderError> {
    let charts = chart_series(&table.path, table.x_axis.column(), &table.title)?
        .iter()
        .map(render_chart)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Section { heading: format!("Analysis for {}", table.title), charts })
}

/// Lays sections out in order under a page title
pub fn compose_document(title: &str, sections: &[Section]) -> String {
    let title = escape_html(title);
    let mut html = format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{title}</title></head><body>\n\
         <h1 style=\"text-align:center;\">{title}</h1>\n"
    );
    for section in sections {
        html.push_str(&format!("<hr><h2>{}</h2>\n", escape_html(&section.heading)));
        for chart in &section.charts {
            html.push_str(&format!("<div class=\"chart\">{chart}</div>\n"));
        }
    }
    html.push_str("</body></html>\n");
    html
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

// Plotters needs a non-empty range on both axes
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let pad = if max > min { (max - min) * 0.05 } else { min.abs().max(1.0) * 0.5 };
    (min - pad)..(max + pad)
}

fn chart_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Chart(e.to_string())
}
