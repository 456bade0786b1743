//! Chart rendering with the [`plotters`] crate.
//!
//! Each chart is split into a data step (pure, tested) and a drawing step that writes a
//! 1200x800 PNG. Drawing uses the bitmap backend so it runs headless.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rustc_hash::FxHashMap as HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::Thresholds;
use crate::data::{self, Movies};
use crate::grouping;
use crate::stats;

/// Errors that can occur during chart generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

pub const CHART_SIZE: (u32, u32) = (1200, 800);

pub const RATING_DISTRIBUTION: &str = "rating_distribution.png";
pub const RELEASE_YEAR_DISTRIBUTION: &str = "release_year_distribution.png";
pub const TOP_DIRECTORS: &str = "top_directors.png";
pub const MOVIES_PER_DECADE: &str = "movies_per_decade.png";
pub const DECADE_AVG_RATING: &str = "decade_avg_rating.png";
pub const CORRELATION_HEATMAP: &str = "correlation_heatmap.png";

const KDE_POINTS: usize = 200;

/// Histogram plus a density curve scaled onto the count axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub histogram: stats::Histogram,
    pub kde: Vec<(f64, f64)>,
}

pub fn distribution(values: &[f64], bins: usize) -> Option<Distribution> {
    let histogram = stats::histogram(values, bins)?;
    let lo = histogram.edges[0];
    let hi = histogram.edges[histogram.edges.len() - 1];
    let grid = stats::linspace(lo, hi, KDE_POINTS);
    let scale = values.len() as f64 * histogram.bin_width();
    let kde = stats::gaussian_kde(values, &grid)
        .map(|density| {
            grid.iter()
                .zip(density)
                .map(|(x, d)| (*x, d * scale))
                .collect()
        })
        .unwrap_or_default();
    Some(Distribution { histogram, kde })
}

/// Raw movie count per director, most productive first.
pub fn director_counts(movies: &Movies, k: usize) -> Vec<(String, usize)> {
    grouping::value_counts(movies.director.iter().map(|d| d.as_deref()))
        .into_iter()
        .take(k)
        .map(|(name, count)| (name.to_string(), count))
        .collect()
}

/// Movie count per decade, ascending by decade.
pub fn decade_counts(movies: &Movies) -> Vec<(i32, usize)> {
    let mut count_m: HashMap<i32, usize> = HashMap::default();
    for decade in movies.decade.iter().flatten() {
        *count_m.entry(*decade).or_default() += 1;
    }
    let mut counts: Vec<(i32, usize)> = count_m.into_iter().collect();
    counts.sort_unstable_by_key(|(decade, _)| *decade);
    counts
}

/// Mean rating per decade, ascending by decade. Decades without any rating are skipped.
pub fn decade_avg_rating(movies: &Movies) -> Vec<(i32, f64)> {
    let mut rating_m: HashMap<i32, Vec<Option<f64>>> = HashMap::default();
    for (decade, rating) in movies.decade.iter().zip(&movies.imdb_rating) {
        if let Some(decade) = decade {
            rating_m.entry(*decade).or_default().push(*rating);
        }
    }
    let mut avgs: Vec<(i32, f64)> = rating_m
        .into_iter()
        .filter_map(|(decade, ratings)| Some((decade, stats::mean(ratings)?)))
        .collect();
    avgs.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    avgs
}

pub const CORRELATION_COLUMNS: [&str; 5] = [
    data::IMDB_RATING,
    data::RUNTIME,
    data::META_SCORE,
    data::GROSS,
    data::NO_OF_VOTES,
];

pub type CorrelationMatrix = [[Option<f64>; 5]; 5];

/// Pairwise-complete Pearson correlations over [`CORRELATION_COLUMNS`].
pub fn correlation_matrix(movies: &Movies) -> CorrelationMatrix {
    let runtime: Vec<Option<f64>> = movies.runtime.iter().map(|v| v.map(f64::from)).collect();
    let votes: Vec<Option<f64>> = movies.votes.iter().map(|v| v.map(|v| v as f64)).collect();
    let columns: [&[Option<f64>]; 5] = [
        &movies.imdb_rating,
        &runtime,
        &movies.meta_score,
        &movies.gross,
        &votes,
    ];
    let mut matrix = [[None; 5]; 5];
    for i in 0..5 {
        for j in i..5 {
            let r = stats::pearson(columns[i], columns[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

fn present(movies_values: &[Option<f64>]) -> Vec<f64> {
    movies_values.iter().flatten().copied().collect()
}

pub fn render_rating_distribution(movies: &Movies, th: &Thresholds, dir: &Path) -> Result<PathBuf> {
    let values = present(&movies.imdb_rating);
    let dist = distribution(&values, th.histogram_bins)
        .ok_or_else(|| PlotError::InvalidData("no ratings to plot".to_string()))?;
    let path = dir.join(RATING_DISTRIBUTION);
    draw_distribution(&dist, "IMDB Ratings Distribution", "Rating", "Count", &path)?;
    Ok(path)
}

pub fn render_release_year_distribution(
    movies: &Movies,
    th: &Thresholds,
    dir: &Path,
) -> Result<PathBuf> {
    let years: Vec<Option<f64>> = movies
        .released_year
        .iter()
        .map(|v| v.map(f64::from))
        .collect();
    let dist = distribution(&present(&years), th.histogram_bins)
        .ok_or_else(|| PlotError::InvalidData("no release years to plot".to_string()))?;
    let path = dir.join(RELEASE_YEAR_DISTRIBUTION);
    draw_distribution(
        &dist,
        "Released Year Distribution",
        "Release Year",
        "Movie Count",
        &path,
    )?;
    Ok(path)
}

pub fn render_top_directors(movies: &Movies, th: &Thresholds, dir: &Path) -> Result<PathBuf> {
    let counts = director_counts(movies, th.top_k);
    if counts.is_empty() {
        return Err(PlotError::InvalidData("no directors to plot".to_string()));
    }
    let path = dir.join(TOP_DIRECTORS);
    draw_horizontal_bars(
        &counts,
        "Top 10 Directors by Number of Movies",
        "Number of Movies",
        "Director Name",
        &path,
    )?;
    Ok(path)
}

pub fn render_movies_per_decade(movies: &Movies, _: &Thresholds, dir: &Path) -> Result<PathBuf> {
    let points: Vec<(i32, f64)> = decade_counts(movies)
        .into_iter()
        .map(|(decade, count)| (decade, count as f64))
        .collect();
    let path = dir.join(MOVIES_PER_DECADE);
    draw_decade_line(
        &points,
        "Movies Released Per Decade",
        "Movie Count",
        true,
        &path,
    )?;
    Ok(path)
}

pub fn render_decade_avg_rating(movies: &Movies, _: &Thresholds, dir: &Path) -> Result<PathBuf> {
    let points = decade_avg_rating(movies);
    let path = dir.join(DECADE_AVG_RATING);
    draw_decade_line(
        &points,
        "Decade-wise Average IMDB Rating Trend",
        "Average Rating",
        false,
        &path,
    )?;
    Ok(path)
}

pub fn render_correlation_heatmap(movies: &Movies, _: &Thresholds, dir: &Path) -> Result<PathBuf> {
    if movies.is_empty() {
        return Err(PlotError::InvalidData("no rows to correlate".to_string()));
    }
    let matrix = correlation_matrix(movies);
    let path = dir.join(CORRELATION_HEATMAP);
    draw_heatmap(&matrix, &CORRELATION_COLUMNS, "Correlation Between Variables", &path)?;
    Ok(path)
}

fn draw_distribution(
    dist: &Distribution,
    title: &str,
    x_label: &str,
    y_label: &str,
    output_path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let edges = &dist.histogram.edges;
    let x_range = edges[0]..edges[edges.len() - 1];
    let count_max = dist.histogram.counts.iter().copied().max().unwrap_or(0) as f64;
    let kde_max = dist.kde.iter().map(|(_, y)| *y).fold(0.0, f64::max);
    let y_max = count_max.max(kde_max).max(1.0) * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_range, 0.0..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .label_style(("sans-serif", 25))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(dist.histogram.counts.iter().enumerate().map(|(i, count)| {
            Rectangle::new(
                [(edges[i], 0.0), (edges[i + 1], *count as f64)],
                BLUE.mix(0.4).filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    if !dist.kde.is_empty() {
        chart
            .draw_series(LineSeries::new(dist.kde.iter().copied(), BLUE.stroke_width(2)))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

fn draw_horizontal_bars(
    counts: &[(String, usize)],
    title: &str,
    x_label: &str,
    y_label: &str,
    output_path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let n = counts.len() as u32;
    let x_max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0) as u32 + 1;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(320)
        .build_cartesian_2d(0u32..x_max, (0u32..n).into_segmented())
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    // Segment 0 is drawn at the bottom, so the most productive director gets the top one.
    let label = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) if *i < n => counts[(n - 1 - *i) as usize].0.clone(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(counts.len())
        .y_label_formatter(&label)
        .x_desc(x_label)
        .y_desc(y_label)
        .label_style(("sans-serif", 22))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(
            Histogram::horizontal(&chart)
                .style(BLUE.mix(0.7).filled())
                .margin(8)
                .data(
                    counts
                        .iter()
                        .enumerate()
                        .map(|(i, (_, count))| (n - 1 - i as u32, *count as u32)),
                ),
        )
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

fn draw_decade_line(
    points: &[(i32, f64)],
    title: &str,
    y_label: &str,
    from_zero: bool,
    output_path: &Path,
) -> Result<()> {
    if points.is_empty() {
        return Err(PlotError::InvalidData("no decades to plot".to_string()));
    }
    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let x_min = points[0].0 - 5;
    let x_max = points[points.len() - 1].0 + 5;
    let y_lo = points.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
    let y_hi = points.iter().map(|(_, y)| *y).fold(f64::NEG_INFINITY, f64::max);
    let pad = ((y_hi - y_lo) * 0.1).max(0.1);
    let y_range = if from_zero {
        0.0..y_hi + pad
    } else {
        (y_lo - pad)..(y_hi + pad)
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_min..x_max, y_range)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Decade")
        .y_desc(y_label)
        .label_style(("sans-serif", 25))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(
            LineSeries::new(points.iter().copied(), BLUE.stroke_width(2)).point_size(5),
        )
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

fn drawing_error(e: impl std::fmt::Display) -> PlotError {
    PlotError::Drawing(e.to_string())
}

/// Map a coefficient in [-1, 1] onto a blue-white-red scale.
fn diverging_color(r: f64) -> RGBColor {
    let t = r.clamp(-1.0, 1.0);
    let (end, w) = if t >= 0.0 {
        ((180.0, 4.0, 38.0), t)
    } else {
        ((59.0, 76.0, 192.0), -t)
    };
    let mix = |c: f64| (255.0 + (c - 255.0) * w).round() as u8;
    RGBColor(mix(end.0), mix(end.1), mix(end.2))
}

fn draw_heatmap(
    matrix: &CorrelationMatrix,
    labels: &[&str; 5],
    title: &str,
    output_path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;
    let area = root
        .titled(title, ("sans-serif", 40))
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    // Grid placed in pixel space: row labels on the left, column labels underneath.
    let cell = 110;
    let (left, top) = (260, 60);
    let centered = TextStyle::from(("sans-serif", 24).into_font())
        .pos(Pos::new(HPos::Center, VPos::Center));
    let right_aligned = TextStyle::from(("sans-serif", 24).into_font())
        .pos(Pos::new(HPos::Right, VPos::Center));

    for (i, row) in matrix.iter().enumerate() {
        let y0 = top + cell * i as i32;
        for (j, r) in row.iter().enumerate() {
            let x0 = left + cell * j as i32;
            let fill = r.map(diverging_color).unwrap_or(RGBColor(220, 220, 220));
            area.draw(&Rectangle::new(
                [(x0, y0), (x0 + cell, y0 + cell)],
                fill.filled(),
            ))
            .map_err(drawing_error)?;
            area.draw(&Rectangle::new(
                [(x0, y0), (x0 + cell, y0 + cell)],
                WHITE.stroke_width(1),
            ))
            .map_err(drawing_error)?;
            let text = r.map(|r| format!("{r:.2}")).unwrap_or_else(|| "-".to_string());
            area.draw(&Text::new(
                text,
                (x0 + cell / 2, y0 + cell / 2),
                centered.clone(),
            ))
            .map_err(drawing_error)?;
        }
        area.draw(&Text::new(
            labels[i].to_string(),
            (left - 12, y0 + cell / 2),
            right_aligned.clone(),
        ))
        .map_err(drawing_error)?;
    }
    let bottom = top + cell * labels.len() as i32;
    for (j, label) in labels.iter().enumerate() {
        area.draw(&Text::new(
            label.to_string(),
            (left + cell * j as i32 + cell / 2, bottom + 24),
            centered.clone(),
        ))
        .map_err(drawing_error)?;
    }

    // Colour scale from +1 (top) to -1 (bottom).
    let bar_x = left + cell * labels.len() as i32 + 60;
    let bar_h = cell * labels.len() as i32;
    for step in 0..bar_h {
        let r = 1.0 - 2.0 * step as f64 / bar_h as f64;
        area.draw(&Rectangle::new(
            [(bar_x, top + step), (bar_x + 30, top + step + 1)],
            diverging_color(r).filled(),
        ))
        .map_err(drawing_error)?;
    }
    for (r, y) in [(1.0, top), (0.0, top + bar_h / 2), (-1.0, top + bar_h)] {
        area.draw(&Text::new(
            format!("{r:.1}"),
            (bar_x + 40, y),
            TextStyle::from(("sans-serif", 20).into_font())
                .pos(Pos::new(HPos::Left, VPos::Center)),
        ))
        .map_err(drawing_error)?;
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}
