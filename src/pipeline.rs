//! The ordered list of analysis steps and the driver that runs them.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::charts::{self, PlotError};
use crate::config::{Config, Thresholds};
use crate::data::{MovieData, Movies};
use crate::error::Result;
use crate::{extremum, grouping, ranking, report};

pub type ReportFn = fn(&Movies, &Thresholds, &mut String) -> Result<()>;
pub type ChartFn = fn(&Movies, &Thresholds, &Path) -> core::result::Result<PathBuf, PlotError>;

pub struct ReportStep {
    /// Section title; `{director}` is filled from `Thresholds::featured_director`.
    pub title: &'static str,
    pub run: ReportFn,
}

impl ReportStep {
    pub fn heading(&self, th: &Thresholds) -> String {
        self.title.replace("{director}", &th.featured_director)
    }
}

pub struct ChartStep {
    pub name: &'static str,
    pub run: ChartFn,
}

pub const REPORT_STEPS: [ReportStep; 15] = [
    ReportStep {
        title: "Oldest and Newest Movie",
        run: extremum::report_oldest_newest,
    },
    ReportStep {
        title: "Top 10 Highest Rated Movies",
        run: ranking::report_top_rated,
    },
    ReportStep {
        title: "Top 10 Most Voted Movies",
        run: ranking::report_most_voted,
    },
    ReportStep {
        title: "Highest Rated Movies After 2000",
        run: ranking::report_top_rated_after,
    },
    ReportStep {
        title: "Shortest and Longest Runtime Movies",
        run: extremum::report_shortest_longest,
    },
    ReportStep {
        title: "Movies Directed By {director}",
        run: ranking::report_filmography,
    },
    ReportStep {
        title: "Directors With Highest Avg Rating (Min 3 Movies)",
        run: grouping::report_director_stats,
    },
    ReportStep {
        title: "Top 10 Highest Grossing Movies",
        run: ranking::report_top_grossing,
    },
    ReportStep {
        title: "Genre Wise Average Rating & Movie Count",
        run: grouping::report_genre_stats,
    },
    ReportStep {
        title: "Top Actors By Number of Movies",
        run: grouping::report_actor_counts,
    },
    ReportStep {
        title: "Rating & Movie Count By Certificate Category",
        run: grouping::report_certificate_stats,
    },
    ReportStep {
        title: "Top Actors With Highest Avg Rating (Min 5 Movies)",
        run: grouping::report_actor_stats,
    },
    ReportStep {
        title: "Year Wise Movie Count & Avg Rating",
        run: grouping::report_year_stats,
    },
    ReportStep {
        title: "Top 10 Highly Rated But Low Gross",
        run: ranking::report_high_rating_low_gross,
    },
    ReportStep {
        title: "Top 10 Low Rated But High Gross",
        run: ranking::report_low_rating_high_gross,
    },
];

pub const CHART_STEPS: [ChartStep; 6] = [
    ChartStep {
        name: "rating distribution",
        run: charts::render_rating_distribution,
    },
    ChartStep {
        name: "release year distribution",
        run: charts::render_release_year_distribution,
    },
    ChartStep {
        name: "top directors",
        run: charts::render_top_directors,
    },
    ChartStep {
        name: "movies per decade",
        run: charts::render_movies_per_decade,
    },
    ChartStep {
        name: "decade average rating",
        run: charts::render_decade_avg_rating,
    },
    ChartStep {
        name: "correlation heatmap",
        run: charts::render_correlation_heatmap,
    },
];

/// Run every report step in order, appending each labeled section to `out`.
pub fn run_reports(movies: &Movies, th: &Thresholds, out: &mut String) -> Result<()> {
    for step in &REPORT_STEPS {
        let start = Instant::now();
        let heading = step.heading(th);
        report::section(out, &heading)?;
        (step.run)(movies, th, out)?;
        tracing::debug!(step = %heading, elapsed = ?start.elapsed(), "report step finished");
    }
    Ok(())
}

/// Render every chart into `dir`, returning the written paths in step order.
pub fn run_charts(movies: &Movies, th: &Thresholds, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(CHART_STEPS.len());
    for step in &CHART_STEPS {
        let start = Instant::now();
        let path = (step.run)(movies, th, dir)?;
        tracing::debug!(chart = step.name, elapsed = ?start.elapsed(), "chart step finished");
        tracing::info!(chart = step.name, path = %path.display(), "chart written");
        written.push(path);
    }
    Ok(written)
}

/// Load, normalize, print every report to stdout, then render the charts.
pub fn run(config: &Config) -> Result<()> {
    let data = MovieData::open(&config.data_path)?;
    tracing::info!(
        rows = data.movies.len(),
        steps = REPORT_STEPS.len(),
        "running report steps"
    );

    let mut out = String::new();
    run_reports(&data.movies, &config.thresholds, &mut out)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(out.as_bytes())?;
    stdout.flush()?;

    let written = run_charts(&data.movies, &config.thresholds, &config.chart_dir)?;
    tracing::info!(charts = written.len(), "analysis finished");
    Ok(())
}

#[cfg(test)]
mod test_pipeline {
    use super::*;
    use crate::data::fixtures::sample;

    #[test]
    fn test_sections_in_order() -> Result<()> {
        let movies = sample()?;
        let th = Thresholds::default();
        let mut out = String::new();
        run_reports(&movies, &th, &mut out)?;

        let mut last = 0;
        for step in &REPORT_STEPS {
            let header = format!("----- {} -----", step.heading(&th));
            let at = out[last..]
                .find(&header)
                .map(|i| i + last)
                .unwrap_or_else(|| panic!("missing section {}", step.title));
            last = at + header.len();
        }
        Ok(())
    }

    #[test]
    fn test_reports_on_empty_table() -> Result<()> {
        let movies = crate::data::fixtures::movies_from("")?;
        let mut out = String::new();
        run_reports(&movies, &Thresholds::default(), &mut out)?;
        assert!(out.contains(report::NO_ROWS));
        Ok(())
    }

    #[test]
    fn test_filmography_heading_follows_director() -> Result<()> {
        let movies = sample()?;
        let th = Thresholds {
            featured_director: "Frank Darabont".to_string(),
            ..Thresholds::default()
        };
        let mut out = String::new();
        run_reports(&movies, &th, &mut out)?;

        let section = out
            .split("----- Movies Directed By Frank Darabont -----\n")
            .nth(1)
            .expect("filmography section");
        let section = &section[..section.find("\n----- ").unwrap_or(section.len())];
        assert!(section.contains("The Shawshank Redemption"));
        assert!(!section.contains("Inception"));
        assert!(!out.contains("Movies Directed By Christopher Nolan"));
        Ok(())
    }

    #[test]
    fn test_step_titles_are_unique() {
        let mut titles: Vec<&str> = REPORT_STEPS.iter().map(|s| s.title).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), REPORT_STEPS.len());
    }
}
