//! Run configuration.
//!
//! There are no command-line flags. Paths default to the conventional locations and may be
//! overridden through environment variables.

use std::env;
use std::path::PathBuf;

pub const DATA_ENV: &str = "IMDB_EDA_DATA";
pub const CHART_DIR_ENV: &str = "IMDB_EDA_CHART_DIR";
pub const THREADS_ENV: &str = "IMDB_EDA_THREADS";

#[derive(Debug, Clone)]
pub struct Config {
    /// CSV file to analyse.
    pub data_path: PathBuf,
    /// Directory the PNG charts are written into.
    pub chart_dir: PathBuf,
    /// Exported as `POLARS_MAX_THREADS` before the polars pool starts.
    pub threads: usize,
    pub thresholds: Thresholds,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from("data.csv"),
            chart_dir: PathBuf::from("charts"),
            threads: 1,
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(path) = lookup(DATA_ENV).filter(|s| !s.is_empty()) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(CHART_DIR_ENV).filter(|s| !s.is_empty()) {
            config.chart_dir = PathBuf::from(dir);
        }
        // A malformed thread count keeps the default.
        if let Some(threads) = lookup(THREADS_ENV).and_then(|s| s.trim().parse().ok()) {
            if threads > 0 {
                config.threads = threads;
            }
        }
        config
    }

    /// Pin the polars pool size. Must run before anything touches `polars_core::POOL`.
    pub fn apply_threads(&self) {
        unsafe {
            env::set_var("POLARS_MAX_THREADS", self.threads.to_string());
        }
    }
}

/// Limits and cutoffs used by the report and chart steps.
#[derive(Debug, Clone)]
pub struct Thresholds {
    pub top_k: usize,
    pub year_cutoff: i32,
    pub director_min_movies: usize,
    pub actor_min_movies: usize,
    pub year_view_k: usize,
    pub histogram_bins: usize,
    pub featured_director: String,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            top_k: 10,
            year_cutoff: 2000,
            director_min_movies: 3,
            actor_min_movies: 5,
            year_view_k: 5,
            histogram_bins: 20,
            featured_director: "Christopher Nolan".to_string(),
        }
    }
}

#[cfg(test)]
mod test_config {
    use super::*;
    use rustc_hash::FxHashMap as HashMap;

    #[test]
    fn defaults_follow_convention() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.data_path, PathBuf::from("data.csv"));
        assert_eq!(config.chart_dir, PathBuf::from("charts"));
        assert_eq!(config.threads, 1);
        assert_eq!(config.thresholds.top_k, 10);
        assert_eq!(config.thresholds.featured_director, "Christopher Nolan");
    }

    #[test]
    fn environment_overrides() {
        let vars: HashMap<&str, &str> = [
            (DATA_ENV, "movies/imdb_top_1000.csv"),
            (CHART_DIR_ENV, "out"),
            (THREADS_ENV, "4"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.data_path, PathBuf::from("movies/imdb_top_1000.csv"));
        assert_eq!(config.chart_dir, PathBuf::from("out"));
        assert_eq!(config.threads, 4);
    }

    #[test]
    fn bad_thread_count_keeps_default() {
        let config = Config::from_lookup(|k| (k == THREADS_ENV).then(|| "many".to_string()));
        assert_eq!(config.threads, 1);
        let config = Config::from_lookup(|k| (k == THREADS_ENV).then(|| "0".to_string()));
        assert_eq!(config.threads, 1);
    }
}
