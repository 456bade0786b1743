use imdb_eda::config::Config;
use imdb_eda::error::AnalysisError;
use imdb_eda::pipeline;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AnalysisError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    config.apply_threads();
    let thread_count = polars_core::POOL.current_num_threads();
    tracing::info!(threads = thread_count, data = %config.data_path.display(), "starting analysis");

    pipeline::run(&config)
}
