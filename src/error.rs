use polars::prelude::PolarsError;
use thiserror::Error;

use crate::charts::PlotError;

/// Errors that terminate an analysis run
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Chart error: {0}")]
    Plot(#[from] PlotError),

    #[error("Failed to write report")]
    Fmt(#[from] std::fmt::Error),
}

pub type Result<T> = core::result::Result<T, AnalysisError>;
