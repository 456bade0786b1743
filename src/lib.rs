pub mod charts;
pub mod config;
pub mod data;
pub mod error;
pub mod extremum;
pub mod grouping;
pub mod pipeline;
pub mod ranking;
pub mod report;
pub mod stats;
