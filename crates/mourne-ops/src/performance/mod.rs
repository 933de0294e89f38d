//! Store and manager performance: aggregation, domain scoring, and leaderboards.
//!
//! Every stage is a pure function over a fetched snapshot. [`PerformanceService`] wires
//! the stages to an injected [`MetricSource`] and nothing is cached between calls.

pub mod aggregate;
pub mod domain;
pub mod ingest;
pub mod normalizer;
pub mod ranking;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;
pub mod source;
pub mod window;

#[cfg(test)]
mod tests;

pub use aggregate::{AggregateRow, Aggregator};
pub use domain::{Board, Dimension, MetricRecord, ScoreDomain, UNKNOWN_KEY};
pub use ingest::{CsvImporter, ImportError, RawRecord, RecordSchema};
pub use normalizer::{clamp, normalise_percent01, to_number, Fraction, PercentScale};
pub use ranking::{rank, rank_rows, RankedEntry};
pub use report::PerformanceReport;
pub use router::{performance_router, PerformanceState};
pub use scoring::{ScoreCard, ScoreComponent, ScoreMetric, Scorer, SubScores};
pub use service::{LeaderboardRequest, PerformanceError, PerformanceService, SubmissionError};
pub use source::{MetricQuery, MetricSource, MetricTable, SourceError};
pub use window::{DateRange, DateWindow};
