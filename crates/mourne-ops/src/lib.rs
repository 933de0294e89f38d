//! Store performance engine behind the Mourne-oids operations dashboard.
//!
//! Raw shift and audit rows are mapped onto [`performance::MetricRecord`]s, grouped and
//! reduced into aggregates, scored per domain, and ranked into leaderboards.

pub mod config;
pub mod error;
pub mod performance;
pub mod telemetry;
