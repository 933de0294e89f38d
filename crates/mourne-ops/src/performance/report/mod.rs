mod insights;
mod summary;
pub mod views;

pub use summary::{leaderboard_view, PerformanceReport};

pub(crate) use insights::generate_insights;
