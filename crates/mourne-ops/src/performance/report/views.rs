use super::super::domain::{Board, Dimension};
use super::super::scoring::ScoreComponent;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntryView {
    pub position: usize,
    pub key: String,
    pub count: usize,
    pub audits: usize,
    pub sales: f64,
    pub labour_percent: Option<f64>,
    pub food_variance_percent: Option<f64>,
    pub additional_hours: f64,
    pub dot_percent: Option<f64>,
    pub extremes_percent: Option<f64>,
    pub sbr_percent: Option<f64>,
    pub rnl_minutes: Option<f64>,
    pub points_lost: Option<f64>,
    pub stars: Option<f64>,
    pub service_score: Option<f64>,
    pub cost_score: Option<f64>,
    pub osa_score: Option<f64>,
    pub mpi: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ScoreComponent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardView {
    pub board: Board,
    pub board_label: &'static str,
    pub dimension: Dimension,
    pub dimension_label: &'static str,
    pub entries: Vec<LeaderboardEntryView>,
}

impl LeaderboardView {
    pub fn leader(&self) -> Option<&LeaderboardEntryView> {
        self.entries.first()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowView {
    pub window: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    /// Exclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
    pub today: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceInsights {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leaders: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stores_without_data: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_quality: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus_areas: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub window: WindowView,
    pub records: usize,
    pub store_boards: Vec<LeaderboardView>,
    pub manager_board: LeaderboardView,
    pub insights: PerformanceInsights,
}
