use crate::infra::{parse_board, parse_date, parse_dimension, parse_window, InMemoryMetricSource};
use chrono::{Local, NaiveDate};
use clap::Args;
use mourne_ops::config::AppConfig;
use mourne_ops::error::AppError;
use mourne_ops::performance::report::views::{DashboardView, LeaderboardEntryView, LeaderboardView};
use mourne_ops::performance::{Board, DateWindow, Dimension, LeaderboardRequest, PerformanceService};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Shift metrics CSV export
    #[arg(long)]
    pub(crate) shifts: Option<PathBuf>,
    /// OSA audit CSV export
    #[arg(long)]
    pub(crate) audits: Option<PathBuf>,
    /// wtd, mtd, ytd, all, lastN or YYYY-MM-DD..YYYY-MM-DD (defaults to MPI_DEFAULT_WINDOW)
    #[arg(long, value_parser = parse_window)]
    pub(crate) window: Option<DateWindow>,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print a single board instead of the full dashboard
    #[arg(long, value_parser = parse_board)]
    pub(crate) board: Option<Board>,
    /// Group a single board by store, manager or day
    #[arg(long, value_parser = parse_dimension, default_value = "store")]
    pub(crate) dimension: Dimension,
    /// Show per-metric score components for a single board
    #[arg(long)]
    pub(crate) components: bool,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let ReportArgs {
        shifts,
        audits,
        window,
        today,
        board,
        dimension,
        components,
    } = args;

    if shifts.is_none() && audits.is_none() {
        return Err(AppError::InvalidInput(
            "pass --shifts and/or --audits".to_string(),
        ));
    }

    let source = InMemoryMetricSource::from_exports(shifts.as_deref(), audits.as_deref())?;
    let service = PerformanceService::new(Arc::new(source), config.scoring.stores);
    let window = window.unwrap_or(config.scoring.default_window);
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let lines = match board {
        Some(board) => {
            let view = service.leaderboard(&LeaderboardRequest {
                board,
                dimension,
                window,
                today,
                store: None,
                include_components: components,
            })?;
            let mut lines = vec![format!("{} as of {today} ({window})", view.board_label)];
            lines.extend(leaderboard_lines(&view));
            lines
        }
        None => dashboard_lines(&service.dashboard(window, today)?.summary()),
    };

    for line in lines {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn dashboard_lines(view: &DashboardView) -> Vec<String> {
    let mut lines = vec![format!(
        "Mourne-oids performance: {} as of {} ({} records)",
        view.window.label, view.window.today, view.records
    )];

    for board in view.store_boards.iter().chain(Some(&view.manager_board)) {
        lines.push(String::new());
        lines.push(format!("{} by {}", board.board_label, board.dimension_label));
        lines.extend(leaderboard_lines(board));
    }

    let insights = &view.insights;
    if !insights.leaders.is_empty() {
        lines.push(String::new());
        lines.push("Leaders".to_string());
        lines.extend(insights.leaders.iter().map(|line| format!("- {line}")));
    }
    if !insights.stores_without_data.is_empty() {
        lines.push(format!(
            "\nNo data this window: {}",
            insights.stores_without_data.join(", ")
        ));
    }
    if !insights.focus_areas.is_empty() {
        lines.push(String::new());
        lines.push("Focus areas".to_string());
        lines.extend(insights.focus_areas.iter().map(|line| format!("- {line}")));
    }
    if !insights.data_quality.is_empty() {
        lines.push(String::new());
        lines.push("Data quality".to_string());
        lines.extend(insights.data_quality.iter().map(|line| format!("- {line}")));
    }
    lines
}

pub(crate) fn leaderboard_lines(view: &LeaderboardView) -> Vec<String> {
    if view.entries.is_empty() {
        return vec!["  (no entries)".to_string()];
    }

    let mut lines = Vec::new();
    for entry in &view.entries {
        lines.push(format!(
            "{:>2}. {} | {}",
            entry.position,
            entry.key,
            board_detail(view.board, entry)
        ));
        for component in &entry.components {
            lines.push(format!(
                "      {} {:.2} -> {:.1}",
                component.metric.label(),
                component.input,
                component.score
            ));
        }
    }
    lines
}

fn board_detail(board: Board, entry: &LeaderboardEntryView) -> String {
    if entry.count == 0 {
        return "no data".to_string();
    }

    match board {
        Board::Mpi => format!(
            "MPI {} (service {}, cost {}, OSA {})",
            score(entry.mpi),
            score(entry.service_score),
            score(entry.cost_score),
            score(entry.osa_score)
        ),
        Board::Service => format!(
            "DOT {} | extremes {} | R&L {}",
            percent(entry.dot_percent),
            percent(entry.extremes_percent),
            minutes(entry.rnl_minutes)
        ),
        Board::Cost => format!(
            "labour {} | food variance {} | sales £{:.0}",
            percent(entry.labour_percent),
            percent(entry.food_variance_percent),
            entry.sales
        ),
        Board::Osa => format!(
            "points lost {} | stars {}",
            entry
                .points_lost
                .map(|points| format!("{points:.1}"))
                .unwrap_or_else(|| "-".to_string()),
            entry
                .stars
                .map(|stars| format!("{stars:.1}"))
                .unwrap_or_else(|| "-".to_string())
        ),
    }
}

fn score(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.1}"))
        .unwrap_or_else(|| "-".to_string())
}

fn percent(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.2}%"))
        .unwrap_or_else(|| "-".to_string())
}

fn minutes(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.1}m"))
        .unwrap_or_else(|| "-".to_string())
}
