use super::super::aggregate::{AggregateRow, Aggregator};
use super::super::domain::{Board, Dimension, MetricRecord};
use super::super::ranking::{rank_rows, RankedEntry};
use super::super::window::{DateRange, DateWindow};
use super::views::{DashboardView, LeaderboardEntryView, LeaderboardView, WindowView};
use chrono::NaiveDate;

/// Every board for one window, computed from a single record snapshot.
#[derive(Debug, Clone)]
pub struct PerformanceReport {
    pub window: DateWindow,
    pub today: NaiveDate,
    pub range: Option<DateRange>,
    pub records_in_window: usize,
    pub stores: Vec<String>,
    pub store_boards: Vec<(Board, Vec<RankedEntry>)>,
    pub manager_board: Vec<RankedEntry>,
}

impl PerformanceReport {
    /// `stores` lists the stores expected on every board; any with no rows in the
    /// window still appear, with empty metrics.
    pub fn build(
        records: &[MetricRecord],
        window: DateWindow,
        today: NaiveDate,
        stores: &[String],
    ) -> Self {
        let range = window.resolve(today);
        let by_store = Aggregator::new(Dimension::Store).within(range);
        let by_manager = Aggregator::new(Dimension::Manager).within(range);

        let records_in_window = records
            .iter()
            .filter(|record| by_store.includes(record))
            .count();

        let store_rows = with_expected_keys(by_store.aggregate(records), stores);
        let store_boards = Board::ordered()
            .into_iter()
            .map(|board| (board, rank_rows(board, store_rows.clone())))
            .collect();
        let manager_board = rank_rows(Board::Mpi, by_manager.aggregate(records));

        Self {
            window,
            today,
            range,
            records_in_window,
            stores: stores.to_vec(),
            store_boards,
            manager_board,
        }
    }

    pub fn board(&self, board: Board) -> Option<&[RankedEntry]> {
        self.store_boards
            .iter()
            .find(|(candidate, _)| *candidate == board)
            .map(|(_, entries)| entries.as_slice())
    }

    pub fn window_view(&self) -> WindowView {
        WindowView {
            window: self.window.to_string(),
            label: self.window.label(),
            from: self.range.map(|range| range.from),
            to: self.range.map(|range| range.to),
            today: self.today,
        }
    }

    pub fn summary(&self) -> DashboardView {
        let store_boards = self
            .store_boards
            .iter()
            .map(|(board, entries)| leaderboard_view(*board, Dimension::Store, entries, false))
            .collect();
        let manager_board =
            leaderboard_view(Board::Mpi, Dimension::Manager, &self.manager_board, false);

        DashboardView {
            window: self.window_view(),
            records: self.records_in_window,
            store_boards,
            manager_board,
            insights: super::generate_insights(self),
        }
    }
}

fn with_expected_keys(mut rows: Vec<AggregateRow>, expected: &[String]) -> Vec<AggregateRow> {
    for key in expected {
        if !rows.iter().any(|row| &row.key == key) {
            rows.push(AggregateRow::empty(key.clone()));
        }
    }
    rows
}

pub fn leaderboard_view(
    board: Board,
    dimension: Dimension,
    entries: &[RankedEntry],
    with_components: bool,
) -> LeaderboardView {
    let entries = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| entry_view(index + 1, entry, with_components))
        .collect();

    LeaderboardView {
        board,
        board_label: board.label(),
        dimension,
        dimension_label: dimension.label(),
        entries,
    }
}

fn entry_view(position: usize, entry: &RankedEntry, with_components: bool) -> LeaderboardEntryView {
    let row = &entry.row;
    let scores = &entry.card.scores;
    let points = |value: Option<f64>| value.map(|fraction| fraction * 100.0);

    LeaderboardEntryView {
        position,
        key: row.key.clone(),
        count: row.count,
        audits: row.audits,
        sales: row.sales,
        labour_percent: row.labour_percent,
        food_variance_percent: row.food_variance_percent,
        additional_hours: row.additional_hours,
        dot_percent: points(row.dot),
        extremes_percent: points(row.extremes),
        sbr_percent: points(row.sbr),
        rnl_minutes: row.rnl_minutes,
        points_lost: row.points_lost,
        stars: row.stars,
        service_score: scores.service,
        cost_score: scores.cost,
        osa_score: scores.osa,
        mpi: entry.card.composite,
        components: if with_components {
            entry.card.components.clone()
        } else {
            Vec::new()
        },
    }
}
