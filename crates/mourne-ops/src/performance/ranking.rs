use super::aggregate::AggregateRow;
use super::domain::Board;
use super::scoring::{ScoreCard, Scorer};
use serde::Serialize;
use std::cmp::Ordering;

/// An aggregate with its scores, ready to be placed on a leaderboard.
///
/// Position is implied by index in the ranked vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub row: AggregateRow,
    pub card: ScoreCard,
}

impl RankedEntry {
    pub fn new(row: AggregateRow) -> Self {
        let card = Scorer::score(&row);
        Self { row, card }
    }

    pub fn key(&self) -> &str {
        &self.row.key
    }

    pub fn composite(&self) -> Option<f64> {
        self.card.composite
    }
}

/// Scores every row and sorts the result for `board`.
pub fn rank_rows(board: Board, rows: Vec<AggregateRow>) -> Vec<RankedEntry> {
    rank(board, rows.into_iter().map(RankedEntry::new).collect())
}

pub fn rank(board: Board, mut entries: Vec<RankedEntry>) -> Vec<RankedEntry> {
    entries.sort_by(|left, right| compare(board, left, right));
    entries
}

/// Total order for `board`. Missing sort keys go after present ones; the grouping key
/// settles anything still tied.
pub fn compare(board: Board, left: &RankedEntry, right: &RankedEntry) -> Ordering {
    let (l, r) = (&left.row, &right.row);
    let ordering = match board {
        Board::Osa => ascending(l.points_lost, r.points_lost)
            .then_with(|| descending(l.stars, r.stars))
            .then_with(|| r.audits.cmp(&l.audits)),
        Board::Cost => ascending(l.labour_percent, r.labour_percent)
            .then_with(|| ascending(l.food_variance_percent, r.food_variance_percent))
            .then_with(|| r.sales.total_cmp(&l.sales)),
        Board::Service => descending(l.dot, r.dot)
            .then_with(|| ascending(l.labour_percent, r.labour_percent)),
        Board::Mpi => descending(left.composite(), right.composite())
            .then_with(|| r.count.cmp(&l.count)),
    };

    ordering.then_with(|| l.key.cmp(&r.key))
}

fn ascending(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => l.total_cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn descending(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => r.total_cmp(&l),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
