use super::super::domain::{Board, UNKNOWN_KEY};
use super::summary::PerformanceReport;
use super::views::PerformanceInsights;

pub(crate) fn generate_insights(report: &PerformanceReport) -> PerformanceInsights {
    let mut leaders = Vec::new();
    for (board, entries) in &report.store_boards {
        let leader = entries
            .iter()
            .filter(|entry| entry.key() != UNKNOWN_KEY)
            .find(|entry| entry.row.count > 0);
        if let Some(entry) = leader {
            let detail = match board {
                Board::Mpi => entry
                    .composite()
                    .map(|score| format!("MPI {score:.1}"))
                    .unwrap_or_else(|| "no MPI".to_string()),
                Board::Service => entry
                    .row
                    .dot
                    .map(|dot| format!("DOT {:.1}%", dot * 100.0))
                    .unwrap_or_else(|| "no DOT data".to_string()),
                Board::Cost => entry
                    .row
                    .labour_percent
                    .map(|labour| format!("labour {labour:.1}%"))
                    .unwrap_or_else(|| "no labour data".to_string()),
                Board::Osa => entry
                    .row
                    .points_lost
                    .map(|points| format!("{points:.1} points lost"))
                    .unwrap_or_else(|| "no audit data".to_string()),
            };
            leaders.push(format!("{} leads {} ({detail})", entry.key(), board.label()));
        }
    }

    let stores_without_data: Vec<String> = report
        .board(Board::Mpi)
        .unwrap_or_default()
        .iter()
        .filter(|entry| entry.row.count == 0)
        .map(|entry| entry.key().to_string())
        .collect();

    let mut data_quality = Vec::new();
    let unknown_stores = report
        .board(Board::Mpi)
        .unwrap_or_default()
        .iter()
        .find(|entry| entry.key() == UNKNOWN_KEY)
        .map(|entry| entry.row.count)
        .unwrap_or(0);
    if unknown_stores > 0 {
        data_quality.push(format!(
            "{unknown_stores} record{} missing a store name",
            if unknown_stores == 1 { "" } else { "s" }
        ));
    }

    let unknown_managers = report
        .manager_board
        .iter()
        .find(|entry| entry.key() == UNKNOWN_KEY)
        .map(|entry| entry.row.count)
        .unwrap_or(0);
    if unknown_managers > 0 {
        data_quality.push(format!(
            "{unknown_managers} record{} missing a manager name",
            if unknown_managers == 1 { "" } else { "s" }
        ));
    }

    let mut focus_areas = Vec::new();
    for entry in report.board(Board::Mpi).unwrap_or_default() {
        if entry.key() == UNKNOWN_KEY {
            continue;
        }
        if let Some((domain, score)) = entry.card.scores.weakest() {
            if score < 50.0 {
                focus_areas.push(format!(
                    "{}: {} scoring {score:.0}",
                    entry.key(),
                    domain.label()
                ));
            }
        }
    }

    PerformanceInsights {
        leaders,
        stores_without_data,
        data_quality,
        focus_areas,
    }
}
