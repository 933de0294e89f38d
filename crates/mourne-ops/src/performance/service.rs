use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::aggregate::Aggregator;
use super::domain::{Board, Dimension, MetricRecord};
use super::ingest::{RawRecord, RecordSchema};
use super::ranking::rank_rows;
use super::report::views::LeaderboardView;
use super::report::{leaderboard_view, PerformanceReport};
use super::source::{MetricQuery, MetricSource, MetricTable, SourceError};
use super::window::DateWindow;

/// Parameters for a single leaderboard.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardRequest {
    pub board: Board,
    #[serde(default = "default_dimension")]
    pub dimension: Dimension,
    #[serde(default)]
    pub window: DateWindow,
    pub today: NaiveDate,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub include_components: bool,
}

fn default_dimension() -> Dimension {
    Dimension::Store
}

/// Composes the injected metric source with the scoring pipeline.
///
/// Holds no computed state: every call fetches a fresh snapshot and recomputes.
pub struct PerformanceService<S> {
    source: Arc<S>,
    schema: RecordSchema,
    stores: Vec<String>,
}

impl<S> PerformanceService<S>
where
    S: MetricSource + 'static,
{
    pub fn new(source: Arc<S>, stores: Vec<String>) -> Self {
        Self {
            source,
            schema: RecordSchema::v1(),
            stores,
        }
    }

    pub fn with_schema(mut self, schema: RecordSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Fetches shift metrics and audits in parallel and maps both onto records.
    ///
    /// Either query failing fails the whole load; there is no partial result.
    pub fn load_records(&self, query: &MetricQuery) -> Result<Vec<MetricRecord>, PerformanceError> {
        let (shifts, audits) = thread::scope(|scope| {
            let shifts = scope.spawn(|| self.fetch(MetricTable::ShiftMetrics, query));
            let audits = scope.spawn(|| self.fetch(MetricTable::OsaAudits, query));
            (joined(shifts.join()), joined(audits.join()))
        });

        let shifts = shifts?;
        let audits = audits?;

        let mut records = self.schema.map_all(&shifts);
        records.extend(self.schema.map_all(&audits));
        Ok(records)
    }

    pub fn leaderboard(
        &self,
        request: &LeaderboardRequest,
    ) -> Result<LeaderboardView, PerformanceError> {
        let range = request.window.resolve(request.today);
        let mut query = MetricQuery::within(range);
        if let Some(store) = &request.store {
            query = query.for_store(store.clone());
        }

        let records = self.load_records(&query)?;
        let rows = Aggregator::new(request.dimension)
            .within(range)
            .aggregate(&records);
        let ranked = rank_rows(request.board, rows);

        debug!(
            board = request.board.label(),
            dimension = request.dimension.label(),
            entries = ranked.len(),
            "leaderboard ranked"
        );

        Ok(leaderboard_view(
            request.board,
            request.dimension,
            &ranked,
            request.include_components,
        ))
    }

    pub fn dashboard(
        &self,
        window: DateWindow,
        today: NaiveDate,
    ) -> Result<PerformanceReport, PerformanceError> {
        let query = MetricQuery::within(window.resolve(today));
        let records = self.load_records(&query)?;
        Ok(PerformanceReport::build(
            &records,
            window,
            today,
            &self.stores,
        ))
    }

    /// Validates a submitted shift or audit row and writes it through the source.
    pub fn submit(
        &self,
        table: MetricTable,
        row: RawRecord,
    ) -> Result<MetricRecord, PerformanceError> {
        let record = match self.validate(table, &row) {
            Ok(record) => record,
            Err(error) => {
                warn!(table = table.name(), %error, "submission rejected");
                return Err(error.into());
            }
        };

        self.source.insert(table, row)?;
        info!(
            table = table.name(),
            store = record.store.as_deref().unwrap_or_default(),
            date = ?record.date,
            "submission stored"
        );
        Ok(record)
    }

    fn validate(&self, table: MetricTable, row: &RawRecord) -> Result<MetricRecord, SubmissionError> {
        let record = self.schema.map(row);

        let store = record.store.as_deref().ok_or(SubmissionError::MissingStore)?;
        if !self.stores.iter().any(|known| known == store) {
            return Err(SubmissionError::UnknownStore(store.to_string()));
        }

        if record.date.is_none() {
            return Err(SubmissionError::MissingDate);
        }

        let has_table_metrics = match table {
            MetricTable::ShiftMetrics => record.has_shift_metrics(),
            MetricTable::OsaAudits => record.has_audit_metrics(),
        };
        if !has_table_metrics {
            return Err(SubmissionError::NoMetrics { table: table.name() });
        }

        Ok(record)
    }

    fn fetch(&self, table: MetricTable, query: &MetricQuery) -> Result<Vec<RawRecord>, SourceError> {
        match self.source.query(table, query) {
            Ok(rows) => {
                info!(table = table.name(), rows = rows.len(), "metric rows fetched");
                Ok(rows)
            }
            Err(error) => {
                warn!(table = table.name(), %error, "metric fetch failed");
                Err(error)
            }
        }
    }
}

fn joined(
    outcome: thread::Result<Result<Vec<RawRecord>, SourceError>>,
) -> Result<Vec<RawRecord>, SourceError> {
    outcome.unwrap_or_else(|_| Err(SourceError::Unavailable("query worker panicked".to_string())))
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission has no store")]
    MissingStore,
    #[error("unknown store '{0}'")]
    UnknownStore(String),
    #[error("submission has no valid date")]
    MissingDate,
    #[error("submission carries no {table} metrics")]
    NoMetrics { table: &'static str },
}

#[derive(Debug, thiserror::Error)]
pub enum PerformanceError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
