use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use mourne_ops::performance::{
    Board, CsvImporter, DateWindow, Dimension, ImportError, MetricQuery, MetricSource,
    MetricTable, RawRecord, RecordSchema, SourceError,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local stand-in for the hosted shift and audit tables.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMetricSource {
    tables: Arc<Mutex<HashMap<MetricTable, Vec<RawRecord>>>>,
    schema: RecordSchema,
}

impl InMemoryMetricSource {
    /// Loads whichever exports are given; a missing path leaves that table empty.
    pub(crate) fn from_exports(
        shifts: Option<&Path>,
        audits: Option<&Path>,
    ) -> Result<Self, ImportError> {
        let source = Self::default();
        for (table, path) in [
            (MetricTable::ShiftMetrics, shifts),
            (MetricTable::OsaAudits, audits),
        ] {
            let Some(path) = path else {
                continue;
            };
            let rows = CsvImporter::from_path(path)?;
            info!(table = table.name(), rows = rows.len(), path = %path.display(), "seeded metric table");
            source.load(table, rows);
        }
        Ok(source)
    }

    pub(crate) fn load(&self, table: MetricTable, rows: Vec<RawRecord>) {
        if let Ok(mut guard) = self.tables.lock() {
            guard.entry(table).or_default().extend(rows);
        }
    }

    pub(crate) fn len(&self, table: MetricTable) -> usize {
        self.tables
            .lock()
            .map(|guard| guard.get(&table).map(Vec::len).unwrap_or(0))
            .unwrap_or(0)
    }

    fn guard(
        &self,
        table: MetricTable,
    ) -> Result<MutexGuard<'_, HashMap<MetricTable, Vec<RawRecord>>>, SourceError> {
        self.tables.lock().map_err(|_| SourceError::Query {
            table: table.name(),
            reason: "in-memory table lock poisoned".to_string(),
        })
    }
}

impl MetricSource for InMemoryMetricSource {
    fn query(&self, table: MetricTable, query: &MetricQuery) -> Result<Vec<RawRecord>, SourceError> {
        let guard = self.guard(table)?;
        let rows = guard.get(&table).map(Vec::as_slice).unwrap_or_default();
        Ok(query.apply(&self.schema, rows))
    }

    fn insert(&self, table: MetricTable, row: RawRecord) -> Result<(), SourceError> {
        let mut guard = self.tables.lock().map_err(|_| SourceError::Write {
            table: table.name(),
            reason: "in-memory table lock poisoned".to_string(),
        })?;
        guard.entry(table).or_default().push(row);
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_window(raw: &str) -> Result<DateWindow, String> {
    raw.parse::<DateWindow>().map_err(|err| err.to_string())
}

pub(crate) fn parse_board(raw: &str) -> Result<Board, String> {
    raw.parse::<Board>().map_err(|err| err.to_string())
}

pub(crate) fn parse_dimension(raw: &str) -> Result<Dimension, String> {
    raw.parse::<Dimension>().map_err(|err| err.to_string())
}
