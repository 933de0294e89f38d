use super::ingest::{RawRecord, RecordSchema};
use super::window::DateRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Upstream tables the engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricTable {
    ShiftMetrics,
    OsaAudits,
}

impl MetricTable {
    pub const fn name(self) -> &'static str {
        match self {
            Self::ShiftMetrics => "shift_metrics",
            Self::OsaAudits => "osa_audits",
        }
    }
}

/// Filter passed to the backing store: a date range, an optional excluded day, an
/// optional store, newest first, optionally capped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricQuery {
    pub range: Option<DateRange>,
    pub exclude_date: Option<NaiveDate>,
    pub store: Option<String>,
    pub limit: Option<usize>,
}

impl MetricQuery {
    pub fn within(range: Option<DateRange>) -> Self {
        Self {
            range,
            ..Self::default()
        }
    }

    pub fn for_store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }

    pub fn excluding(mut self, date: NaiveDate) -> Self {
        self.exclude_date = Some(date);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, schema: &RecordSchema, row: &RawRecord) -> bool {
        let date = schema.date_of(row);
        if let Some(range) = &self.range {
            match date {
                Some(date) if range.contains(date) => {}
                _ => return false,
            }
        }

        if let (Some(excluded), Some(date)) = (self.exclude_date, date) {
            if excluded == date {
                return false;
            }
        }

        match &self.store {
            Some(store) => schema.store_of(row).as_deref() == Some(store.as_str()),
            None => true,
        }
    }

    /// Filters, orders, and caps `rows` the way a backing store is expected to.
    pub fn apply<'a, I>(&self, schema: &RecordSchema, rows: I) -> Vec<RawRecord>
    where
        I: IntoIterator<Item = &'a RawRecord>,
    {
        let mut matched: Vec<RawRecord> = rows
            .into_iter()
            .filter(|row| self.matches(schema, row))
            .cloned()
            .collect();
        matched.sort_by_key(|row| Reverse(schema.date_of(row)));
        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }
}

/// Read/write access to the hosted tables, injected into the service.
pub trait MetricSource: Send + Sync {
    fn query(&self, table: MetricTable, query: &MetricQuery)
        -> Result<Vec<RawRecord>, SourceError>;
    fn insert(&self, table: MetricTable, row: RawRecord) -> Result<(), SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{table} query failed: {reason}")]
    Query { table: &'static str, reason: String },
    #[error("write to {table} rejected: {reason}")]
    Write { table: &'static str, reason: String },
    #[error("metric source unavailable: {0}")]
    Unavailable(String),
}
