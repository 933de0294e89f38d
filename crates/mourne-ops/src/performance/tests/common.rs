use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::performance::ingest::{RawRecord, RecordSchema};
use crate::performance::normalizer::Fraction;
use crate::performance::source::{MetricQuery, MetricSource, MetricTable, SourceError};
use crate::performance::{
    performance_router, DateWindow, MetricRecord, PerformanceService, PerformanceState,
};

pub(super) fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).expect("valid date")
}

pub(super) fn stores() -> Vec<String> {
    ["Downpatrick", "Kilkeel", "Newcastle", "Ballynahinch"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub(super) fn shift(store: &str, d: u32, sales: f64, labour: f64) -> MetricRecord {
    MetricRecord {
        sales: Some(sales),
        labour_cost: Some(labour),
        ..MetricRecord::new(store, day(d))
    }
}

pub(super) fn service_shift(store: &str, d: u32, dot: f64, extremes: f64, rnl: f64) -> MetricRecord {
    MetricRecord {
        dot: Some(Fraction(dot)),
        extremes: Some(Fraction(extremes)),
        rnl_minutes: Some(rnl),
        ..MetricRecord::new(store, day(d))
    }
}

pub(super) fn audit(store: &str, d: u32, points_lost: f64, stars: f64) -> MetricRecord {
    MetricRecord {
        points_lost: Some(points_lost),
        stars: Some(stars),
        ..MetricRecord::new(store, day(d))
    }
}

pub(super) fn raw(value: Value) -> RawRecord {
    value.as_object().cloned().expect("object literal")
}

#[derive(Default, Clone)]
pub(super) struct MemorySource {
    pub(super) tables: Arc<Mutex<HashMap<MetricTable, Vec<RawRecord>>>>,
}

impl MemorySource {
    pub(super) fn seeded(shifts: Vec<RawRecord>, audits: Vec<RawRecord>) -> Self {
        let source = Self::default();
        {
            let mut guard = source.tables.lock().expect("source mutex poisoned");
            guard.insert(MetricTable::ShiftMetrics, shifts);
            guard.insert(MetricTable::OsaAudits, audits);
        }
        source
    }

    pub(super) fn rows(&self, table: MetricTable) -> Vec<RawRecord> {
        self.tables
            .lock()
            .expect("source mutex poisoned")
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }
}

impl MetricSource for MemorySource {
    fn query(
        &self,
        table: MetricTable,
        query: &MetricQuery,
    ) -> Result<Vec<RawRecord>, SourceError> {
        let guard = self.tables.lock().expect("source mutex poisoned");
        let rows = guard.get(&table).map(Vec::as_slice).unwrap_or_default();
        Ok(query.apply(&RecordSchema::v1(), rows))
    }

    fn insert(&self, table: MetricTable, row: RawRecord) -> Result<(), SourceError> {
        self.tables
            .lock()
            .expect("source mutex poisoned")
            .entry(table)
            .or_default()
            .push(row);
        Ok(())
    }
}

/// Shift queries succeed, audit queries fail.
pub(super) struct AuditOutageSource;

impl MetricSource for AuditOutageSource {
    fn query(
        &self,
        table: MetricTable,
        _query: &MetricQuery,
    ) -> Result<Vec<RawRecord>, SourceError> {
        match table {
            MetricTable::ShiftMetrics => Ok(vec![raw(serde_json::json!({
                "store": "Downpatrick",
                "shift_date": "2025-03-04",
                "sales": 1000,
            }))]),
            MetricTable::OsaAudits => Err(SourceError::Query {
                table: table.name(),
                reason: "permission denied".to_string(),
            }),
        }
    }

    fn insert(&self, table: MetricTable, _row: RawRecord) -> Result<(), SourceError> {
        Err(SourceError::Write {
            table: table.name(),
            reason: "read only".to_string(),
        })
    }
}

/// A fortnight of shifts and audits across the four stores, all in March 2025.
pub(super) fn seeded_source() -> MemorySource {
    let shifts = vec![
        raw(serde_json::json!({
            "store": "Downpatrick", "shift_date": "2025-03-03", "closing_manager": "Aoife",
            "sales_gbp": 5000, "labour_cost_gbp": 1250, "ideal_food_cost_gbp": 1400,
            "actual_food_cost_gbp": 1425, "dot_pct": 84, "extreme_lates_pct": 1.5,
            "rnl_minutes": 6,
        })),
        raw(serde_json::json!({
            "store": "Downpatrick", "shift_date": "2025-03-10", "closing_manager": "Ciaran",
            "sales_gbp": 5000, "labour_cost_gbp": 1250, "ideal_food_cost_gbp": 1400,
            "actual_food_cost_gbp": 1425, "dot_pct": 0.80, "extreme_lates_pct": 0.01,
            "rnl_minutes": 8,
        })),
        raw(serde_json::json!({
            "store": "Kilkeel", "shift_date": "2025-03-04", "manager_name": "Ruairi",
            "sales": 3000, "labour_cost": 840, "dot": 71, "rnl": 11,
        })),
        raw(serde_json::json!({
            "store": "Newcastle", "shift_date": "2025-03-05",
            "net_sales": "4200", "labour_cost_gbp": "1176", "dot_pct": "77",
        })),
        raw(serde_json::json!({
            "store": "", "shift_date": "2025-03-06", "sales_gbp": 900,
            "labour_cost_gbp": 540,
        })),
        raw(serde_json::json!({
            "store": "Kilkeel", "shift_date": "2025-02-20", "sales_gbp": 9999,
            "labour_cost_gbp": 9999,
        })),
    ];
    let audits = vec![
        raw(serde_json::json!({
            "store": "Downpatrick", "date": "2025-03-07", "manager": "Aoife",
            "points_lost": 4, "stars": 4.5,
        })),
        raw(serde_json::json!({
            "store": "Kilkeel", "date": "2025-03-08", "manager": "Ruairi",
            "points_lost": 9, "stars": 3,
        })),
    ];
    MemorySource::seeded(shifts, audits)
}

pub(super) fn build_service(source: MemorySource) -> PerformanceService<MemorySource> {
    PerformanceService::new(Arc::new(source), stores())
}

pub(super) fn router_for<S: MetricSource + 'static>(service: PerformanceService<S>) -> axum::Router {
    performance_router(Arc::new(PerformanceState {
        service,
        default_window: DateWindow::MonthToDate,
    }))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
