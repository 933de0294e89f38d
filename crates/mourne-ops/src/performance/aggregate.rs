use super::domain::{Dimension, MetricRecord, UNKNOWN_KEY};
use super::normalizer::Fraction;
use super::window::DateRange;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Reduced metrics for one grouping value.
///
/// Cost fields are plain sums with missing values counted as zero. Rate and score fields
/// are means over the records that carried them and stay `None` when no record did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub key: String,
    pub count: usize,
    /// Records carrying points lost or stars.
    pub audits: usize,
    pub sales: f64,
    pub labour_cost: f64,
    pub ideal_food_cost: f64,
    pub actual_food_cost: f64,
    pub additional_hours: f64,
    pub dot: Option<f64>,
    pub extremes: Option<f64>,
    pub sbr: Option<f64>,
    pub rnl_minutes: Option<f64>,
    pub points_lost: Option<f64>,
    pub stars: Option<f64>,
    pub labour_percent: Option<f64>,
    pub food_variance_percent: Option<f64>,
}

impl AggregateRow {
    pub fn empty(key: impl Into<String>) -> Self {
        GroupAccumulator::default().finish(key.into())
    }
}

/// Labour cost as percentage points of sales. `None` unless sales are positive.
pub fn labour_percent(labour_cost: f64, sales: f64) -> Option<f64> {
    (sales > 0.0).then(|| labour_cost * 100.0 / sales)
}

/// Actual minus ideal food cost as signed percentage points of sales.
pub fn food_variance_percent(actual: f64, ideal: f64, sales: f64) -> Option<f64> {
    (sales > 0.0).then(|| (actual - ideal) * 100.0 / sales)
}

/// Groups records by one dimension, optionally limited to a date range.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    dimension: Dimension,
    range: Option<DateRange>,
}

impl Aggregator {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            range: None,
        }
    }

    pub fn within(mut self, range: Option<DateRange>) -> Self {
        self.range = range;
        self
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn includes(&self, record: &MetricRecord) -> bool {
        match (&self.range, record.date) {
            (None, _) => true,
            (Some(range), Some(date)) => range.contains(date),
            (Some(_), None) => false,
        }
    }

    /// One row per grouping value, in key order.
    pub fn aggregate(&self, records: &[MetricRecord]) -> Vec<AggregateRow> {
        let mut groups: BTreeMap<String, GroupAccumulator> = BTreeMap::new();
        let mut unknown = 0usize;

        for record in records.iter().filter(|record| self.includes(record)) {
            let key = record.key_for(self.dimension).unwrap_or_else(|| {
                unknown += 1;
                UNKNOWN_KEY.to_string()
            });
            groups.entry(key).or_default().push(record);
        }

        if unknown > 0 {
            debug!(
                dimension = self.dimension.label(),
                records = unknown,
                "records without a grouping value bucketed as unknown"
            );
        }

        groups
            .into_iter()
            .map(|(key, accumulator)| accumulator.finish(key))
            .collect()
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    observations: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.observations += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.observations > 0).then(|| self.sum / self.observations as f64)
    }
}

#[derive(Debug, Default)]
struct GroupAccumulator {
    count: usize,
    audits: usize,
    sales: f64,
    labour_cost: f64,
    ideal_food_cost: f64,
    actual_food_cost: f64,
    additional_hours: f64,
    food_observations: usize,
    dot: Mean,
    extremes: Mean,
    sbr: Mean,
    rnl_minutes: Mean,
    points_lost: Mean,
    stars: Mean,
}

impl GroupAccumulator {
    fn push(&mut self, record: &MetricRecord) {
        self.count += 1;
        if record.has_audit_metrics() {
            self.audits += 1;
        }
        self.sales += record.sales.unwrap_or(0.0);
        self.labour_cost += record.labour_cost.unwrap_or(0.0);
        self.ideal_food_cost += record.ideal_food_cost.unwrap_or(0.0);
        self.actual_food_cost += record.actual_food_cost.unwrap_or(0.0);
        self.additional_hours += record.additional_hours.unwrap_or(0.0);

        if record.ideal_food_cost.is_some() || record.actual_food_cost.is_some() {
            self.food_observations += 1;
        }

        self.dot.push(record.dot.map(Fraction::get));
        self.extremes.push(record.extremes.map(Fraction::get));
        self.sbr.push(record.sbr.map(Fraction::get));
        self.rnl_minutes.push(record.rnl_minutes);
        self.points_lost.push(record.points_lost);
        self.stars.push(record.stars);
    }

    fn finish(self, key: String) -> AggregateRow {
        // Food variance stays unscored until a record reports food cost.
        let food_variance_percent = if self.food_observations > 0 {
            food_variance_percent(self.actual_food_cost, self.ideal_food_cost, self.sales)
        } else {
            None
        };

        AggregateRow {
            key,
            count: self.count,
            audits: self.audits,
            sales: self.sales,
            labour_cost: self.labour_cost,
            ideal_food_cost: self.ideal_food_cost,
            actual_food_cost: self.actual_food_cost,
            additional_hours: self.additional_hours,
            dot: self.dot.value(),
            extremes: self.extremes.value(),
            sbr: self.sbr.value(),
            rnl_minutes: self.rnl_minutes.value(),
            points_lost: self.points_lost.value(),
            stars: self.stars.value(),
            labour_percent: labour_percent(self.labour_cost, self.sales),
            food_variance_percent,
        }
    }
}
