use super::normalizer::{date_value, text_value};
use crate::performance::domain::MetricRecord;
use crate::performance::normalizer::{to_number, PercentScale};
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// A row as returned by the backing store: field name to JSON value.
pub type RawRecord = Map<String, Value>;

/// Where one canonical field may be found in a raw row, in lookup order.
#[derive(Debug, Clone, Copy)]
pub struct FieldAliases(pub &'static [&'static str]);

impl FieldAliases {
    /// First alias holding a non-null value.
    pub fn lookup<'a>(&self, row: &'a RawRecord) -> Option<&'a Value> {
        self.0
            .iter()
            .filter_map(|alias| row.get(*alias))
            .find(|value| !value.is_null())
    }
}

/// Versioned contract mapping upstream rows onto [`MetricRecord`].
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub version: u16,
    pub store: FieldAliases,
    pub date: FieldAliases,
    pub manager: FieldAliases,
    pub sales: FieldAliases,
    pub labour_cost: FieldAliases,
    pub ideal_food_cost: FieldAliases,
    pub actual_food_cost: FieldAliases,
    pub additional_hours: FieldAliases,
    pub dot: FieldAliases,
    pub extremes: FieldAliases,
    pub sbr: FieldAliases,
    pub rnl_minutes: FieldAliases,
    pub points_lost: FieldAliases,
    pub stars: FieldAliases,
    pub rate_scale: PercentScale,
    /// Scan unlisted column names for manager and points-lost values when no alias
    /// matched. Only for older exports whose headers drifted.
    pub infer_unlisted_keys: bool,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self::v1()
    }
}

impl RecordSchema {
    pub const fn v1() -> Self {
        Self {
            version: 1,
            store: FieldAliases(&["store", "store_name"]),
            date: FieldAliases(&["shift_date", "date", "audit_date"]),
            manager: FieldAliases(&[
                "manager",
                "manager_name",
                "closing_manager",
                "shift_manager",
            ]),
            sales: FieldAliases(&["sales_gbp", "sales", "net_sales"]),
            labour_cost: FieldAliases(&["labour_cost_gbp", "labour_cost", "labour_gbp"]),
            ideal_food_cost: FieldAliases(&[
                "ideal_food_cost_gbp",
                "ideal_food_cost",
                "ideal_food_gbp",
            ]),
            actual_food_cost: FieldAliases(&[
                "actual_food_cost_gbp",
                "actual_food_cost",
                "actual_food_gbp",
            ]),
            additional_hours: FieldAliases(&["additional_hours", "extra_hours"]),
            dot: FieldAliases(&["dot_pct", "dot_percent", "dot"]),
            extremes: FieldAliases(&["extreme_lates_pct", "extremes_pct", "extreme_lates"]),
            sbr: FieldAliases(&["sbr_pct", "sbr_percent", "sbr"]),
            rnl_minutes: FieldAliases(&["rnl_minutes", "rack_and_load_minutes", "rnl"]),
            points_lost: FieldAliases(&["points_lost", "osa_points_lost", "total_points_lost"]),
            stars: FieldAliases(&["stars", "star_rating", "osa_stars"]),
            rate_scale: PercentScale::Inferred,
            infer_unlisted_keys: false,
        }
    }

    pub fn with_rate_scale(mut self, scale: PercentScale) -> Self {
        self.rate_scale = scale;
        self
    }

    pub fn with_inferred_keys(mut self, enabled: bool) -> Self {
        self.infer_unlisted_keys = enabled;
        self
    }

    pub fn date_of(&self, row: &RawRecord) -> Option<NaiveDate> {
        self.date.lookup(row).and_then(date_value)
    }

    pub fn store_of(&self, row: &RawRecord) -> Option<String> {
        self.store.lookup(row).and_then(text_value)
    }

    /// Maps one raw row. Unparseable fields come through as `None`; nothing fails.
    pub fn map(&self, row: &RawRecord) -> MetricRecord {
        let number = |aliases: &FieldAliases| aliases.lookup(row).and_then(to_number);
        let rate = |aliases: &FieldAliases| {
            aliases
                .lookup(row)
                .and_then(|value| self.rate_scale.to_fraction(value))
        };

        let mut manager = self.manager.lookup(row).and_then(text_value);
        let mut points_lost = number(&self.points_lost);
        if self.infer_unlisted_keys {
            if manager.is_none() {
                manager = scan_keys(row, "manager").and_then(text_value);
            }
            if points_lost.is_none() {
                points_lost = scan_keys(row, "points").and_then(to_number);
            }
        }

        MetricRecord {
            store: self.store_of(row),
            date: self.date_of(row),
            manager,
            sales: number(&self.sales),
            labour_cost: number(&self.labour_cost),
            ideal_food_cost: number(&self.ideal_food_cost),
            actual_food_cost: number(&self.actual_food_cost),
            additional_hours: number(&self.additional_hours),
            dot: rate(&self.dot),
            extremes: rate(&self.extremes),
            sbr: rate(&self.sbr),
            rnl_minutes: number(&self.rnl_minutes),
            points_lost,
            stars: number(&self.stars),
        }
    }

    pub fn map_all(&self, rows: &[RawRecord]) -> Vec<MetricRecord> {
        rows.iter().map(|row| self.map(row)).collect()
    }
}

fn scan_keys<'a>(row: &'a RawRecord, needle: &str) -> Option<&'a Value> {
    row.iter()
        .filter(|(key, value)| key.to_ascii_lowercase().contains(needle) && !value.is_null())
        .map(|(_, value)| value)
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performance::normalizer::Fraction;
    use serde_json::json;

    fn row(value: Value) -> RawRecord {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn maps_primary_and_fallback_aliases() {
        let schema = RecordSchema::v1();
        let record = schema.map(&row(json!({
            "store": "Downpatrick",
            "shift_date": "2025-03-04",
            "closing_manager": "Aoife",
            "net_sales": "1000",
            "labour_cost_gbp": 250,
            "dot_pct": 82,
            "extremes_pct": 0.02,
            "rnl_minutes": "7.5",
        })));

        assert_eq!(record.store.as_deref(), Some("Downpatrick"));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 3, 4));
        assert_eq!(record.manager.as_deref(), Some("Aoife"));
        assert_eq!(record.sales, Some(1000.0));
        assert_eq!(record.labour_cost, Some(250.0));
        assert_eq!(record.dot, Some(Fraction(0.82)));
        assert_eq!(record.extremes, Some(Fraction(0.02)));
        assert_eq!(record.rnl_minutes, Some(7.5));
        assert_eq!(record.stars, None);
    }

    #[test]
    fn null_primary_alias_falls_through_but_blank_does_not() {
        let schema = RecordSchema::v1();
        let record = schema.map(&row(json!({
            "sales_gbp": null,
            "sales": 420,
            "labour_cost_gbp": "",
            "labour_cost": 99,
        })));

        assert_eq!(record.sales, Some(420.0));
        assert_eq!(record.labour_cost, None);
    }

    #[test]
    fn bad_fields_only_affect_themselves() {
        let schema = RecordSchema::v1();
        let record = schema.map(&row(json!({
            "store": "Kilkeel",
            "date": "not a date",
            "points_lost": "lots",
            "stars": 4,
        })));

        assert_eq!(record.store.as_deref(), Some("Kilkeel"));
        assert_eq!(record.date, None);
        assert_eq!(record.points_lost, None);
        assert_eq!(record.stars, Some(4.0));
    }

    #[test]
    fn explicit_rate_scale_overrides_heuristic() {
        let schema = RecordSchema::v1().with_rate_scale(PercentScale::Points);
        let record = schema.map(&row(json!({ "extreme_lates_pct": 1 })));
        assert_eq!(record.extremes, Some(Fraction(0.01)));
    }

    #[test]
    fn key_inference_is_opt_in() {
        let raw = row(json!({
            "Store": "Newcastle",
            "Manager On Duty": "Ruairi",
            "OSA Points": 6,
        }));

        let strict = RecordSchema::v1().map(&raw);
        assert_eq!(strict.manager, None);
        assert_eq!(strict.points_lost, None);

        let legacy = RecordSchema::v1().with_inferred_keys(true).map(&raw);
        assert_eq!(legacy.manager.as_deref(), Some("Ruairi"));
        assert_eq!(legacy.points_lost, Some(6.0));
    }
}
