use super::normalizer::Fraction;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bucket label for rows whose grouping value is missing or blank.
pub const UNKNOWN_KEY: &str = "Unknown";

/// One observation for a store on a day, optionally attributed to a manager.
///
/// Shift rows carry the cost and service fields; OSA audit rows carry points lost and
/// stars. Every numeric field is optional: cost fields read absent as zero when summed,
/// rate and score fields are excluded from averages when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub store: Option<String>,
    pub date: Option<NaiveDate>,
    pub manager: Option<String>,
    pub sales: Option<f64>,
    pub labour_cost: Option<f64>,
    pub ideal_food_cost: Option<f64>,
    pub actual_food_cost: Option<f64>,
    pub additional_hours: Option<f64>,
    pub dot: Option<Fraction>,
    pub extremes: Option<Fraction>,
    pub sbr: Option<Fraction>,
    pub rnl_minutes: Option<f64>,
    pub points_lost: Option<f64>,
    pub stars: Option<f64>,
}

impl MetricRecord {
    pub fn new(store: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            store: Some(store.into()),
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn with_manager(mut self, manager: impl Into<String>) -> Self {
        self.manager = Some(manager.into());
        self
    }

    /// Grouping value for `dimension`, or `None` when missing or blank.
    pub fn key_for(&self, dimension: Dimension) -> Option<String> {
        let value = match dimension {
            Dimension::Store => self.store.clone(),
            Dimension::Manager => self.manager.clone(),
            Dimension::Day => self.date.map(|date| date.to_string()),
        };

        value
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn has_shift_metrics(&self) -> bool {
        [
            self.sales,
            self.labour_cost,
            self.ideal_food_cost,
            self.actual_food_cost,
            self.additional_hours,
            self.rnl_minutes,
        ]
        .iter()
        .any(Option::is_some)
            || [self.dot, self.extremes, self.sbr].iter().any(Option::is_some)
    }

    pub fn has_audit_metrics(&self) -> bool {
        self.points_lost.is_some() || self.stars.is_some()
    }

    pub fn has_metrics(&self) -> bool {
        self.has_shift_metrics() || self.has_audit_metrics()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Store,
    Manager,
    Day,
}

impl Dimension {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Store => "Store",
            Self::Manager => "Manager",
            Self::Day => "Day",
        }
    }
}

impl FromStr for Dimension {
    type Err = ParseLabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "store" | "stores" => Ok(Self::Store),
            "manager" | "managers" => Ok(Self::Manager),
            "day" | "date" | "daily" => Ok(Self::Day),
            other => Err(ParseLabelError::new("dimension", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDomain {
    Service,
    Cost,
    Osa,
}

impl ScoreDomain {
    pub const fn ordered() -> [Self; 3] {
        [Self::Service, Self::Cost, Self::Osa]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Service => "Service",
            Self::Cost => "Cost Controls",
            Self::Osa => "OSA Standards",
        }
    }
}

/// Which sort order a leaderboard uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Board {
    Osa,
    Cost,
    Service,
    Mpi,
}

impl Board {
    pub const fn ordered() -> [Self; 4] {
        [Self::Mpi, Self::Service, Self::Cost, Self::Osa]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Osa => "OSA Standards",
            Self::Cost => "Cost Controls",
            Self::Service => "Service",
            Self::Mpi => "MPI",
        }
    }
}

impl FromStr for Board {
    type Err = ParseLabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "osa" | "standards" => Ok(Self::Osa),
            "cost" | "costs" => Ok(Self::Cost),
            "service" => Ok(Self::Service),
            "mpi" => Ok(Self::Mpi),
            other => Err(ParseLabelError::new("board", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
}

impl ParseLabelError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseLabelError {}
