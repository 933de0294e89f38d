use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coerces a raw field value into a finite number.
///
/// Null, blank strings, non-numeric strings, booleans, and non-finite values all map to
/// `None`. Nothing here panics.
pub fn to_number(raw: &Value) -> Option<f64> {
    let parsed = match raw {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };

    parsed.filter(|value| value.is_finite())
}

/// Resolves a rate that may be on a 0–1 or a 0–100 scale to its 0–1 form.
///
/// Anything above `1` is read as percentage points. Exactly `1` stays `1` (100%).
pub fn normalise_percent01(raw: &Value) -> Option<f64> {
    to_number(raw).map(infer_fraction)
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

fn infer_fraction(value: f64) -> f64 {
    if value > 1.0 {
        value / 100.0
    } else {
        value
    }
}

/// How a percentage column is expressed in the upstream table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentScale {
    /// Stored as 0–1.
    Fraction,
    /// Stored as percentage points, 0–100.
    Points,
    /// Unknown; fall back to the magnitude heuristic of [`normalise_percent01`].
    Inferred,
}

impl PercentScale {
    pub fn to_fraction(self, raw: &Value) -> Option<Fraction> {
        let value = to_number(raw)?;
        let fraction = match self {
            Self::Fraction => value,
            Self::Points => value / 100.0,
            Self::Inferred => infer_fraction(value),
        };
        Some(Fraction(fraction))
    }
}

/// A rate on the 0–1 scale. Construction goes through [`PercentScale`] so the unit is
/// settled once at the ingestion boundary.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fraction(pub f64);

impl Fraction {
    pub const fn get(self) -> f64 {
        self.0
    }
}
