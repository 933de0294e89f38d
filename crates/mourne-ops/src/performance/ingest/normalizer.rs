use chrono::{DateTime, NaiveDate};
use serde_json::Value;

/// Trimmed text for a field, `None` when missing or blank.
pub(crate) fn text_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.replace(['\u{feff}', '\u{200b}'], ""),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

/// Calendar day from `YYYY-MM-DD` or an RFC 3339 timestamp.
pub(crate) fn date_value(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}
