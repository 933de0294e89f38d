use super::schema::RawRecord;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;

/// Reads a CSV export into raw rows keyed by normalized header.
///
/// Headers are lower-cased with spaces turned into underscores so `Shift Date` and
/// `shift_date` land on the same alias. Empty cells are left out of the row.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RawRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<HashMap<String, String>>() {
        let cells = record?;
        let mut row = RawRecord::new();
        for (header, value) in cells {
            if value.is_empty() {
                continue;
            }
            row.insert(normalize_header(&header), Value::String(value));
        }

        if !row.is_empty() {
            rows.push(row);
        }
    }

    tracing::debug!(columns = headers.len(), rows = rows.len(), "parsed csv export");
    Ok(rows)
}

fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
}
