//! Boundary between upstream rows and the engine's fixed record shape.

mod normalizer;
mod parser;
mod schema;

pub use schema::{FieldAliases, RawRecord, RecordSchema};

use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Loads spreadsheet exports of shift or audit sheets as raw rows.
pub struct CsvImporter;

impl CsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RawRecord>, ImportError> {
        Ok(parser::parse_rows(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn importer_feeds_schema_mapping() {
        let csv = "Store,Shift Date,Closing Manager,Sales GBP,Labour Cost GBP\n\
Downpatrick,2025-03-04,Aoife,1000,250\n\
Kilkeel,2025-03-04,,800,\n";
        let rows = CsvImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
        let records = RecordSchema::v1().map_all(&rows);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].manager.as_deref(), Some("Aoife"));
        assert_eq!(records[0].labour_cost, Some(250.0));
        assert_eq!(records[1].manager, None);
        assert_eq!(records[1].labour_cost, None);
        assert_eq!(records[1].sales, Some(800.0));
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = CsvImporter::from_path("./does-not-exist.csv").expect_err("expected io error");
        match error {
            ImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
