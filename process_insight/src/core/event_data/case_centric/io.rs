//! IO implementations for [`EventTable`]

use std::io::{BufReader, Read, Write};

use thiserror::Error;

use super::csv_import::{import_event_table_csv_with_options, EventTableCSVImportOptions};
use super::event_table::{EventTable, ACTIVITY, CASE_ID, TIMESTAMP};
use super::json_import::import_event_table_json_with_options;
use crate::core::io::{Exportable, ExtensionWithMime, Importable};

/// Errors raised while reading and normalizing event data
///
/// All of these are detected before any discovery or analysis runs.
#[derive(Debug, Error)]
pub enum EventTableError {
    /// One or more required columns are absent
    #[error("missing required column(s): {}", .columns.join(", "))]
    MissingColumn {
        /// Names of all missing columns
        columns: Vec<String>,
    },
    /// A timestamp could not be parsed
    #[error("unparseable timestamp at row {row}: '{value}'")]
    UnparseableTimestamp {
        /// Row where the error occurred
        row: usize,
        /// The offending value
        value: String,
    },
    /// A case id or activity cell is blank
    #[error("empty value in column '{column}' at row {row}")]
    EmptyValue {
        /// Row where the error occurred
        row: usize,
        /// Column name
        column: String,
    },
    /// The input contains no events
    #[error("the dataset contains no events")]
    EmptyDataset,
    /// CSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Unsupported format
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl Importable for EventTable {
    type Error = EventTableError;
    type ImportOptions = EventTableCSVImportOptions;

    fn import_from_reader_with_options<R: Read>(
        reader: R,
        format: &str,
        options: Self::ImportOptions,
    ) -> Result<Self, Self::Error> {
        let table = match format {
            _ if format.ends_with("csv.gz") => {
                let gz = flate2::read::GzDecoder::new(reader);
                import_event_table_csv_with_options(BufReader::new(gz), &options)?
            }
            _ if format.ends_with("csv") => import_event_table_csv_with_options(reader, &options)?,
            _ if format.ends_with("json") => {
                import_event_table_json_with_options(BufReader::new(reader), &options)?
            }
            _ => return Err(EventTableError::UnsupportedFormat(format.to_string())),
        };
        if table.is_empty() {
            return Err(EventTableError::EmptyDataset);
        }
        tracing::debug!(
            format,
            cases = table.num_cases(),
            events = table.num_events(),
            "imported event table"
        );
        Ok(table)
    }

    fn known_import_formats() -> Vec<ExtensionWithMime> {
        vec![
            ExtensionWithMime::new("csv", "text/csv"),
            ExtensionWithMime::new("csv.gz", "application/gzip"),
            ExtensionWithMime::new("json", "application/json"),
        ]
    }
}

/// Write an [`EventTable`] as CSV with the default column names and RFC3339 timestamps
pub fn export_event_table_csv<W: Write>(
    table: &EventTable,
    writer: W,
) -> Result<(), EventTableError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([CASE_ID, ACTIVITY, TIMESTAMP])?;
    for event in table.events() {
        wtr.write_record([
            event.case_id.as_str(),
            event.activity.as_str(),
            event.timestamp.to_rfc3339().as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

impl Exportable for EventTable {
    type Error = EventTableError;

    fn export_to_writer<W: Write>(&self, writer: W, format: &str) -> Result<(), Self::Error> {
        if format.ends_with("json") {
            serde_json::to_writer(writer, self)?;
            Ok(())
        } else if format.ends_with("csv") {
            export_event_table_csv(self, writer)
        } else {
            Err(EventTableError::UnsupportedFormat(format.to_string()))
        }
    }

    fn known_export_formats() -> Vec<ExtensionWithMime> {
        vec![
            ExtensionWithMime::new("csv", "text/csv"),
            ExtensionWithMime::new("json", "application/json"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::test_utils::get_test_data_path;

    #[test]
    fn test_import_from_path() {
        let path = get_test_data_path().join("csv").join("invoices.csv");
        let table = EventTable::import_from_path(path).unwrap();
        assert_eq!(table.num_cases(), 4);
        assert_eq!(table.num_events(), 30);
    }

    #[test]
    fn test_import_gzipped_csv() {
        let csv = std::fs::read(get_test_data_path().join("csv").join("invoices.csv")).unwrap();
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&csv).unwrap();
        let gz = encoder.finish().unwrap();

        let table = EventTable::import_from_bytes(&gz, "csv.gz").unwrap();
        assert_eq!(table, EventTable::import_from_bytes(&csv, "csv").unwrap());
    }

    #[test]
    fn test_export_import_roundtrip_via_files() {
        let table = EventTable::import_from_path(
            get_test_data_path().join("csv").join("invoices.csv"),
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("invoices.json");
        table.export_to_path(&json_path).unwrap();
        assert_eq!(EventTable::import_from_path(&json_path).unwrap(), table);

        let csv_path = dir.path().join("invoices.csv");
        table.export_to_path(&csv_path).unwrap();
        let reimported = EventTable::import_from_path(&csv_path).unwrap();
        // Rows are renumbered on re-import; the ordering stays the same
        let acts = |t: &EventTable| {
            t.events()
                .map(|e| (e.case_id.clone(), e.activity.clone(), e.timestamp))
                .collect::<Vec<_>>()
        };
        assert_eq!(acts(&reimported), acts(&table));
    }

    #[test]
    fn test_empty_json_is_empty_dataset() {
        let err = EventTable::import_from_bytes(b"[]", "json").unwrap_err();
        assert!(matches!(err, EventTableError::EmptyDataset));
    }

    #[test]
    fn test_json_import_uses_shared_validation() {
        let json = r#"[{"case_id":"1","activity":"A","timestamp":"2022-01-01 08:00:00"}]"#;
        let table = EventTable::import_from_bytes(json.as_bytes(), "json").unwrap();
        assert_eq!(table.events().next().unwrap().row, 1);

        let json = r#"[{"case_id":"1","timestamp":"2022-01-01 08:00:00","row":2}]"#;
        let err = EventTable::import_from_bytes(json.as_bytes(), "json").unwrap_err();
        assert!(matches!(err, EventTableError::MissingColumn { columns } if columns == ["activity"]));

        let json = r#"[{"case_id":"1","activity":"A","timestamp":"someday","row":2}]"#;
        let err = EventTable::import_from_bytes(json.as_bytes(), "json").unwrap_err();
        assert_eq!(err.to_string(), "unparseable timestamp at row 2: 'someday'");
    }

    #[test]
    fn test_unsupported_format() {
        let err = EventTable::import_from_bytes(b"", "xes").unwrap_err();
        assert!(matches!(err, EventTableError::UnsupportedFormat(f) if f == "xes"));
    }

    #[test]
    fn test_error_messages() {
        let err = EventTableError::MissingColumn {
            columns: vec!["activity".into(), "timestamp".into()],
        };
        assert_eq!(
            err.to_string(),
            "missing required column(s): activity, timestamp"
        );
        let err = EventTableError::UnparseableTimestamp {
            row: 12,
            value: "soon".into(),
        };
        assert_eq!(err.to_string(), "unparseable timestamp at row 12: 'soon'");
    }
}
