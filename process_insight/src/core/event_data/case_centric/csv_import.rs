//! CSV Import for [`EventTable`]
//!
//! The CSV needs (at least) three columns: a case identifier, an activity label and a
//! timestamp. Column names are configurable via [`EventTableCSVImportOptions`] and are matched
//! case-insensitively, ignoring surrounding whitespace. Additional columns are ignored.
//!
//! ```text
//! case_id,activity,timestamp
//! 1,Receive Invoice,2022-01-01 08:30:00
//! 1,Validate Invoice,2022-01-01 10:00:00
//! ```
//!
//! Rows are never skipped silently: a blank case id or activity and any timestamp that cannot
//! be parsed fail the whole import with the offending line number.

use std::io::Read;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::event_table::{Event, EventTable, ACTIVITY, CASE_ID, TIMESTAMP};
use super::io::EventTableError;
use crate::core::event_data::timestamp_utils::parse_timestamp;

/// Options for CSV [`EventTable`] Import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EventTableCSVImportOptions {
    /// Name of the case identifier column
    pub case_id_column: String,
    /// Name of the activity column
    pub activity_column: String,
    /// Name of the timestamp column
    pub timestamp_column: String,
    /// Optional date format tried first when parsing timestamps (`chrono` format syntax)
    pub date_format: Option<String>,
    /// Field delimiter
    pub delimiter: u8,
}

impl Default for EventTableCSVImportOptions {
    fn default() -> Self {
        Self {
            case_id_column: CASE_ID.to_string(),
            activity_column: ACTIVITY.to_string(),
            timestamp_column: TIMESTAMP.to_string(),
            date_format: None,
            delimiter: b',',
        }
    }
}

/// Indices of the three required columns
struct ColumnIndices {
    case_id: usize,
    activity: usize,
    timestamp: usize,
}

/// Locate the required columns, reporting all missing ones at once
fn locate_columns(
    headers: &csv::StringRecord,
    options: &EventTableCSVImportOptions,
) -> Result<ColumnIndices, EventTableError> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
    };
    let case_id = find(&options.case_id_column);
    let activity = find(&options.activity_column);
    let timestamp = find(&options.timestamp_column);

    match (case_id, activity, timestamp) {
        (Some(case_id), Some(activity), Some(timestamp)) => Ok(ColumnIndices {
            case_id,
            activity,
            timestamp,
        }),
        _ => {
            let columns = [
                (case_id, &options.case_id_column),
                (activity, &options.activity_column),
                (timestamp, &options.timestamp_column),
            ]
            .into_iter()
            .filter(|(idx, _)| idx.is_none())
            .map(|(_, name)| name.clone())
            .collect();
            Err(EventTableError::MissingColumn { columns })
        }
    }
}

/// Import an [`EventTable`] from a CSV reader using default options
pub fn import_event_table_csv(reader: impl Read) -> Result<EventTable, EventTableError> {
    import_event_table_csv_with_options(reader, &EventTableCSVImportOptions::default())
}

/// Import an [`EventTable`] from a CSV reader with custom options
pub fn import_event_table_csv_with_options(
    reader: impl Read,
    options: &EventTableCSVImportOptions,
) -> Result<EventTable, EventTableError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let cols = locate_columns(&headers, options)?;
    let date_fmt = options.date_format.as_deref();

    let mut events = Vec::new();
    for (row_idx, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let row_num = row_idx + 2;

        let case_id = record.get(cols.case_id).unwrap_or("");
        let activity = record.get(cols.activity).unwrap_or("");
        let ts_str = record.get(cols.timestamp).unwrap_or("");

        if case_id.is_empty() {
            return Err(EventTableError::EmptyValue {
                row: row_num,
                column: options.case_id_column.clone(),
            });
        }
        if activity.is_empty() {
            return Err(EventTableError::EmptyValue {
                row: row_num,
                column: options.activity_column.clone(),
            });
        }
        let timestamp = parse_timestamp(ts_str, date_fmt).map_err(|value| {
            EventTableError::UnparseableTimestamp {
                row: row_num,
                value: value.to_string(),
            }
        })?;

        events.push(Event::new(case_id, activity, timestamp, row_num));
    }

    if events.is_empty() {
        return Err(EventTableError::EmptyDataset);
    }
    tracing::debug!(events = events.len(), "parsed CSV event rows");
    EventTable::from_events(events)
}
