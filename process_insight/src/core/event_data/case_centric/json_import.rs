//! JSON Import for [`EventTable`]
//!
//! The JSON input is an array of event records, keyed by the same column names as the CSV
//! import (see [`EventTableCSVImportOptions`]):
//!
//! ```text
//! [
//!   {"case_id": "1", "activity": "Receive Invoice", "timestamp": "2022-01-01 08:30:00"},
//!   {"case_id": "1", "activity": "Validate Invoice", "timestamp": "2022-01-01T10:00:00Z", "row": 7}
//! ]
//! ```
//!
//! Timestamps go through the same parser as CSV cells. The optional `row` key keeps the
//! tie-break position of an exported table; without it, the record's 1-based position in
//! the array is used.

use std::io::Read;

use serde_json::{Map, Value};

use super::csv_import::EventTableCSVImportOptions;
use super::event_table::{Event, EventTable};
use super::io::EventTableError;
use crate::core::event_data::timestamp_utils::parse_timestamp;

/// Key holding the optional tie-break position of a record
pub const ROW: &str = "row";

type Record = Map<String, Value>;

fn lookup<'a>(record: &'a Record, key: &str) -> Option<&'a Value> {
    record.get(key).or_else(|| {
        record
            .iter()
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(key.trim()))
            .map(|(_, v)| v)
    })
}

/// Textual content of a scalar value; `None` for null and nested values
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn required_text(
    record: &Record,
    column: &str,
    row: usize,
) -> Result<String, EventTableError> {
    match lookup(record, column).and_then(scalar_text) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(EventTableError::EmptyValue {
            row,
            column: column.to_string(),
        }),
    }
}

fn parse_record(
    record: &Record,
    idx: usize,
    options: &EventTableCSVImportOptions,
) -> Result<Event, EventTableError> {
    let columns: Vec<String> = [
        &options.case_id_column,
        &options.activity_column,
        &options.timestamp_column,
    ]
    .into_iter()
    .filter(|name| lookup(record, name).is_none())
    .cloned()
    .collect();
    if !columns.is_empty() {
        return Err(EventTableError::MissingColumn { columns });
    }

    let row = lookup(record, ROW)
        .and_then(Value::as_u64)
        .and_then(|r| usize::try_from(r).ok())
        .unwrap_or(idx + 1);

    let case_id = required_text(record, &options.case_id_column, row)?;
    let activity = required_text(record, &options.activity_column, row)?;
    let ts_value = lookup(record, &options.timestamp_column).unwrap_or(&Value::Null);
    let ts_str = match ts_value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let timestamp = parse_timestamp(&ts_str, options.date_format.as_deref()).map_err(|value| {
        EventTableError::UnparseableTimestamp {
            row,
            value: value.to_string(),
        }
    })?;

    Ok(Event::new(case_id, activity, timestamp, row))
}

/// Import an [`EventTable`] from a JSON reader using default options
pub fn import_event_table_json(reader: impl Read) -> Result<EventTable, EventTableError> {
    import_event_table_json_with_options(reader, &EventTableCSVImportOptions::default())
}

/// Import an [`EventTable`] from a JSON array of event records with custom column names
/// and date format
pub fn import_event_table_json_with_options(
    reader: impl Read,
    options: &EventTableCSVImportOptions,
) -> Result<EventTable, EventTableError> {
    let records: Vec<Record> = serde_json::from_reader(reader)?;
    let events = records
        .iter()
        .enumerate()
        .map(|(idx, record)| parse_record(record, idx, options))
        .collect::<Result<Vec<_>, _>>()?;

    if events.is_empty() {
        return Err(EventTableError::EmptyDataset);
    }
    tracing::debug!(events = events.len(), "parsed JSON event records");
    EventTable::from_events(events)
}
