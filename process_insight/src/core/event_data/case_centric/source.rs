//! Selecting where event data comes from: a user-provided file or the built-in sample

use std::path::PathBuf;

use super::csv_import::{import_event_table_csv_with_options, EventTableCSVImportOptions};
use super::event_table::EventTable;
use super::io::EventTableError;
use crate::core::io::Importable;

/// Invoice payment process with four cases (30 events), used when no input file is given
pub const SAMPLE_INVOICE_CSV: &str = "\
case_id,activity,timestamp
1,Start,2022-01-01 08:00:00
1,Receive Invoice,2022-01-01 08:30:00
1,Validate Invoice,2022-01-01 10:00:00
1,Approve Invoice,2022-01-01 11:00:00
1,Match Purchase Order,2022-01-01 13:00:00
1,Pay Invoice,2022-01-02 09:00:00
1,End,2022-01-02 10:00:00
2,Start,2022-01-02 09:00:00
2,Receive Invoice,2022-01-02 09:15:00
2,Validate Invoice,2022-01-02 10:30:00
2,Approve Invoice,2022-01-02 11:15:00
2,Match Purchase Order,2022-01-02 12:00:00
2,Resolve Discrepancy,2022-01-03 09:00:00
2,Pay Invoice,2022-01-04 09:00:00
2,End,2022-01-04 09:30:00
3,Start,2022-01-03 07:00:00
3,Receive Invoice,2022-01-03 08:00:00
3,Validate Invoice,2022-01-03 09:00:00
3,Match Purchase Order,2022-01-03 10:00:00
3,Approve Invoice,2022-01-03 11:30:00
3,Pay Invoice,2022-01-05 08:00:00
3,End,2022-01-05 09:00:00
4,Start,2022-01-04 08:00:00
4,Receive Invoice,2022-01-04 08:15:00
4,Validate Invoice,2022-01-04 09:00:00
4,Resolve Discrepancy,2022-01-05 10:00:00
4,Match Purchase Order,2022-01-05 11:00:00
4,Approve Invoice,2022-01-05 13:00:00
4,Pay Invoice,2022-01-06 09:00:00
4,End,2022-01-06 10:00:00
";

/// Load the built-in invoice sample as an [`EventTable`]
pub fn sample_event_table() -> Result<EventTable, EventTableError> {
    import_event_table_csv_with_options(
        SAMPLE_INVOICE_CSV.as_bytes(),
        &EventTableCSVImportOptions::default(),
    )
}

/// Where the event data of an analysis run is read from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EventSource {
    /// The built-in invoice sample ([`SAMPLE_INVOICE_CSV`])
    #[default]
    Sample,
    /// A file; the format is inferred from the extension (`csv`, `csv.gz`, `json`)
    Path(PathBuf),
}

impl EventSource {
    /// `Path` if a path is given, `Sample` otherwise
    pub fn from_optional_path(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Sample, Self::Path)
    }

    /// Read and normalize the event data
    ///
    /// Column and date format options apply to CSV files only; the sample always uses the defaults.
    pub fn load(&self, options: EventTableCSVImportOptions) -> Result<EventTable, EventTableError> {
        match self {
            EventSource::Sample => {
                tracing::debug!("using built-in invoice sample");
                sample_event_table()
            }
            EventSource::Path(path) => {
                tracing::debug!(path = %path.display(), "importing event data");
                EventTable::import_from_path_with_options(path, options)
            }
        }
    }
}
