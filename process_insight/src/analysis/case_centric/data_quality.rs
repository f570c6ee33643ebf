//! Data quality checks on normalized event data

use chrono::TimeDelta;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};

use crate::core::event_data::case_centric::EventTable;

/// Gaps below this are reported by default
pub const DEFAULT_SHORT_GAP_THRESHOLD: TimeDelta = TimeDelta::minutes(1);

/// Two consecutive events of a case that are suspiciously close in time
///
/// Often a sign of batch-recorded or duplicated events; equal timestamps show up with a zero gap.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ShortGap {
    /// Case identifier
    pub case_id: String,
    /// Activity of the earlier event
    pub from_activity: String,
    /// Activity of the later event
    pub to_activity: String,
    /// Source row of the earlier event
    pub from_row: usize,
    /// Source row of the later event
    pub to_row: usize,
    /// Time between the two events
    #[serde_as(as = "DurationMilliSeconds<i64>")]
    #[schemars(with = "i64")]
    pub gap: TimeDelta,
}

/// Find all consecutive event pairs whose gap is below `threshold`
pub fn find_short_gaps(table: &EventTable, threshold: TimeDelta) -> Vec<ShortGap> {
    table
        .cases()
        .iter()
        .flat_map(|case| {
            case.directly_follows_pairs()
                .filter_map(move |(prev, curr)| {
                    let gap = curr.timestamp - prev.timestamp;
                    (gap < threshold).then(|| ShortGap {
                        case_id: case.case_id.clone(),
                        from_activity: prev.activity.clone(),
                        to_activity: curr.activity.clone(),
                        from_row: prev.row,
                        to_row: curr.row,
                        gap,
                    })
                })
        })
        .collect()
}
