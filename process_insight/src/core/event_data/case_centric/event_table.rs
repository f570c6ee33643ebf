use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, FixedOffset};
use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::io::EventTableError;

/// Column name used for the case identifier
pub const CASE_ID: &str = "case_id";
/// Column name used for the activity label
pub const ACTIVITY: &str = "activity";
/// Column name used for the event timestamp
pub const TIMESTAMP: &str = "timestamp";

///
/// A single point-in-time event of a case
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Event {
    /// Identifier of the case this event belongs to
    pub case_id: String,
    /// Activity label
    pub activity: String,
    /// Time at which the event occurred
    pub timestamp: DateTime<FixedOffset>,
    /// Position in the source data (for CSV: the line number, header being line 1)
    ///
    /// Breaks ties between events of the same case with equal timestamps.
    pub row: usize,
}

impl Event {
    /// Create a new [`Event`]
    pub fn new(
        case_id: impl Into<String>,
        activity: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
        row: usize,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            activity: activity.into(),
            timestamp,
            row,
        }
    }
}

///
/// All events sharing one `case_id`, ordered by timestamp (ties broken by source row)
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    /// Case identifier
    pub case_id: String,
    events: Vec<Event>,
}

impl Case {
    /// Ordered events of the case
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Activity labels in execution order
    pub fn activities(&self) -> impl Iterator<Item = &str> + '_ {
        self.events.iter().map(|e| e.activity.as_str())
    }

    /// Consecutive event pairs `(previous, current)`
    ///
    /// A case with `n` events yields `n - 1` pairs.
    pub fn directly_follows_pairs(&self) -> impl Iterator<Item = (&Event, &Event)> + '_ {
        self.events.iter().tuple_windows()
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the case has no events
    ///
    /// Cases inside an [`EventTable`] always hold at least one event.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Sort key ordering numeric case ids numerically (before all others), the rest lexicographically
fn case_order_key(case_id: &str) -> (bool, i64, &str) {
    match case_id.parse::<i64>() {
        Ok(n) => (false, n, case_id),
        Err(_) => (true, 0, case_id),
    }
}

///
/// Normalized, immutable event data: events grouped into [`Case`]s and sorted
///
/// Only constructed through [`EventTable::from_events`] (or the importers building on it),
/// so every consumer can rely on the ordering invariants.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Event>", into = "Vec<Event>")]
pub struct EventTable {
    cases: Vec<Case>,
}

impl EventTable {
    /// Normalize a set of events into an [`EventTable`]
    ///
    /// Events are grouped by `case_id`; within a case they are sorted ascending by timestamp,
    /// with ties broken by `row` and then by input position.
    /// Fails with [`EventTableError::EmptyValue`] if a case id or activity is blank.
    ///
    /// An empty input yields an empty table; the importers reject empty datasets separately.
    pub fn from_events<I: IntoIterator<Item = Event>>(events: I) -> Result<Self, EventTableError> {
        let mut per_case: HashMap<String, Vec<Event>> = HashMap::new();
        for event in events {
            if event.case_id.trim().is_empty() {
                return Err(EventTableError::EmptyValue {
                    row: event.row,
                    column: CASE_ID.to_string(),
                });
            }
            if event.activity.trim().is_empty() {
                return Err(EventTableError::EmptyValue {
                    row: event.row,
                    column: ACTIVITY.to_string(),
                });
            }
            per_case.entry(event.case_id.clone()).or_default().push(event);
        }

        let cases = per_case
            .into_iter()
            .sorted_by(|(a, _), (b, _)| case_order_key(a).cmp(&case_order_key(b)))
            .map(|(case_id, mut events)| {
                events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.row.cmp(&b.row)));
                Case { case_id, events }
            })
            .collect();
        Ok(Self { cases })
    }

    /// Cases in case id order
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Look up a case by its identifier
    pub fn case(&self, case_id: &str) -> Option<&Case> {
        self.cases.iter().find(|c| c.case_id == case_id)
    }

    /// All events, case by case, in normalized order
    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.cases.iter().flat_map(|c| c.events.iter())
    }

    /// Number of distinct cases
    pub fn num_cases(&self) -> usize {
        self.cases.len()
    }

    /// Total number of events
    pub fn num_events(&self) -> usize {
        self.cases.iter().map(Case::len).sum()
    }

    /// Distinct activity labels (sorted)
    pub fn activities(&self) -> BTreeSet<&str> {
        self.events().map(|e| e.activity.as_str()).collect()
    }

    /// Whether the table contains no events
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl TryFrom<Vec<Event>> for EventTable {
    type Error = EventTableError;

    fn try_from(events: Vec<Event>) -> Result<Self, Self::Error> {
        Self::from_events(events)
    }
}

impl From<EventTable> for Vec<Event> {
    fn from(table: EventTable) -> Self {
        table.cases.into_iter().flat_map(|c| c.events).collect()
    }
}
