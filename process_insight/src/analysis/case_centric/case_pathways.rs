//! Case Pathways and Variants
//!
//! The sequence of activities each case went through, and the grouping of cases that share
//! the same sequence.

use std::{collections::HashMap, fmt::Display};

use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::event_data::case_centric::EventTable;

/// Activity sequence of a single case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CasePathway {
    /// Case identifier
    pub case_id: String,
    /// Activities in execution order
    pub activities: Vec<String>,
}

impl Display for CasePathway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Case {}: {}", self.case_id, self.activities.join(" -> "))
    }
}

/// A distinct activity sequence and the cases following it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Variant {
    /// Activities in execution order
    pub activities: Vec<String>,
    /// Cases following exactly this sequence (in case order)
    pub case_ids: Vec<String>,
}

impl Variant {
    /// Number of cases following this variant
    pub fn frequency(&self) -> usize {
        self.case_ids.len()
    }
}

/// Pathway of every case, in case order
pub fn case_pathways(table: &EventTable) -> Vec<CasePathway> {
    table
        .cases()
        .iter()
        .map(|case| CasePathway {
            case_id: case.case_id.clone(),
            activities: case.activities().map(String::from).collect(),
        })
        .collect()
}

/// Group cases by identical activity sequence
///
/// Variants are sorted by descending frequency, ties by activity sequence.
pub fn variants(table: &EventTable) -> Vec<Variant> {
    let mut per_sequence: HashMap<Vec<&str>, Vec<String>> = HashMap::new();
    for case in table.cases() {
        per_sequence
            .entry(case.activities().collect())
            .or_default()
            .push(case.case_id.clone());
    }
    per_sequence
        .into_iter()
        .sorted_by(|(seq_a, cases_a), (seq_b, cases_b)| {
            cases_b.len().cmp(&cases_a.len()).then_with(|| seq_a.cmp(seq_b))
        })
        .map(|(seq, case_ids)| Variant {
            activities: seq.into_iter().map(String::from).collect(),
            case_ids,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_data::case_centric::{
        csv_import::import_event_table_csv, source::sample_event_table,
    };

    #[test]
    fn test_case_pathways_display() {
        let pathways = case_pathways(&sample_event_table().unwrap());
        assert_eq!(pathways.len(), 4);
        assert_eq!(
            pathways[0].to_string(),
            "Case 1: Start -> Receive Invoice -> Validate Invoice -> Approve Invoice -> Match Purchase Order -> Pay Invoice -> End"
        );
        assert_eq!(pathways[3].activities[3], "Resolve Discrepancy");
    }

    #[test]
    fn test_sample_variants_are_all_distinct() {
        let variants = variants(&sample_event_table().unwrap());
        assert_eq!(variants.len(), 4);
        assert!(variants.iter().all(|v| v.frequency() == 1));
    }

    #[test]
    fn test_variants_grouped_and_ordered() {
        let csv = "case_id,activity,timestamp\n\
                   1,A,2022-01-01 08:00\n1,B,2022-01-01 09:00\n\
                   2,A,2022-01-02 08:00\n2,C,2022-01-02 09:00\n\
                   3,A,2022-01-03 08:00\n3,C,2022-01-03 09:00\n\
                   4,A,2022-01-04 08:00\n";
        let variants = variants(&import_event_table_csv(csv.as_bytes()).unwrap());
        assert_eq!(variants.len(), 3);
        assert_eq!(variants[0].activities, vec!["A", "C"]);
        assert_eq!(variants[0].case_ids, vec!["2", "3"]);
        // Equal frequency: ["A"] sorts before ["A", "B"]
        assert_eq!(variants[1].activities, vec!["A"]);
        assert_eq!(variants[2].activities, vec!["A", "B"]);
    }
}
