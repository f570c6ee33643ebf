//! Discover [`DirectlyFollowsGraph`]s from Data

use crate::core::{
    event_data::case_centric::{Event, EventTable},
    process_models::case_centric::dfg::DirectlyFollowsGraph,
};

/// Discover a [`DirectlyFollowsGraph`] from an [`EventTable`]
///
/// Every pair of consecutive events `(prev, curr)` within a case adds one to the frequency of
/// the relation `prev.activity -> curr.activity` and records the time elapsed between them.
/// The first event of a case only marks a start activity; the last one an end activity.
pub fn discover_dfg(table: &EventTable) -> DirectlyFollowsGraph {
    let mut result = DirectlyFollowsGraph::new();
    table.cases().iter().for_each(|case| {
        let mut last_event: Option<&Event> = None;
        case.events().iter().for_each(|e| {
            result.add_activity(e.activity.clone(), 1);

            if let Some(prev) = last_event.take() {
                result.add_df_relation(prev.activity.clone(), e.activity.clone(), 1);
                result.add_df_relation_duration(
                    prev.activity.clone(),
                    e.activity.clone(),
                    e.timestamp - prev.timestamp,
                );
            } else {
                result.add_start_activity(e.activity.clone());
            }

            last_event = Some(e);
        });
        if let Some(last) = last_event.take() {
            result.add_end_activity(last.activity.clone());
        }
    });
    tracing::debug!(
        activities = result.activities.len(),
        relations = result.directly_follows_relations.len(),
        "discovered directly-follows graph"
    );

    result
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use proptest::prelude::*;

    use super::*;
    use crate::core::event_data::case_centric::{
        csv_import::import_event_table_csv, source::sample_event_table,
    };
    use crate::core::event_data::timestamp_utils::parse_timestamp;
    use crate::core::io::Importable;
    use crate::test_utils::get_test_data_path;

    fn receive_validate_approve() -> EventTable {
        let csv = "case_id,activity,timestamp\n\
                   A,Receive,2022-01-01 08:00:00\n\
                   A,Validate,2022-01-01 09:00:00\n\
                   A,Approve,2022-01-01 12:00:00\n\
                   B,Receive,2022-01-02 08:00:00\n\
                   B,Validate,2022-01-02 11:00:00\n";
        import_event_table_csv(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_receive_validate_approve() {
        let dfg = discover_dfg(&receive_validate_approve());
        assert_eq!(dfg.directly_follows_relations.len(), 2);
        assert_eq!(dfg.get_df_frequency("Receive", "Validate"), Some(2));
        assert_eq!(dfg.get_df_frequency("Validate", "Approve"), Some(1));
        assert_eq!(
            dfg.get_df_durations("Receive", "Validate").unwrap().mean(),
            TimeDelta::hours(2)
        );
        assert_eq!(dfg.activities["Receive"], 2);
        assert!(dfg.is_start_activity("Receive"));
        assert!(dfg.is_end_activity("Approve"));
        assert!(dfg.is_end_activity("Validate"));
        assert_eq!(dfg.total_edge_weight(), 5 - 2);
    }

    #[test]
    fn test_dfg_from_sample() {
        let table = sample_event_table().unwrap();
        let dfg = discover_dfg(&table);
        assert_eq!(dfg.activities.len(), 8);
        assert_eq!(
            dfg.total_edge_weight(),
            (table.num_events() - table.num_cases()) as u64
        );
        assert_eq!(dfg.start_activities.len(), 1);
        assert_eq!(dfg.end_activities.len(), 1);
        assert_eq!(dfg.get_df_frequency("Start", "Receive Invoice"), Some(4));
        assert_eq!(dfg.get_df_frequency("Pay Invoice", "End"), Some(4));
        assert_eq!(
            dfg.outgoing_activities("Match Purchase Order")
                .into_iter()
                .map(String::as_str)
                .collect::<Vec<_>>(),
            vec!["Approve Invoice", "Pay Invoice", "Resolve Discrepancy"]
        );
    }

    #[test]
    fn test_empty_table_gives_empty_graph() {
        let dfg = discover_dfg(&EventTable::default());
        assert_eq!(dfg, DirectlyFollowsGraph::new());
    }

    #[test]
    fn test_single_event_case_contributes_no_edges() {
        let csv = "case_id,activity,timestamp\n1,Only,2022-01-01\n2,A,2022-01-01\n2,B,2022-01-02\n";
        let dfg = discover_dfg(&import_event_table_csv(csv.as_bytes()).unwrap());
        assert_eq!(dfg.total_edge_weight(), 1);
        assert!(dfg.contains_activity("Only"));
        assert!(dfg.is_start_activity("Only") && dfg.is_end_activity("Only"));
        assert!(dfg.get_outgoing_df_relations("Only").is_empty());
    }

    #[test]
    fn test_self_loops_and_cycles() {
        let csv = "case_id,activity,timestamp\n\
                   1,A,2022-01-01 08:00\n1,B,2022-01-01 09:00\n1,B,2022-01-01 10:00\n\
                   1,A,2022-01-01 11:00\n";
        let dfg = discover_dfg(&import_event_table_csv(csv.as_bytes()).unwrap());
        assert_eq!(dfg.get_df_frequency("B", "B"), Some(1));
        assert_eq!(dfg.get_df_frequency("A", "B"), Some(1));
        assert_eq!(dfg.get_df_frequency("B", "A"), Some(1));
    }

    #[test]
    fn test_shuffled_rows_give_same_graph() {
        let ordered = EventTable::import_from_path(
            get_test_data_path().join("csv").join("invoices.csv"),
        )
        .unwrap();
        let shuffled = EventTable::import_from_path(
            get_test_data_path().join("csv").join("invoices_shuffled.csv"),
        )
        .unwrap();
        assert_eq!(discover_dfg(&ordered), discover_dfg(&shuffled));
    }

    #[test]
    fn test_discovery_is_deterministic() {
        let table = sample_event_table().unwrap();
        assert_eq!(
            discover_dfg(&table).to_json().unwrap(),
            discover_dfg(&table).to_json().unwrap()
        );
    }

    fn arb_events() -> impl Strategy<Value = Vec<Event>> {
        prop::collection::vec((0u8..5, 0u8..4, 0i64..10_000), 0..60).prop_map(|rows| {
            let base = parse_timestamp("2022-01-01 00:00:00", None).unwrap();
            rows.into_iter()
                .enumerate()
                .map(|(i, (case, act, minutes))| {
                    Event::new(
                        case.to_string(),
                        format!("Act{act}"),
                        base + TimeDelta::minutes(minutes),
                        i + 2,
                    )
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_edge_weight_is_events_minus_cases(events in arb_events()) {
            let table = EventTable::from_events(events).unwrap();
            let dfg = discover_dfg(&table);
            prop_assert_eq!(
                dfg.total_edge_weight(),
                (table.num_events() - table.num_cases()) as u64
            );
            for stats in dfg.relation_durations.values() {
                prop_assert!(stats.min >= TimeDelta::zero());
            }
        }

        #[test]
        fn prop_row_order_does_not_matter(events in arb_events(), seed in any::<u64>()) {
            let mut shuffled = events.clone();
            // Deterministic permutation derived from the seed; rows travel with their events
            shuffled.sort_by_key(|e| (e.row as u64).wrapping_mul(seed | 1).rotate_left(17));
            let a = discover_dfg(&EventTable::from_events(events).unwrap());
            let b = discover_dfg(&EventTable::from_events(shuffled).unwrap());
            prop_assert_eq!(a, b);
        }
    }
}
