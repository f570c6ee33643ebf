//! Bottleneck Analysis
//!
//! Point-in-time events do not reveal how long an activity was actually worked on. The time
//! spent at an activity is therefore approximated by the gap between consecutive events of the
//! same case. [`DurationAttribution`] selects which of the two events the gap is charged to.

use std::collections::{BTreeMap, BTreeSet};

use chrono::TimeDelta;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::event_data::case_centric::EventTable;
use crate::utils::duration_stats::{DurationStats, DurationUnit};

/// Which event of a consecutive pair `(prev, curr)` the elapsed time is attributed to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DurationAttribution {
    /// Charge the gap to `curr`: time it took to arrive at / perform this step.
    ///
    /// Activities that only ever occur first in their case receive no samples.
    #[default]
    Incoming,
    /// Charge the gap to `prev`: time until the next step started.
    ///
    /// Activities that only ever occur last in their case receive no samples.
    Outgoing,
}

/// One elapsed time attributed to an activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationSample<'a> {
    /// Activity the time is attributed to
    pub activity: &'a str,
    /// Elapsed time (never negative)
    pub elapsed: TimeDelta,
}

/// Options for [`analyze_bottlenecks`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BottleneckOptions {
    /// Attribution of inter-event gaps
    pub attribution: DurationAttribution,
    /// Activities left out of the ranking (e.g., artificial `Start`/`End` markers)
    pub excluded_activities: BTreeSet<String>,
    /// Unit used for numeric output
    pub unit: DurationUnit,
}

/// Duration statistics of one activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ActivityDurationStats {
    /// Activity label
    pub activity: String,
    /// Aggregated samples
    #[serde(flatten)]
    pub stats: DurationStats,
}

impl ActivityDurationStats {
    /// Mean elapsed time
    pub fn mean(&self) -> TimeDelta {
        self.stats.mean()
    }
}

/// Result of [`analyze_bottlenecks`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BottleneckAnalysis {
    /// Activities with at least one sample, slowest (highest mean) first; ties by name
    pub ranking: Vec<ActivityDurationStats>,
    /// Activities present in the data that received no sample at all
    ///
    /// These have no duration, which is different from a duration of zero.
    pub activities_without_samples: Vec<String>,
    /// Activities present in the data but excluded via [`BottleneckOptions::excluded_activities`]
    pub excluded_activities: Vec<String>,
    /// Attribution used
    pub attribution: DurationAttribution,
    /// Unit for numeric output (see [`BottleneckAnalysis::mean_rows`])
    pub unit: DurationUnit,
}

impl BottleneckAnalysis {
    /// Statistics of an activity, if it received samples and was not excluded
    pub fn get(&self, activity: &str) -> Option<&ActivityDurationStats> {
        self.ranking.iter().find(|s| s.activity == activity)
    }

    /// The `n` slowest activities
    pub fn top(&self, n: usize) -> &[ActivityDurationStats] {
        &self.ranking[..n.min(self.ranking.len())]
    }

    /// `(activity, mean duration in unit)` rows in ranking order, ready for charting
    pub fn mean_rows(&self) -> Vec<(&str, f64)> {
        self.ranking
            .iter()
            .map(|s| (s.activity.as_str(), s.stats.mean_in(self.unit)))
            .collect()
    }
}

/// All duration samples of an [`EventTable`] under the given attribution
///
/// Yields one sample per consecutive event pair, so a case with a single event contributes none.
pub fn duration_samples(
    table: &EventTable,
    attribution: DurationAttribution,
) -> impl Iterator<Item = DurationSample<'_>> + '_ {
    table.cases().iter().flat_map(move |case| {
        case.directly_follows_pairs().map(move |(prev, curr)| {
            let elapsed = curr.timestamp - prev.timestamp;
            debug_assert!(elapsed >= TimeDelta::zero(), "events of a case must be sorted");
            let activity = match attribution {
                DurationAttribution::Incoming => curr.activity.as_str(),
                DurationAttribution::Outgoing => prev.activity.as_str(),
            };
            DurationSample { activity, elapsed }
        })
    })
}

/// Rank activities by their mean attributed duration
pub fn analyze_bottlenecks(table: &EventTable, options: &BottleneckOptions) -> BottleneckAnalysis {
    let mut per_activity: BTreeMap<&str, DurationStats> = BTreeMap::new();
    for DurationSample { activity, elapsed } in duration_samples(table, options.attribution) {
        if options.excluded_activities.contains(activity) {
            continue;
        }
        per_activity
            .entry(activity)
            .and_modify(|s| s.add_sample(elapsed))
            .or_insert_with(|| DurationStats::new(elapsed));
    }

    let (excluded_activities, remaining): (Vec<&str>, Vec<&str>) = table
        .activities()
        .into_iter()
        .partition(|a| options.excluded_activities.contains(*a));
    let activities_without_samples = remaining
        .into_iter()
        .filter(|a| !per_activity.contains_key(a))
        .map(String::from)
        .collect();

    let mut ranking: Vec<ActivityDurationStats> = per_activity
        .into_iter()
        .map(|(activity, stats)| ActivityDurationStats {
            activity: activity.to_string(),
            stats,
        })
        .collect();
    ranking.sort_by(|a, b| {
        b.stats
            .mean_in(DurationUnit::Seconds)
            .total_cmp(&a.stats.mean_in(DurationUnit::Seconds))
            .then_with(|| a.activity.cmp(&b.activity))
    });

    BottleneckAnalysis {
        ranking,
        activities_without_samples,
        excluded_activities: excluded_activities.into_iter().map(String::from).collect(),
        attribution: options.attribution,
        unit: options.unit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_data::case_centric::{
        csv_import::import_event_table_csv, source::sample_event_table,
    };
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
    fn test_incoming_attribution() {
        let analysis = analyze_bottlenecks(&receive_validate_approve(), &Default::default());
        let validate = analysis.get("Validate").unwrap();
        assert_eq!(validate.stats.count, 2);
        // (1h + 3h) / 2
        assert_eq!(validate.mean(), TimeDelta::hours(2));
        assert_eq!(validate.stats.min, TimeDelta::hours(1));
        assert_eq!(validate.stats.max, TimeDelta::hours(3));
        assert_eq!(analysis.get("Approve").unwrap().mean(), TimeDelta::hours(3));

        // Receive only ever occurs first: no data, not zero
        assert!(analysis.get("Receive").is_none());
        assert_eq!(analysis.activities_without_samples, vec!["Receive".to_string()]);
        assert_eq!(
            analysis
                .ranking
                .iter()
                .map(|s| s.activity.as_str())
                .collect::<Vec<_>>(),
            vec!["Approve", "Validate"]
        );
    }

    #[test]
    fn test_outgoing_attribution() {
        let options = BottleneckOptions {
            attribution: DurationAttribution::Outgoing,
            ..Default::default()
        };
        let analysis = analyze_bottlenecks(&receive_validate_approve(), &options);
        assert_eq!(analysis.get("Receive").unwrap().mean(), TimeDelta::hours(2));
        assert_eq!(analysis.get("Validate").unwrap().mean(), TimeDelta::hours(3));
        assert_eq!(analysis.activities_without_samples, vec!["Approve".to_string()]);
    }

    #[test]
    fn test_sample_like_original_demo() {
        // Time until the next step, in hours, excluding the Start/End markers
        let options = BottleneckOptions {
            attribution: DurationAttribution::Outgoing,
            excluded_activities: ["Start", "End"].into_iter().map(String::from).collect(),
            unit: DurationUnit::Hours,
        };
        let analysis = analyze_bottlenecks(&sample_event_table().unwrap(), &options);
        let rows = analysis.mean_rows();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].0, "Approve Invoice");
        // Approve Invoice -> next step: 2h, 0.75h, 44.5h, 20h
        assert!((rows[0].1 - (2.0 + 0.75 + 44.5 + 20.0) / 4.0).abs() < 1e-9);
        assert_eq!(rows[1].0, "Resolve Discrepancy");
        assert_eq!(rows[2].0, "Match Purchase Order");
        assert_eq!(analysis.excluded_activities, vec!["End", "Start"]);
        assert!(analysis.activities_without_samples.is_empty());
        assert!(analysis.get("Start").is_none());
    }

    #[test]
    fn test_single_event_cases_give_no_samples() {
        let csv = "case_id,activity,timestamp\n1,Only,2022-01-01\n2,Lonely,2022-01-02\n";
        let table = import_event_table_csv(csv.as_bytes()).unwrap();
        assert_eq!(duration_samples(&table, DurationAttribution::Incoming).count(), 0);
        let analysis = analyze_bottlenecks(&table, &Default::default());
        assert!(analysis.ranking.is_empty());
        assert_eq!(analysis.activities_without_samples, vec!["Lonely", "Only"]);
    }

    #[test]
    fn test_shuffled_input_never_yields_negative_durations() {
        let shuffled = EventTable::import_from_path(
            get_test_data_path().join("csv").join("invoices_shuffled.csv"),
        )
        .unwrap();
        for attribution in [DurationAttribution::Incoming, DurationAttribution::Outgoing] {
            assert!(duration_samples(&shuffled, attribution).all(|s| s.elapsed >= TimeDelta::zero()));
        }

        let ordered = sample_event_table().unwrap();
        assert_eq!(
            analyze_bottlenecks(&shuffled, &Default::default()),
            analyze_bottlenecks(&ordered, &Default::default())
        );
    }

    #[test]
    fn test_ranking_ties_broken_by_name() {
        let csv = "case_id,activity,timestamp\n\
                   1,S,2022-01-01 08:00\n1,B,2022-01-01 09:00\n\
                   2,S,2022-01-01 08:00\n2,A,2022-01-01 09:00\n";
        let table = import_event_table_csv(csv.as_bytes()).unwrap();
        let analysis = analyze_bottlenecks(&table, &Default::default());
        let names: Vec<_> = analysis.ranking.iter().map(|s| s.activity.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(analysis.top(1).len(), 1);
        assert_eq!(analysis.top(10).len(), 2);
    }

    #[test]
    fn test_serialized_stats_are_flat() {
        let analysis = analyze_bottlenecks(&receive_validate_approve(), &Default::default());
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["ranking"][0]["activity"], "Approve");
        assert_eq!(json["ranking"][0]["total"], 3 * 3600 * 1000);
        assert_eq!(json["attribution"], "incoming");
        assert_eq!(json["unit"], "hours");
    }
}
