//! Full analysis of an [`EventTable`] in one pass
//!
//! Bundles the directly-follows graph, bottleneck ranking, case pathways, variants and
//! data quality findings into a single serializable [`AnalysisReport`].

use chrono::TimeDelta;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};

use super::{
    bottleneck::{analyze_bottlenecks, BottleneckAnalysis, BottleneckOptions},
    case_pathways::{case_pathways, variants, CasePathway, Variant},
    data_quality::{find_short_gaps, ShortGap, DEFAULT_SHORT_GAP_THRESHOLD},
};
use crate::core::{
    event_data::case_centric::EventTable,
    process_models::case_centric::dfg::DirectlyFollowsGraph,
};
use crate::discovery::case_centric::dfg::discover_dfg;

/// Options for [`analyze`]
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisConfig {
    /// Options for the bottleneck ranking
    #[serde(default)]
    pub bottleneck: BottleneckOptions,
    /// Consecutive events closer than this are reported as short gaps
    #[serde_as(as = "DurationMilliSeconds<i64>")]
    #[schemars(with = "i64")]
    pub short_gap_threshold: TimeDelta,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bottleneck: BottleneckOptions::default(),
            short_gap_threshold: DEFAULT_SHORT_GAP_THRESHOLD,
        }
    }
}

/// Result of [`analyze`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Total number of events
    pub num_events: usize,
    /// Number of distinct cases
    pub num_cases: usize,
    /// Number of distinct activities
    pub num_activities: usize,
    /// Discovered directly-follows graph
    pub dfg: DirectlyFollowsGraph,
    /// Activities ranked by mean duration
    pub bottlenecks: BottleneckAnalysis,
    /// Activity sequence of each case
    pub pathways: Vec<CasePathway>,
    /// Cases grouped by activity sequence
    pub variants: Vec<Variant>,
    /// Suspiciously close consecutive events
    pub short_gaps: Vec<ShortGap>,
}

impl AnalysisReport {
    /// Serialize the report as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Run every analysis on `table`
pub fn analyze(table: &EventTable, config: &AnalysisConfig) -> AnalysisReport {
    let dfg = discover_dfg(table);
    let bottlenecks = analyze_bottlenecks(table, &config.bottleneck);
    let short_gaps = find_short_gaps(table, config.short_gap_threshold);
    if !short_gaps.is_empty() {
        tracing::warn!(
            count = short_gaps.len(),
            threshold_ms = config.short_gap_threshold.num_milliseconds(),
            "found consecutive events closer than the short gap threshold"
        );
    }
    AnalysisReport {
        num_events: table.num_events(),
        num_cases: table.num_cases(),
        num_activities: table.activities().len(),
        dfg,
        bottlenecks,
        pathways: case_pathways(table),
        variants: variants(table),
        short_gaps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_data::case_centric::source::sample_event_table;

    #[test]
    fn test_analyze_sample() {
        let table = sample_event_table().unwrap();
        let report = analyze(&table, &AnalysisConfig::default());
        assert_eq!(report.num_events, 30);
        assert_eq!(report.num_cases, 4);
        assert_eq!(report.num_activities, 8);
        assert_eq!(report.pathways.len(), 4);
        assert_eq!(report.variants.len(), 4);
        assert!(report.short_gaps.is_empty());
        assert_eq!(report.dfg.total_edge_weight(), 26);
        assert_eq!(report.bottlenecks.ranking.len(), 7);
    }

    #[test]
    fn test_report_json() {
        let table = sample_event_table().unwrap();
        let report = analyze(&table, &AnalysisConfig::default());
        let json = report.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["num_events"], 30);
        assert!(value["bottlenecks"]["ranking"].is_array());
        let back: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_config_default_and_deserialize() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"short_gap_threshold": 120000}"#).unwrap();
        assert_eq!(config.short_gap_threshold, TimeDelta::minutes(2));
        assert_eq!(config.bottleneck, BottleneckOptions::default());
        assert_eq!(
            AnalysisConfig::default().short_gap_threshold,
            TimeDelta::minutes(1)
        );
    }
}
