use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::TimeDelta;
use petgraph::graph::{DiGraph, NodeIndex};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};

use crate::utils::duration_stats::DurationStats;

/// Activity in a directly-follows graph.
pub type Activity = String;

/// A weighted edge of a [`DirectlyFollowsGraph`], as handed to graph renderers
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DfgEdge {
    /// Source activity
    pub source: Activity,
    /// Target activity
    pub target: Activity,
    /// Number of times `target` directly followed `source`
    pub weight: u32,
    /// Mean time between `source` and `target` (milliseconds when serialized)
    #[serde_as(as = "Option<DurationMilliSeconds<i64>>")]
    #[schemars(with = "Option<i64>")]
    pub mean_duration: Option<TimeDelta>,
}

/// A directly-follows graph of [`Activity`]s.
/// Graph containing a set of activities, a set of directly-follows relations, a set of start
/// activities, and a set of end activities.
/// Both, the number of occurrences of activities and of directly follows relations are annotated
/// with their frequency. Directly-follows relations additionally carry statistics over the time
/// elapsed between the two events.
///
/// All collections are ordered, so two graphs built from the same data serialize identically.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectlyFollowsGraph {
    /// Activities
    pub activities: BTreeMap<Activity, u32>,
    /// Directly-follows relations
    #[serde_as(as = "Vec<(_, _)>")]
    pub directly_follows_relations: BTreeMap<(Activity, Activity), u32>,
    /// Elapsed time statistics per directly-follows relation
    #[serde_as(as = "Vec<(_, _)>")]
    #[serde(default)]
    pub relation_durations: BTreeMap<(Activity, Activity), DurationStats>,
    /// Start activities
    pub start_activities: BTreeSet<Activity>,
    /// End activities
    pub end_activities: BTreeSet<Activity>,
}

impl DirectlyFollowsGraph {
    /// Create new [`DirectlyFollowsGraph`] with no activities and directly-follows relations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Add an activity with a frequency.
    ///
    /// If the activity already exists, the frequency count is added to the existing activity.
    pub fn add_activity(&mut self, activity: Activity, frequency: u32) {
        *self.activities.entry(activity).or_default() += frequency;
    }

    /// Adds an activity to the set of start activities.
    pub fn add_start_activity(&mut self, activity: Activity) {
        self.start_activities.insert(activity);
    }

    /// Adds an activity to the set of end activities.
    pub fn add_end_activity(&mut self, activity: Activity) {
        self.end_activities.insert(activity);
    }

    /// Checks if an activity is already contained in the directly-follows graph.
    pub fn contains_activity<S: AsRef<str>>(&self, activity: S) -> bool {
        self.activities.contains_key(activity.as_ref())
    }

    /// Checks if an activity is a start activity in the directly-follows graph.
    pub fn is_start_activity<S: AsRef<str>>(&self, activity: S) -> bool {
        self.start_activities.contains(activity.as_ref())
    }

    /// Checks if an activity is an end activity in the directly-follows graph.
    pub fn is_end_activity<S: AsRef<str>>(&self, activity: S) -> bool {
        self.end_activities.contains(activity.as_ref())
    }

    /// Add a directly-follows relation with a frequency.
    ///
    /// If the directly-follows relation already exists, the frequency count is added to the
    /// existing directly-follows relation.
    pub fn add_df_relation(&mut self, from: Activity, to: Activity, frequency: u32) {
        *self
            .directly_follows_relations
            .entry((from, to))
            .or_default() += frequency;
    }

    /// Record one observed elapsed time for a directly-follows relation.
    ///
    /// Does not change the frequency; see [`DirectlyFollowsGraph::add_df_relation`].
    pub fn add_df_relation_duration(&mut self, from: Activity, to: Activity, elapsed: TimeDelta) {
        self.relation_durations
            .entry((from, to))
            .and_modify(|stats| stats.add_sample(elapsed))
            .or_insert_with(|| DurationStats::new(elapsed));
    }

    /// Checks if a directly-follows relation is already contained in the directly-follows graph.
    pub fn contains_df_relation<S: AsRef<str>>(&self, (a, b): (S, S)) -> bool {
        self.get_df_frequency(a, b).is_some()
    }

    /// Frequency of a directly-follows relation (`None` if it was never observed)
    pub fn get_df_frequency<S: AsRef<str>>(&self, a: S, b: S) -> Option<u32> {
        self.directly_follows_relations
            .get(&(a.as_ref().to_string(), b.as_ref().to_string()))
            .copied()
    }

    /// Elapsed time statistics of a directly-follows relation
    pub fn get_df_durations<S: AsRef<str>>(&self, a: S, b: S) -> Option<&DurationStats> {
        self.relation_durations
            .get(&(a.as_ref().to_string(), b.as_ref().to_string()))
    }

    /// Returns the ingoing activities of an activity in the directly-follows graph.
    pub fn ingoing_activities<S: AsRef<str>>(&self, activity: S) -> BTreeSet<&Activity> {
        let a = activity.as_ref();
        self.directly_follows_relations
            .keys()
            .filter_map(|(x, y)| if a == y { Some(x) } else { None })
            .collect()
    }

    /// Returns the outgoing activities of an activity in the directly-follows graph.
    pub fn outgoing_activities<S: AsRef<str>>(&self, activity: S) -> BTreeSet<&Activity> {
        let a = activity.as_ref();
        self.directly_follows_relations
            .keys()
            .filter_map(|(x, y)| if a == x { Some(y) } else { None })
            .collect()
    }

    /// Returns the ingoing directly-follows relations of an activity in the directly-follows graph.
    pub fn get_ingoing_df_relations<S: AsRef<str>>(
        &self,
        activity: S,
    ) -> BTreeSet<&(Activity, Activity)> {
        let a = activity.as_ref();
        self.directly_follows_relations
            .keys()
            .filter(|arc| arc.1 == a)
            .collect()
    }

    /// Returns the outgoing directly-follows relations of an activity in the directly-follows graph.
    pub fn get_outgoing_df_relations<S: AsRef<str>>(
        &self,
        activity: S,
    ) -> BTreeSet<&(Activity, Activity)> {
        let a = activity.as_ref();
        self.directly_follows_relations
            .keys()
            .filter(|arc| arc.0 == a)
            .collect()
    }

    /// All activity labels (sorted)
    pub fn nodes(&self) -> Vec<&Activity> {
        self.activities.keys().collect()
    }

    /// All directly-follows relations as weighted edges, sorted by source and target
    pub fn edges(&self) -> Vec<DfgEdge> {
        self.directly_follows_relations
            .iter()
            .map(|((source, target), &weight)| DfgEdge {
                source: source.clone(),
                target: target.clone(),
                weight,
                mean_duration: self
                    .relation_durations
                    .get(&(source.clone(), target.clone()))
                    .map(DurationStats::mean),
            })
            .collect()
    }

    /// Sum of all directly-follows frequencies
    ///
    /// For a graph discovered from event data this equals the number of events minus the
    /// number of cases.
    pub fn total_edge_weight(&self) -> u64 {
        self.directly_follows_relations
            .values()
            .map(|&w| u64::from(w))
            .sum()
    }

    /// Convert into a [`petgraph`] graph with activity labels as node weights and
    /// frequencies as edge weights.
    ///
    /// Nodes are inserted in sorted activity order.
    pub fn to_petgraph(&self) -> DiGraph<Activity, u32> {
        let mut graph = DiGraph::with_capacity(
            self.activities.len(),
            self.directly_follows_relations.len(),
        );
        let indices: HashMap<&str, NodeIndex> = self
            .activities
            .keys()
            .map(|a| (a.as_str(), graph.add_node(a.clone())))
            .collect();
        for ((from, to), &weight) in &self.directly_follows_relations {
            if let (Some(&f), Some(&t)) = (indices.get(from.as_str()), indices.get(to.as_str())) {
                graph.add_edge(f, t, weight);
            }
        }
        graph
    }

    #[cfg(feature = "graphviz-export")]
    /// Export directly-follows graph as a PNG image
    ///
    /// The PNG file is written to the specified filepath
    ///
    /// _Note_: This is an export method for __visualizing__ the directly-follows graph.
    ///
    /// Only available with the `graphviz-export` feature.
    pub fn export_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), std::io::Error> {
        super::image_export::export_dfg_image_png(self, None, path)
    }

    #[cfg(feature = "graphviz-export")]
    /// Export directly-follows graph as an SVG image.
    ///
    /// The SVG file is written to the specified filepath.
    ///
    /// _Note_: This is an export method for __visualizing__ the directly-follows graph.
    ///
    /// Only available with the `graphviz-export` feature.
    pub fn export_svg<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), std::io::Error> {
        super::image_export::export_dfg_image_svg(self, None, path)
    }
}
