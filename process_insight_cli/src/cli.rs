use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::TimeDelta;
use clap::{Parser, ValueEnum};
use process_insight::{
    utils::DurationUnit, AnalysisConfig, BottleneckOptions, DurationAttribution, EventSource,
    EventTableCSVImportOptions,
};

/// `--attribution` values
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum AttributionArg {
    /// Charge the gap to the later event's activity
    Incoming,
    /// Charge the gap to the earlier event's activity
    Outgoing,
}

impl From<AttributionArg> for DurationAttribution {
    fn from(arg: AttributionArg) -> Self {
        match arg {
            AttributionArg::Incoming => DurationAttribution::Incoming,
            AttributionArg::Outgoing => DurationAttribution::Outgoing,
        }
    }
}

/// `--unit` values
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum UnitArg {
    #[value(alias = "s")]
    Seconds,
    #[value(alias = "min")]
    Minutes,
    #[value(alias = "h")]
    Hours,
    #[value(alias = "d")]
    Days,
}

impl From<UnitArg> for DurationUnit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Seconds => DurationUnit::Seconds,
            UnitArg::Minutes => DurationUnit::Minutes,
            UnitArg::Hours => DurationUnit::Hours,
            UnitArg::Days => DurationUnit::Days,
        }
    }
}

/// Discover directly-follows graphs and rank bottleneck activities in case-centric event data.
///
/// Without `--input` the built-in invoice sample is analyzed.
#[derive(Debug, Parser)]
#[command(name = "process-insight", version, about)]
pub struct Cli {
    /// Event data file (`.csv`, `.csv.gz` or `.json`)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Name of the case identifier column
    #[arg(long, default_value = "case_id")]
    pub case_column: String,

    /// Name of the activity column
    #[arg(long, default_value = "activity")]
    pub activity_column: String,

    /// Name of the timestamp column
    #[arg(long, default_value = "timestamp")]
    pub timestamp_column: String,

    /// Timestamp format tried before the built-in formats (chrono syntax, e.g. `%d.%m.%Y %H:%M`)
    #[arg(long, value_name = "FORMAT")]
    pub date_format: Option<String>,

    /// Attribute each inter-event gap to the later (incoming) or earlier (outgoing) event
    #[arg(long, value_enum, default_value_t = AttributionArg::Incoming)]
    pub attribution: AttributionArg,

    /// Leave an activity out of the bottleneck ranking (repeatable)
    #[arg(long = "exclude", value_name = "ACTIVITY")]
    pub exclude: Vec<String>,

    /// Unit for reported durations
    #[arg(long, value_enum, default_value_t = UnitArg::Hours)]
    pub unit: UnitArg,

    /// Report consecutive events closer than this many minutes
    #[arg(long, default_value_t = 1.0, value_name = "MINUTES")]
    pub short_gap_minutes: f64,

    /// Print the full report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Write the directly-follows graph as DOT source
    #[arg(long, value_name = "PATH")]
    pub dot: Option<PathBuf>,

    /// Render the directly-follows graph as SVG (requires graphviz)
    #[arg(long, value_name = "PATH")]
    pub svg: Option<PathBuf>,

    /// Render the directly-follows graph as PNG (requires graphviz)
    #[arg(long, value_name = "PATH")]
    pub png: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Where the event data is read from
    pub fn source(&self) -> EventSource {
        EventSource::from_optional_path(self.input.clone())
    }

    /// Column mapping and timestamp format for file input
    pub fn import_options(&self) -> EventTableCSVImportOptions {
        EventTableCSVImportOptions {
            case_id_column: self.case_column.clone(),
            activity_column: self.activity_column.clone(),
            timestamp_column: self.timestamp_column.clone(),
            date_format: self.date_format.clone(),
            ..Default::default()
        }
    }

    /// Analysis options from the command line flags
    pub fn analysis_config(&self) -> anyhow::Result<AnalysisConfig> {
        if !self.short_gap_minutes.is_finite() || self.short_gap_minutes < 0.0 {
            anyhow::bail!(
                "invalid --short-gap-minutes {}: expected a non-negative number",
                self.short_gap_minutes
            );
        }
        let short_gap_threshold =
            TimeDelta::milliseconds((self.short_gap_minutes * 60_000.0).round() as i64);
        Ok(AnalysisConfig {
            bottleneck: BottleneckOptions {
                attribution: self.attribution.into(),
                excluded_activities: self.exclude.iter().cloned().collect::<BTreeSet<_>>(),
                unit: self.unit.into(),
            },
            short_gap_threshold,
        })
    }
}
