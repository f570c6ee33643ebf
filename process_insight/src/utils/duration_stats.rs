use std::fmt::Display;

use chrono::TimeDelta;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};

///
/// Running aggregate over a non-empty set of durations
///
/// Durations are serialized as milliseconds.
///
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DurationStats {
    /// Number of samples
    pub count: u32,
    /// Sum of all samples
    #[serde_as(as = "DurationMilliSeconds<i64>")]
    #[schemars(with = "i64")]
    pub total: TimeDelta,
    /// Shortest sample
    #[serde_as(as = "DurationMilliSeconds<i64>")]
    #[schemars(with = "i64")]
    pub min: TimeDelta,
    /// Longest sample
    #[serde_as(as = "DurationMilliSeconds<i64>")]
    #[schemars(with = "i64")]
    pub max: TimeDelta,
}

impl DurationStats {
    /// Start an aggregate from its first sample
    pub fn new(sample: TimeDelta) -> Self {
        Self {
            count: 1,
            total: sample,
            min: sample,
            max: sample,
        }
    }

    /// Add a sample
    ///
    /// `count` and `total` saturate instead of overflowing.
    pub fn add_sample(&mut self, sample: TimeDelta) {
        self.count = self.count.saturating_add(1);
        self.total = self.total.checked_add(&sample).unwrap_or(if sample < TimeDelta::zero() {
            TimeDelta::MIN
        } else {
            TimeDelta::MAX
        });
        self.min = self.min.min(sample);
        self.max = self.max.max(sample);
    }

    /// Arithmetic mean, truncated to whole milliseconds
    pub fn mean(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.total.num_milliseconds() / i64::from(self.count))
    }

    /// Arithmetic mean expressed in `unit`
    pub fn mean_in(&self, unit: DurationUnit) -> f64 {
        unit.convert(self.total) / f64::from(self.count)
    }
}

/// Unit used when presenting durations as numbers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    /// Seconds
    Seconds,
    /// Minutes
    Minutes,
    /// Hours
    #[default]
    Hours,
    /// Days (of 24 hours)
    Days,
}

impl DurationUnit {
    /// Convert a duration into a (fractional) number of this unit
    pub fn convert(&self, duration: TimeDelta) -> f64 {
        let seconds = duration.num_milliseconds() as f64 / 1000.0;
        match self {
            DurationUnit::Seconds => seconds,
            DurationUnit::Minutes => seconds / 60.0,
            DurationUnit::Hours => seconds / 3600.0,
            DurationUnit::Days => seconds / 86400.0,
        }
    }

    /// Short suffix for display (`s`, `min`, `h`, `d`)
    pub fn suffix(&self) -> &'static str {
        match self {
            DurationUnit::Seconds => "s",
            DurationUnit::Minutes => "min",
            DurationUnit::Hours => "h",
            DurationUnit::Days => "d",
        }
    }
}

impl Display for DurationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DurationUnit::Seconds => "seconds",
            DurationUnit::Minutes => "minutes",
            DurationUnit::Hours => "hours",
            DurationUnit::Days => "days",
        };
        f.write_str(s)
    }
}
