//! Case-centric analysis techniques

pub mod bottleneck;
pub mod case_pathways;
pub mod data_quality;
pub mod report;

#[doc(inline)]
pub use bottleneck::{analyze_bottlenecks, BottleneckAnalysis, BottleneckOptions, DurationAttribution};
#[doc(inline)]
pub use report::{analyze, AnalysisConfig, AnalysisReport};
