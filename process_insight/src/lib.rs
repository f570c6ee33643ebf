#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]
#![doc = include_str!("../README.md")]

pub mod core;

pub mod discovery;

pub mod analysis;

/// Util module with smaller helper functions, structs or enums
pub mod utils;

#[cfg(test)]
pub use utils::test_utils;

#[doc(inline)]
pub use crate::core::{
    event_data::case_centric::{Case, Event, EventTable, EventTableError},
    io::{Exportable, Importable},
    process_models::case_centric::dfg::DirectlyFollowsGraph,
};

#[doc(inline)]
pub use crate::core::event_data::case_centric::csv_import::{
    import_event_table_csv, import_event_table_csv_with_options, EventTableCSVImportOptions,
};

#[doc(inline)]
pub use crate::core::event_data::case_centric::json_import::{
    import_event_table_json, import_event_table_json_with_options,
};

#[doc(inline)]
pub use crate::core::event_data::case_centric::source::{sample_event_table, EventSource};

#[doc(inline)]
pub use discovery::case_centric::dfg::discover_dfg;

#[doc(inline)]
pub use analysis::case_centric::{
    analyze, analyze_bottlenecks, AnalysisConfig, AnalysisReport, BottleneckAnalysis,
    BottleneckOptions, DurationAttribution,
};

#[doc(inline)]
pub use crate::core::process_models::case_centric::dfg::image_export::export_dfg_to_dot;

#[cfg(feature = "graphviz-export")]
#[doc(inline)]
pub use crate::core::process_models::case_centric::dfg::image_export::export_dfg_image_png;

#[cfg(feature = "graphviz-export")]
#[doc(inline)]
pub use crate::core::process_models::case_centric::dfg::image_export::export_dfg_image_svg;
