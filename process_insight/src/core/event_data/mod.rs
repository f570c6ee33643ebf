//! Event Data
//!
//! Fundamental structs and adjacient utilities for process data
pub mod case_centric;
/// Parsing of timestamps in the formats commonly found in event data exports
pub mod timestamp_utils;

#[doc(inline)]
pub use case_centric::EventTable;
