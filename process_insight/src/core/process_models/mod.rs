//! Process Models
//!
//! Structs for process models discovered from event data
pub mod case_centric;
