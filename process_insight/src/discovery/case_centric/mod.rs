//! Discovery on case-centric event data
pub mod dfg;
