//! Case-centric process models

/// Directly-follows graphs
pub mod dfg;
