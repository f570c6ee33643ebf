//! Process Analysis
//!
//! This module contains techniques related to the analysis of event data or other process artifacts.

pub mod case_centric;
