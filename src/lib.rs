//! Care Sherpa - personal health assistant core
//!
//! Drives a multi-turn symptom interview against a diagnostic oracle,
//! turns finalized assessments into timeline records, looks up nearby
//! specialists, and runs the emergency triage and first-aid flows.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
