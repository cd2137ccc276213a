//! Triage vocabulary shared by the conversation engine, the record model
//! and the emergency flow.

mod grading;
mod level;

pub use grading::{DiagnosisSeverity, Likelihood};
pub use level::TriageLevel;
