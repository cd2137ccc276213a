//! Symptom assessment handlers.

mod engine;

pub use engine::{SubmitTurnError, SymptomAssessmentEngine, TurnContext, TurnOutcome};
