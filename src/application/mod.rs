//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    // Assessment
    SubmitTurnError, SymptomAssessmentEngine, TurnContext, TurnOutcome,
    // Emergency
    GuideLoadError, LoadGuideCommand, LoadGuideHandler, LogEmergencyCallCommand,
    LogEmergencyCallError, LogEmergencyCallHandler,
    // Records
    DeleteRecordCommand, DeleteRecordHandler, EditRecordCommand, EditRecordHandler,
    ListTimelineHandler, ListTimelineQuery, RecordAccessError,
};
