//! Command and query handlers.
//!
//! - `assessment` - The symptom interview engine
//! - `emergency` - First-aid guides and emergency call logging
//! - `records` - Timeline listing, search, edit and delete

pub mod assessment;
pub mod emergency;
pub mod records;

pub use assessment::{SubmitTurnError, SymptomAssessmentEngine, TurnContext, TurnOutcome};
pub use emergency::{
    GuideLoadError, LoadGuideCommand, LoadGuideHandler, LogEmergencyCallCommand,
    LogEmergencyCallError, LogEmergencyCallHandler, GUIDE_LOAD_FAILED,
};
pub use records::{
    DeleteRecordCommand, DeleteRecordHandler, EditRecordCommand, EditRecordHandler,
    ListTimelineHandler, ListTimelineQuery, RecordAccessError,
};
