//! Emergency protocol handlers.

mod load_guide;
mod log_emergency_call;

pub use load_guide::{GuideLoadError, LoadGuideCommand, LoadGuideHandler, GUIDE_LOAD_FAILED};
pub use log_emergency_call::{
    LogEmergencyCallCommand, LogEmergencyCallError, LogEmergencyCallHandler,
};
