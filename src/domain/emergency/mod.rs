//! Emergency protocol: rapid triage, first-aid guides and contacts.

mod catalog;
mod contacts;
mod flow;
mod guide;

pub use catalog::{
    find_emergency, CommonEmergency, TriageQuestion, COMMON_EMERGENCIES, EMERGENCY_NUMBER,
    TRIAGE_QUESTIONS,
};
pub use contacts::{EmergencyContact, EmergencyContacts};
pub use flow::{EmergencyFlow, EmergencyMode, TriageOutcome};
pub use guide::{
    parse_guide, FirstAidGuide, GuideSeverity, GuideStep, GuideWalkthrough, StepTimer,
};
