//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `triage` - Triage level and diagnosis grading vocabulary
//! - `patient` - Patient context and target language
//! - `media` - Encoded image payloads and their references
//! - `assessment` - Oracle assessment results and their contract
//! - `conversation` - The symptom interview session
//! - `record` - Health records and timeline queries
//! - `doctor` - Provider listings and search locations
//! - `emergency` - Rapid triage, first-aid guides and contacts

pub mod assessment;
pub mod conversation;
pub mod doctor;
pub mod emergency;
pub mod foundation;
pub mod media;
pub mod patient;
pub mod record;
pub mod triage;
