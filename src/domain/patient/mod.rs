//! Patient-side context: who is being assessed and in which language.

mod context;
mod language;

pub use context::{PatientCategory, PatientContext};
pub use language::{Language, SUPPORTED_LANGUAGES};
