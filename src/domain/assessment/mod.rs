//! Assessment results returned by the diagnostic oracle.
//!
//! Raw model output goes through [`JsonExtractor`] and then
//! [`parse_assessment`]; only payloads that honour the contract become an
//! [`AssessmentResult`].

mod extractor;
mod result;
mod schema;

pub use extractor::{ExtractionError, JsonExtractor, MAX_RESPONSE_LENGTH};
pub use result::{
    AssessmentReport, AssessmentResult, Diagnosis, FinalAssessment, VisualAnalysis,
};
pub use schema::{parse_assessment, SchemaViolation, MIN_REASONING_CHARS};
