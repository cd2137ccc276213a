//! Raw oracle text to validated domain payloads.
//!
//! Shared by every oracle adapter so the contract is enforced the same way
//! for live and mocked responses.

use crate::domain::assessment::{parse_assessment, AssessmentResult, ExtractionError, JsonExtractor};
use crate::domain::emergency::{parse_guide, FirstAidGuide};
use crate::ports::OracleError;

fn extract(raw: &str) -> Result<serde_json::Value, OracleError> {
    JsonExtractor::new().extract(raw).map_err(|e| match e {
        ExtractionError::Empty => OracleError::EmptyResponse,
        other => OracleError::parse(other.to_string()),
    })
}

/// Decodes an assessment response.
pub fn decode_assessment(raw: &str) -> Result<AssessmentResult, OracleError> {
    let value = extract(raw)?;
    Ok(parse_assessment(value)?)
}

/// Decodes a first-aid guide response.
pub fn decode_guide(raw: &str) -> Result<FirstAidGuide, OracleError> {
    let value = extract(raw)?;
    Ok(parse_guide(value)?)
}
