//! Diagnostic Oracle Port - Interface to the external structured-output model.
//!
//! The oracle is opaque: it receives the interview so far plus media and
//! patient context, and answers with a payload that must honour the
//! assessment contract. Adapters validate that contract before returning,
//! so callers only ever see a well-formed [`AssessmentResult`] or an
//! [`OracleError`].
//!
//! # Example
//!
//! ```ignore
//! let result = oracle.assess(AssessmentRequest {
//!     history: vec!["Patient: headache".into(), "Doctor: Since when?".into()],
//!     prompt: "two days".into(),
//!     media: vec![],
//!     language: Language::resolve("en"),
//!     patient_context: "self (34), Name: Ana".into(),
//!     session_id,
//!     round: 2,
//! }).await?;
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::assessment::{AssessmentResult, SchemaViolation};
use crate::domain::emergency::FirstAidGuide;
use crate::domain::foundation::SessionId;
use crate::domain::media::MediaPayload;
use crate::domain::patient::Language;

/// Port for the diagnostic oracle.
#[async_trait]
pub trait DiagnosticOracle: Send + Sync {
    /// Runs one interview round.
    async fn assess(&self, request: AssessmentRequest) -> Result<AssessmentResult, OracleError>;

    /// Fetches a structured first-aid procedure. Served by the fast model.
    async fn first_aid_guide(&self, request: GuideRequest) -> Result<FirstAidGuide, OracleError>;
}

/// Input for one assessment round.
#[derive(Debug, Clone)]
pub struct AssessmentRequest {
    /// Prior turns as role-prefixed lines ("Patient: ...", "Doctor: ...").
    pub history: Vec<String>,
    /// The new user input.
    pub prompt: String,
    pub media: Vec<MediaPayload>,
    pub language: Language,
    /// One-line patient description.
    pub patient_context: String,
    /// For tracing only.
    pub session_id: SessionId,
    /// For tracing only.
    pub round: u32,
}

/// Input for a first-aid guide.
#[derive(Debug, Clone)]
pub struct GuideRequest {
    pub emergency: String,
    pub language: Language,
}

/// Oracle failures.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OracleError {
    /// Rate limited by the provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable.
    #[error("oracle unavailable: {message}")]
    Unavailable { message: String },

    /// API key rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// The model returned no content.
    #[error("oracle returned an empty response")]
    EmptyResponse,

    /// The response was not parseable JSON.
    #[error("unparseable oracle response: {0}")]
    Parse(String),

    /// The response parsed but broke the contract.
    #[error("oracle contract violation: {0}")]
    ContractViolation(#[from] SchemaViolation),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl OracleError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Returns true if the same request may succeed when retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OracleError::RateLimited { .. }
                | OracleError::Unavailable { .. }
                | OracleError::Network(_)
                | OracleError::Timeout { .. }
        )
    }

    /// Returns true if the oracle answered but broke the output contract.
    /// These are logged separately from transport failures.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            OracleError::ContractViolation(_) | OracleError::Parse(_)
        )
    }
}
