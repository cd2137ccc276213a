//! Gemini-backed diagnostic oracle.
//!
//! Assessments run on the complex model with a thinking budget and the
//! full response schema. Guides run on the fast model without thinking.
//! Both responses pass through the shared decoder before they reach the
//! caller.

use async_trait::async_trait;
use std::sync::Arc;

use super::decode::{decode_assessment, decode_guide};
use super::gemini_client::{GeminiClient, GenerateContentRequest, Part};
use super::prompts;
use crate::domain::assessment::AssessmentResult;
use crate::domain::emergency::FirstAidGuide;
use crate::ports::{AssessmentRequest, DiagnosticOracle, GuideRequest, OracleError};

/// Diagnostic oracle over the Gemini API.
pub struct GeminiOracle {
    client: Arc<GeminiClient>,
}

impl GeminiOracle {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }

    fn assessment_request(&self, request: &AssessmentRequest) -> GenerateContentRequest {
        // Images first, then the text part.
        let mut parts: Vec<Part> = request.media.iter().map(Part::media).collect();
        parts.push(Part::text(prompts::assessment_prompt(
            &request.history,
            &request.prompt,
            &request.language,
        )));

        GenerateContentRequest::json(
            prompts::assessment_instruction(&request.patient_context, &request.language),
            parts,
        )
        .with_response_schema(prompts::assessment_schema())
        .with_thinking_budget(self.client.config().thinking_budget)
    }

    fn guide_request(&self, request: &GuideRequest) -> GenerateContentRequest {
        GenerateContentRequest::json(
            prompts::guide_instruction(&request.emergency, &request.language),
            vec![Part::text(prompts::GUIDE_USER_TEXT)],
        )
        .with_response_schema(prompts::guide_schema())
    }
}

#[async_trait]
impl DiagnosticOracle for GeminiOracle {
    async fn assess(&self, request: AssessmentRequest) -> Result<AssessmentResult, OracleError> {
        let model = &self.client.config().complex_model;
        tracing::debug!(
            session_id = %request.session_id,
            round = request.round,
            media = request.media.len(),
            model = %model,
            "sending assessment round"
        );

        let body = self.assessment_request(&request);
        let raw = self.client.generate(model, &body).await?;
        decode_assessment(&raw)
    }

    async fn first_aid_guide(&self, request: GuideRequest) -> Result<FirstAidGuide, OracleError> {
        let model = &self.client.config().fast_model;
        tracing::debug!(emergency = %request.emergency, model = %model, "requesting first-aid guide");

        let body = self.guide_request(&request);
        let raw = self.client.generate(model, &body).await?;
        decode_guide(&raw)
    }
}
