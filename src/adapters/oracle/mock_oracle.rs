//! Mock diagnostic oracle for testing.
//!
//! Queued responses are raw model text and go through the same decoder as
//! the live adapter, so contract violations can be exercised end to end.
//!
//! # Example
//!
//! ```ignore
//! let oracle = MockOracle::new()
//!     .with_assessment(r#"{"status":"in_progress","nextQuestion":"Since when?"}"#)
//!     .with_assessment_error(OracleError::network("reset"));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

use super::decode::{decode_assessment, decode_guide};
use crate::domain::assessment::AssessmentResult;
use crate::domain::emergency::FirstAidGuide;
use crate::ports::{AssessmentRequest, DiagnosticOracle, GuideRequest, OracleError};

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Raw model text, decoded on use.
    Raw(String),
    Error(OracleError),
}

/// Mock oracle with separate queues for assessments and guides.
#[derive(Debug, Clone, Default)]
pub struct MockOracle {
    assessments: Arc<Mutex<VecDeque<MockReply>>>,
    guides: Arc<Mutex<VecDeque<MockReply>>>,
    assess_calls: Arc<Mutex<Vec<AssessmentRequest>>>,
    guide_calls: Arc<Mutex<Vec<GuideRequest>>>,
    /// When set, every call waits for one notification before answering.
    gate: Option<Arc<Notify>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues raw assessment text.
    pub fn with_assessment(self, raw: impl Into<String>) -> Self {
        lock(&self.assessments).push_back(MockReply::Raw(raw.into()));
        self
    }

    /// Queues an assessment value, serialized to text.
    pub fn with_assessment_json(self, value: serde_json::Value) -> Self {
        self.with_assessment(value.to_string())
    }

    pub fn with_assessment_error(self, error: OracleError) -> Self {
        lock(&self.assessments).push_back(MockReply::Error(error));
        self
    }

    pub fn with_guide(self, raw: impl Into<String>) -> Self {
        lock(&self.guides).push_back(MockReply::Raw(raw.into()));
        self
    }

    pub fn with_guide_error(self, error: OracleError) -> Self {
        lock(&self.guides).push_back(MockReply::Error(error));
        self
    }

    /// Holds every call until the returned handle is notified once.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn assess_call_count(&self) -> usize {
        lock(&self.assess_calls).len()
    }

    pub fn assess_calls(&self) -> Vec<AssessmentRequest> {
        lock(&self.assess_calls).clone()
    }

    pub fn guide_calls(&self) -> Vec<GuideRequest> {
        lock(&self.guide_calls).clone()
    }

    async fn wait(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl DiagnosticOracle for MockOracle {
    async fn assess(&self, request: AssessmentRequest) -> Result<AssessmentResult, OracleError> {
        lock(&self.assess_calls).push(request);
        self.wait().await;

        // An exhausted queue behaves like a model that answered nothing.
        let reply = lock(&self.assessments).pop_front();
        match reply {
            Some(MockReply::Raw(raw)) => decode_assessment(&raw),
            Some(MockReply::Error(err)) => Err(err),
            None => Err(OracleError::EmptyResponse),
        }
    }

    async fn first_aid_guide(&self, request: GuideRequest) -> Result<FirstAidGuide, OracleError> {
        lock(&self.guide_calls).push(request);
        self.wait().await;

        let reply = lock(&self.guides).pop_front();
        match reply {
            Some(MockReply::Raw(raw)) => decode_guide(&raw),
            Some(MockReply::Error(err)) => Err(err),
            None => Err(OracleError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::patient::Language;

    fn request() -> AssessmentRequest {
        AssessmentRequest {
            history: vec![],
            prompt: "headache".to_string(),
            media: vec![],
            language: Language::ENGLISH,
            patient_context: String::new(),
            session_id: SessionId::new(),
            round: 1,
        }
    }

    #[tokio::test]
    async fn replies_in_order() {
        let oracle = MockOracle::new()
            .with_assessment(r#"{"status":"in_progress","nextQuestion":"Since when?"}"#)
            .with_assessment_error(OracleError::network("reset"));

        assert!(!oracle.assess(request()).await.unwrap().is_complete());
        assert_eq!(
            oracle.assess(request()).await,
            Err(OracleError::network("reset"))
        );
        assert_eq!(oracle.assess(request()).await, Err(OracleError::EmptyResponse));
        assert_eq!(oracle.assess_call_count(), 3);
    }

    #[tokio::test]
    async fn queued_text_is_validated() {
        let oracle = MockOracle::new().with_assessment(r#"{"status":"maybe","disclaimer":"x"}"#);
        let err = oracle.assess(request()).await.unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[tokio::test]
    async fn records_guide_calls() {
        let oracle = MockOracle::new().with_guide_error(OracleError::unavailable("503"));
        let result = oracle
            .first_aid_guide(GuideRequest {
                emergency: "Burns".to_string(),
                language: Language::ENGLISH,
            })
            .await;
        assert!(result.is_err());
        assert_eq!(oracle.guide_calls()[0].emergency, "Burns");
    }

    #[tokio::test]
    async fn gate_holds_until_notified() {
        let (oracle, gate) = MockOracle::new()
            .with_assessment(r#"{"status":"in_progress"}"#)
            .gated();
        let task = {
            let oracle = oracle.clone();
            tokio::spawn(async move { oracle.assess(request()).await })
        };
        tokio::task::yield_now().await;
        assert!(!task.is_finished());
        gate.notify_one();
        assert!(task.await.unwrap().is_ok());
    }
}
