//! SymptomAssessmentEngine - drives the multi-turn symptom interview.
//!
//! Each submission runs one oracle round:
//!
//! 1. The session validates the submission and appends the user turn
//! 2. The oracle is called without holding the session lock
//! 3. The answer is applied to the session, unless a reset made it stale
//! 4. A finalized assessment becomes a symptom record in the store
//! 5. A recommended specialist triggers a detached lookup whose result is
//!    merged into the session display state
//!
//! Oracle failures never unwind the session: they append one retry turn
//! and the next submission is accepted.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::domain::assessment::FinalAssessment;
use crate::domain::conversation::{
    AssessmentSession, PendingRound, RoundResolution, SessionError, SessionSnapshot,
    SpecialistStatus, CLARIFYING_QUESTION, MANUAL_ENTRY_MESSAGE, RETRY_MESSAGE,
};
use crate::domain::doctor::Location;
use crate::domain::foundation::{SessionId, ValidationError};
use crate::domain::media::{MediaPayload, MediaRef};
use crate::domain::patient::{Language, PatientContext};
use crate::domain::record::HealthRecord;
use crate::ports::{
    AssessmentRequest, DiagnosticOracle, LookupRequest, MediaError, MediaNormalizer, OracleError,
    RecordStore, SpecialistLookup,
};

/// Per-call ambient context: who the patient is, which language to answer
/// in and where to look for specialists.
#[derive(Debug, Clone)]
pub struct TurnContext {
    pub patient: PatientContext,
    pub language: Language,
    pub location: Location,
}

impl TurnContext {
    pub fn new(patient: PatientContext, language: Language) -> Self {
        Self {
            patient,
            language,
            location: Location::near_me(),
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

/// Errors that reject a submission before the oracle is called.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubmitTurnError {
    /// Neither text nor attachments were supplied.
    #[error("Validation error: submission needs text or an attachment")]
    EmptySubmission,

    /// A round is already awaiting the oracle.
    #[error("A submission is already in progress for this session")]
    SubmissionInFlight,

    /// The patient differs from the one the interview is about.
    #[error("Patient changed during an ongoing interview; reset first")]
    PatientChanged,

    /// The finalized assessment could not become a record.
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] ValidationError),
}

impl From<SessionError> for SubmitTurnError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::EmptySubmission => SubmitTurnError::EmptySubmission,
            SessionError::SubmissionInFlight => SubmitTurnError::SubmissionInFlight,
            SessionError::PatientChanged => SubmitTurnError::PatientChanged,
        }
    }
}

/// What one submission produced.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The oracle asked a follow-up question.
    Question(String),

    /// The interview concluded.
    Finalized {
        assessment: FinalAssessment,
        record: HealthRecord,
        /// False if the record store rejected the record.
        persisted: bool,
        /// Detached specialist lookup, if a specialist was recommended.
        specialist_lookup: Option<JoinHandle<()>>,
    },

    /// A completion had nothing to summarize; a clarifying question was
    /// asked instead.
    Clarifying {
        question: String,
        empty_completions: u32,
    },

    /// Repeated empty completions; the user should enter the record by hand.
    Abandoned { message: String },

    /// The oracle failed or broke its contract. The session accepts a retry.
    Failed { message: String, error: OracleError },

    /// The session was reset while the oracle was working; the answer was
    /// dropped.
    Discarded,
}

impl TurnOutcome {
    /// Assistant text to show for this outcome, if any.
    pub fn assistant_text(&self) -> Option<&str> {
        match self {
            TurnOutcome::Question(q) => Some(q),
            TurnOutcome::Finalized { assessment, .. } => Some(&assessment.summary),
            TurnOutcome::Clarifying { question, .. } => Some(question),
            TurnOutcome::Abandoned { message } | TurnOutcome::Failed { message, .. } => {
                Some(message)
            }
            TurnOutcome::Discarded => None,
        }
    }
}

/// Conversation engine for one assessment session.
pub struct SymptomAssessmentEngine<O, S, L>
where
    O: DiagnosticOracle,
    S: RecordStore,
    L: SpecialistLookup,
{
    oracle: Arc<O>,
    store: Arc<S>,
    lookup: Arc<L>,
    session: Arc<Mutex<AssessmentSession>>,
}

impl<O, S, L> SymptomAssessmentEngine<O, S, L>
where
    O: DiagnosticOracle + 'static,
    S: RecordStore + 'static,
    L: SpecialistLookup + 'static,
{
    pub fn new(oracle: Arc<O>, store: Arc<S>, lookup: Arc<L>) -> Self {
        Self::with_session(oracle, store, lookup, AssessmentSession::new())
    }

    /// Creates an engine around a preconfigured session.
    pub fn with_session(
        oracle: Arc<O>,
        store: Arc<S>,
        lookup: Arc<L>,
        session: AssessmentSession,
    ) -> Self {
        Self {
            oracle,
            store,
            lookup,
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Submits one user turn and runs the oracle round for it.
    ///
    /// # Errors
    ///
    /// Only input errors are returned; oracle failures are reported as
    /// [`TurnOutcome::Failed`].
    pub async fn submit_turn(
        &self,
        text: &str,
        attachments: Vec<MediaPayload>,
        ctx: &TurnContext,
    ) -> Result<TurnOutcome, SubmitTurnError> {
        let pending = self
            .session
            .lock()
            .await
            .begin_turn(text, attachments, &ctx.patient)?;

        tracing::debug!(
            session_id = %pending.session_id,
            round = pending.round,
            profile_id = %pending.patient.profile_id,
            media = pending.media.len(),
            "submitting assessment round"
        );

        let request = AssessmentRequest {
            history: pending.history.clone(),
            prompt: pending.prompt.clone(),
            media: pending.media.clone(),
            language: ctx.language,
            patient_context: pending.patient.to_prompt_line(),
            session_id: pending.session_id,
            round: pending.round,
        };

        match self.oracle.assess(request).await {
            Ok(result) => {
                let resolution = self
                    .session
                    .lock()
                    .await
                    .resolve_round(pending.generation, result);
                match resolution {
                    Some(resolution) => self.apply(resolution, &pending, ctx).await,
                    None => Ok(self.discarded(&pending)),
                }
            }
            Err(error) => {
                if error.is_contract_violation() {
                    tracing::error!(
                        session_id = %pending.session_id,
                        round = pending.round,
                        error = %error,
                        "oracle contract violation"
                    );
                } else {
                    tracing::warn!(
                        session_id = %pending.session_id,
                        round = pending.round,
                        error = %error,
                        "oracle call failed"
                    );
                }

                let failed = self.session.lock().await.fail_round(pending.generation);
                match failed {
                    Some(_) => Ok(TurnOutcome::Failed {
                        message: RETRY_MESSAGE.to_string(),
                        error,
                    }),
                    None => Ok(self.discarded(&pending)),
                }
            }
        }
    }

    async fn apply(
        &self,
        resolution: RoundResolution,
        pending: &PendingRound,
        ctx: &TurnContext,
    ) -> Result<TurnOutcome, SubmitTurnError> {
        match resolution {
            RoundResolution::Question(question) => Ok(TurnOutcome::Question(question)),
            RoundResolution::Demoted { empty_completions } => {
                tracing::warn!(
                    session_id = %pending.session_id,
                    round = pending.round,
                    empty_completions,
                    "completion without summary or differential, asking again"
                );
                Ok(TurnOutcome::Clarifying {
                    question: CLARIFYING_QUESTION.to_string(),
                    empty_completions,
                })
            }
            RoundResolution::Abandoned => {
                tracing::info!(
                    session_id = %pending.session_id,
                    round = pending.round,
                    "interview abandoned after repeated empty completions"
                );
                Ok(TurnOutcome::Abandoned {
                    message: MANUAL_ENTRY_MESSAGE.to_string(),
                })
            }
            RoundResolution::Failed => Ok(TurnOutcome::Failed {
                message: RETRY_MESSAGE.to_string(),
                error: OracleError::EmptyResponse,
            }),
            RoundResolution::Finalized { assessment, media } => {
                self.finalize(assessment, media, pending, ctx).await
            }
        }
    }

    async fn finalize(
        &self,
        assessment: FinalAssessment,
        media: Vec<MediaRef>,
        pending: &PendingRound,
        ctx: &TurnContext,
    ) -> Result<TurnOutcome, SubmitTurnError> {
        let profile_id = pending.patient.profile_id.clone();
        let record = HealthRecord::from_assessment(profile_id, &assessment, media)?;

        let persisted = match self.store.append(&record).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(
                    session_id = %pending.session_id,
                    record_id = %record.id(),
                    error = %err,
                    "failed to persist assessment record"
                );
                false
            }
        };

        tracing::info!(
            session_id = %pending.session_id,
            round = pending.round,
            profile_id = %record.profile_id(),
            record_id = %record.id(),
            triage_level = %assessment.triage_level,
            persisted,
            "assessment finalized"
        );

        let specialist_lookup = assessment
            .recommended_specialist
            .clone()
            .map(|specialty| self.spawn_lookup(specialty, pending, ctx));

        Ok(TurnOutcome::Finalized {
            assessment,
            record,
            persisted,
            specialist_lookup,
        })
    }

    fn spawn_lookup(
        &self,
        specialty: String,
        pending: &PendingRound,
        ctx: &TurnContext,
    ) -> JoinHandle<()> {
        let lookup = Arc::clone(&self.lookup);
        let session = Arc::clone(&self.session);
        let generation = pending.generation;
        let session_id = pending.session_id;
        let request = LookupRequest {
            specialty: specialty.clone(),
            location: ctx.location.clone(),
            language: ctx.language,
        };

        tokio::spawn(async move {
            let status = match lookup.find_nearby(request).await {
                Ok(listings) => {
                    tracing::debug!(%session_id, %specialty, count = listings.len(), "specialist lookup done");
                    SpecialistStatus::Ready {
                        specialty,
                        listings,
                    }
                }
                Err(err) => {
                    tracing::warn!(%session_id, %specialty, error = %err, "specialist lookup failed");
                    SpecialistStatus::Unavailable { specialty }
                }
            };

            if !session.lock().await.merge_specialist(generation, status) {
                tracing::debug!(%session_id, "stale specialist lookup dropped");
            }
        })
    }

    fn discarded(&self, pending: &PendingRound) -> TurnOutcome {
        tracing::debug!(
            session_id = %pending.session_id,
            round = pending.round,
            "session reset during oracle call, answer dropped"
        );
        TurnOutcome::Discarded
    }

    /// Stages an already-encoded attachment for the next turn.
    pub async fn stage_attachment(&self, payload: MediaPayload) -> MediaRef {
        let reference = payload.reference().clone();
        self.session.lock().await.stage_attachment(payload);
        reference
    }

    /// Normalizes raw image bytes and stages the result for the next turn.
    pub async fn stage_image<N>(&self, normalizer: &N, bytes: &[u8]) -> Result<MediaRef, MediaError>
    where
        N: MediaNormalizer + ?Sized,
    {
        let payload = normalizer.normalize(bytes)?;
        Ok(self.stage_attachment(payload).await)
    }

    /// Clears the interview. A round in flight is dropped when it returns.
    pub async fn reset(&self) {
        let mut session = self.session.lock().await;
        session.reset();
        tracing::info!(session_id = %session.id(), "session reset");
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    pub async fn session_id(&self) -> SessionId {
        self.session.lock().await.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryRecordStore, MockOracle, MockSpecialistLookup};
    use crate::domain::conversation::SessionStatus;
    use crate::domain::doctor::DoctorListing;
    use crate::domain::foundation::ProfileId;
    use crate::domain::patient::PatientCategory;
    use crate::domain::triage::TriageLevel;
    use crate::ports::LookupError;
    use serde_json::json;

    type Engine = SymptomAssessmentEngine<MockOracle, InMemoryRecordStore, MockSpecialistLookup>;

    fn patient(id: &str) -> PatientContext {
        PatientContext::new(ProfileId::new(id).unwrap(), "Ana", PatientCategory::SelfCare).unwrap()
    }

    fn ctx() -> TurnContext {
        TurnContext::new(patient("p-1"), Language::ENGLISH)
    }

    fn engine(
        oracle: MockOracle,
        lookup: MockSpecialistLookup,
    ) -> (Engine, InMemoryRecordStore) {
        let store = InMemoryRecordStore::new();
        let engine = SymptomAssessmentEngine::new(
            Arc::new(oracle),
            Arc::new(store.clone()),
            Arc::new(lookup),
        );
        (engine, store)
    }

    fn question(q: &str) -> serde_json::Value {
        json!({"status": "in_progress", "nextQuestion": q})
    }

    fn complete(summary: Option<&str>, specialist: Option<&str>) -> serde_json::Value {
        let mut value = json!({
            "status": "complete",
            "detailedAnalysis": "Likely contact dermatitis from a new detergent.",
            "differentialDiagnosis": [{
                "condition": "Contact dermatitis",
                "likelihood": "High",
                "reasoning": "Localized itchy rash after a new exposure.",
                "severity": "Low",
                "action": "Avoid the trigger"
            }],
            "triageLevel": "Medium",
            "confidenceScore": 80,
            "disclaimer": "Not a medical diagnosis."
        });
        if let Some(summary) = summary {
            value["summary"] = json!(summary);
        }
        if let Some(specialist) = specialist {
            value["recommendedSpecialist"] = json!(specialist);
        }
        value
    }

    mod interview {
        use super::*;

        #[tokio::test]
        async fn question_appends_two_turns_and_no_record() {
            let (engine, store) = engine(
                MockOracle::new().with_assessment_json(question("Since when?")),
                MockSpecialistLookup::new(),
            );

            let outcome = engine.submit_turn("itchy rash", vec![], &ctx()).await.unwrap();

            assert!(matches!(outcome, TurnOutcome::Question(ref q) if q == "Since when?"));
            let snapshot = engine.snapshot().await;
            assert_eq!(snapshot.turns.len(), 2);
            assert_eq!(snapshot.status, SessionStatus::InProgress);
            assert!(store.is_empty().await);
        }

        #[tokio::test]
        async fn history_excludes_the_new_prompt() {
            let oracle = MockOracle::new()
                .with_assessment_json(question("Since when?"))
                .with_assessment_json(question("Any fever?"));
            let (engine, _) = engine(oracle.clone(), MockSpecialistLookup::new());

            engine.submit_turn("rash", vec![], &ctx()).await.unwrap();
            engine.submit_turn("two days", vec![], &ctx()).await.unwrap();

            let calls = oracle.assess_calls();
            assert!(calls[0].history.is_empty());
            assert_eq!(
                calls[1].history,
                vec!["Patient: rash".to_string(), "Doctor: Since when?".to_string()]
            );
            assert_eq!(calls[1].prompt, "two days");
            assert_eq!(calls[1].round, 2);
            assert_eq!(calls[1].patient_context, "self (?), Name: Ana");
        }

        #[tokio::test]
        async fn empty_submission_is_rejected_locally() {
            let oracle = MockOracle::new();
            let (engine, _) = engine(oracle.clone(), MockSpecialistLookup::new());

            let err = engine.submit_turn("   ", vec![], &ctx()).await.unwrap_err();

            assert_eq!(err, SubmitTurnError::EmptySubmission);
            assert_eq!(oracle.assess_call_count(), 0);
        }

        #[tokio::test]
        async fn staged_attachment_alone_is_a_valid_submission() {
            let oracle = MockOracle::new().with_assessment_json(question("Where is it?"));
            let (engine, _) = engine(oracle.clone(), MockSpecialistLookup::new());

            let reference = engine.stage_attachment(MediaPayload::jpeg("AAAA")).await;
            engine.submit_turn("", vec![], &ctx()).await.unwrap();

            let snapshot = engine.snapshot().await;
            assert_eq!(snapshot.pending_attachments, 0);
            assert_eq!(snapshot.turns[0].media(), &[reference]);
            assert_eq!(oracle.assess_calls()[0].media.len(), 1);
        }

        #[tokio::test]
        async fn patient_change_mid_interview_is_rejected() {
            let (engine, _) = engine(
                MockOracle::new().with_assessment_json(question("Since when?")),
                MockSpecialistLookup::new(),
            );
            engine.submit_turn("rash", vec![], &ctx()).await.unwrap();

            let other = TurnContext::new(patient("p-2"), Language::ENGLISH);
            let err = engine.submit_turn("fever", vec![], &other).await.unwrap_err();

            assert_eq!(err, SubmitTurnError::PatientChanged);
        }
    }

    mod finalize {
        use super::*;

        #[tokio::test]
        async fn complete_with_summary_emits_one_record() {
            let (engine, store) = engine(
                MockOracle::new().with_assessment_json(complete(Some("Contact dermatitis"), None)),
                MockSpecialistLookup::new(),
            );

            let outcome = engine.submit_turn("rash", vec![], &ctx()).await.unwrap();

            let TurnOutcome::Finalized {
                record,
                persisted,
                specialist_lookup,
                ..
            } = outcome
            else {
                panic!("expected finalized outcome");
            };
            assert!(persisted);
            assert!(specialist_lookup.is_none());
            assert_eq!(record.summary(), "Contact dermatitis");
            assert_eq!(record.triage_level(), Some(TriageLevel::Medium));

            let stored = store
                .list_by_profile(&ProfileId::new("p-1").unwrap())
                .await
                .unwrap();
            assert_eq!(stored.len(), 1);
            assert_eq!(engine.snapshot().await.status, SessionStatus::Complete);
        }

        #[tokio::test]
        async fn missing_summary_uses_top_condition() {
            let (engine, _) = engine(
                MockOracle::new().with_assessment_json(complete(None, None)),
                MockSpecialistLookup::new(),
            );

            let outcome = engine.submit_turn("rash", vec![], &ctx()).await.unwrap();

            let TurnOutcome::Finalized { record, .. } = outcome else {
                panic!("expected finalized outcome");
            };
            assert_eq!(record.summary(), "Contact dermatitis");
        }

        #[tokio::test]
        async fn empty_completion_is_demoted() {
            let empty = json!({"status": "complete", "disclaimer": "Not a diagnosis."});
            let (engine, store) = engine(
                MockOracle::new().with_assessment_json(empty),
                MockSpecialistLookup::new(),
            );

            let outcome = engine.submit_turn("rash", vec![], &ctx()).await.unwrap();

            assert!(matches!(
                outcome,
                TurnOutcome::Clarifying { empty_completions: 1, .. }
            ));
            let snapshot = engine.snapshot().await;
            assert_eq!(snapshot.status, SessionStatus::InProgress);
            assert_eq!(snapshot.turns[1].text(), CLARIFYING_QUESTION);
            assert!(store.is_empty().await);
        }

        #[tokio::test]
        async fn repeated_empty_completions_abandon() {
            let empty = json!({"status": "complete", "disclaimer": "Not a diagnosis."});
            let oracle = MockOracle::new()
                .with_assessment_json(empty.clone())
                .with_assessment_json(empty.clone())
                .with_assessment_json(empty);
            let (engine, _) = engine(oracle, MockSpecialistLookup::new());

            engine.submit_turn("a", vec![], &ctx()).await.unwrap();
            engine.submit_turn("b", vec![], &ctx()).await.unwrap();
            let outcome = engine.submit_turn("c", vec![], &ctx()).await.unwrap();

            assert!(matches!(outcome, TurnOutcome::Abandoned { .. }));
            assert_eq!(engine.snapshot().await.status, SessionStatus::Abandoned);
        }

        #[tokio::test]
        async fn store_failure_still_finalizes() {
            let (engine, store) = engine(
                MockOracle::new().with_assessment_json(complete(Some("Dermatitis"), None)),
                MockSpecialistLookup::new(),
            );
            store.fail_writes(true);

            let outcome = engine.submit_turn("rash", vec![], &ctx()).await.unwrap();

            assert!(matches!(outcome, TurnOutcome::Finalized { persisted: false, .. }));
            assert_eq!(engine.snapshot().await.status, SessionStatus::Complete);
        }

        #[tokio::test]
        async fn next_submission_after_complete_starts_fresh() {
            let oracle = MockOracle::new()
                .with_assessment_json(complete(Some("Dermatitis"), None))
                .with_assessment_json(question("New problem?"));
            let (engine, _) = engine(oracle.clone(), MockSpecialistLookup::new());

            engine.submit_turn("rash", vec![], &ctx()).await.unwrap();
            engine.submit_turn("headache", vec![], &ctx()).await.unwrap();

            let snapshot = engine.snapshot().await;
            assert_eq!(snapshot.turns.len(), 2);
            assert!(snapshot.assessment.is_none());
            assert!(oracle.assess_calls()[1].history.is_empty());
        }
    }

    mod specialist {
        use super::*;

        #[tokio::test]
        async fn lookup_result_is_merged() {
            let lookup = MockSpecialistLookup::new()
                .with_listings(vec![DoctorListing::new("Skin Clinic", "1 Main St")]);
            let (engine, _) = engine(
                MockOracle::new()
                    .with_assessment_json(complete(Some("Dermatitis"), Some("Dermatologist"))),
                lookup.clone(),
            );

            let outcome = engine.submit_turn("rash", vec![], &ctx()).await.unwrap();
            let TurnOutcome::Finalized {
                specialist_lookup: Some(handle),
                ..
            } = outcome
            else {
                panic!("expected a specialist lookup");
            };
            handle.await.unwrap();

            match engine.snapshot().await.specialist {
                SpecialistStatus::Ready { specialty, listings } => {
                    assert_eq!(specialty, "Dermatologist");
                    assert_eq!(listings.len(), 1);
                }
                other => panic!("unexpected specialist status {:?}", other),
            }
            assert_eq!(lookup.calls()[0].location, Location::near_me());
        }

        #[tokio::test]
        async fn status_is_pending_while_lookup_runs() {
            let lookup = MockSpecialistLookup::new()
                .with_listings(vec![DoctorListing::new("Skin Clinic", "1 Main St")])
                .with_delay(std::time::Duration::from_millis(50));
            let (engine, _) = engine(
                MockOracle::new()
                    .with_assessment_json(complete(Some("Dermatitis"), Some("Dermatologist"))),
                lookup,
            );

            let outcome = engine.submit_turn("rash", vec![], &ctx()).await.unwrap();
            assert_eq!(
                engine.snapshot().await.specialist,
                SpecialistStatus::Pending {
                    specialty: "Dermatologist".to_string()
                }
            );

            let TurnOutcome::Finalized {
                specialist_lookup: Some(handle),
                ..
            } = outcome
            else {
                panic!("expected a specialist lookup");
            };
            handle.await.unwrap();
            assert!(matches!(
                engine.snapshot().await.specialist,
                SpecialistStatus::Ready { .. }
            ));
        }

        #[tokio::test]
        async fn lookup_failure_keeps_record() {
            let lookup = MockSpecialistLookup::new()
                .with_error(LookupError::Network("reset".to_string()));
            let (engine, store) = engine(
                MockOracle::new()
                    .with_assessment_json(complete(Some("Dermatitis"), Some("Dermatologist"))),
                lookup,
            );

            let outcome = engine.submit_turn("rash", vec![], &ctx()).await.unwrap();
            let TurnOutcome::Finalized {
                record,
                specialist_lookup: Some(handle),
                ..
            } = outcome
            else {
                panic!("expected a specialist lookup");
            };
            handle.await.unwrap();

            assert!(matches!(
                engine.snapshot().await.specialist,
                SpecialistStatus::Unavailable { .. }
            ));
            let stored = store.find(record.id()).await.unwrap().unwrap();
            assert_eq!(stored, record);
        }
    }

    mod failures {
        use super::*;

        #[tokio::test]
        async fn oracle_failure_appends_one_retry_turn() {
            let oracle = MockOracle::new()
                .with_assessment_json(question("Since when?"))
                .with_assessment_error(OracleError::network("reset"))
                .with_assessment_json(question("Any fever?"));
            let (engine, _) = engine(oracle, MockSpecialistLookup::new());

            engine.submit_turn("rash", vec![], &ctx()).await.unwrap();
            let before = engine.snapshot().await.turns;

            let outcome = engine.submit_turn("two days", vec![], &ctx()).await.unwrap();
            assert!(matches!(outcome, TurnOutcome::Failed { .. }));

            let after = engine.snapshot().await;
            assert_eq!(&after.turns[..before.len()], &before[..]);
            assert_eq!(after.turns.len(), before.len() + 2);
            assert_eq!(after.turns.last().unwrap().text(), RETRY_MESSAGE);

            let retry = engine.submit_turn("two days", vec![], &ctx()).await.unwrap();
            assert!(matches!(retry, TurnOutcome::Question(_)));
        }

        #[tokio::test]
        async fn contract_violation_is_a_failed_round() {
            let (engine, store) = engine(
                MockOracle::new().with_assessment(r#"{"status":"complete","summary":"x"}"#),
                MockSpecialistLookup::new(),
            );

            let outcome = engine.submit_turn("rash", vec![], &ctx()).await.unwrap();

            let TurnOutcome::Failed { error, .. } = outcome else {
                panic!("expected failure");
            };
            assert!(error.is_contract_violation());
            assert!(store.is_empty().await);
        }
    }

    mod concurrency {
        use super::*;

        #[tokio::test]
        async fn concurrent_submission_is_rejected() {
            let (oracle, gate) = MockOracle::new()
                .with_assessment_json(question("Since when?"))
                .gated();
            let (engine, _) = engine(oracle, MockSpecialistLookup::new());
            let engine = Arc::new(engine);

            let first = {
                let engine = Arc::clone(&engine);
                tokio::spawn(async move { engine.submit_turn("rash", vec![], &ctx()).await })
            };
            while engine.snapshot().await.status != SessionStatus::AwaitingOracle {
                tokio::task::yield_now().await;
            }

            let second = engine.submit_turn("fever", vec![], &ctx()).await;
            assert_eq!(second.unwrap_err(), SubmitTurnError::SubmissionInFlight);

            gate.notify_one();
            assert!(matches!(
                first.await.unwrap().unwrap(),
                TurnOutcome::Question(_)
            ));
        }

        #[tokio::test]
        async fn reset_during_call_discards_answer() {
            let (oracle, gate) = MockOracle::new()
                .with_assessment_json(complete(Some("Dermatitis"), None))
                .gated();
            let (engine, store) = engine(oracle, MockSpecialistLookup::new());
            let engine = Arc::new(engine);

            let first = {
                let engine = Arc::clone(&engine);
                tokio::spawn(async move { engine.submit_turn("rash", vec![], &ctx()).await })
            };
            while engine.snapshot().await.status != SessionStatus::AwaitingOracle {
                tokio::task::yield_now().await;
            }

            engine.reset().await;
            gate.notify_one();

            assert!(matches!(first.await.unwrap().unwrap(), TurnOutcome::Discarded));
            let snapshot = engine.snapshot().await;
            assert!(snapshot.turns.is_empty());
            assert_eq!(snapshot.status, SessionStatus::Idle);
            assert!(store.is_empty().await);
        }
    }
}
