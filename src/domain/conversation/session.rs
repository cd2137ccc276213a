//! Assessment session aggregate.
//!
//! Holds the interview transcript and decides, round by round, whether the
//! oracle's answer continues the interview, finalizes it, or is discarded.
//! The aggregate is synchronous; the engine drives it around the oracle
//! call with [`AssessmentSession::begin_turn`] and
//! [`AssessmentSession::resolve_round`] / [`AssessmentSession::fail_round`].
//!
//! # Rounds and generations
//!
//! Every reset bumps the session generation. A round carries the generation
//! it was started under, and an answer arriving for an older generation is
//! dropped without touching the transcript.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::status::SessionStatus;
use super::turn::{ConversationTurn, TurnRole};
use crate::domain::assessment::{AssessmentResult, FinalAssessment};
use crate::domain::doctor::DoctorListing;
use crate::domain::foundation::{SessionId, StateMachine};
use crate::domain::media::{MediaPayload, MediaRef};
use crate::domain::patient::PatientContext;

/// Assistant text when the oracle asks to continue without a question.
pub const DEFAULT_FOLLOW_UP: &str = "Can you provide more details?";

/// Assistant text when a complete answer had nothing to summarize.
pub const CLARIFYING_QUESTION: &str = "Could you provide more details?";

/// Assistant text after a failed round.
pub const RETRY_MESSAGE: &str = "Error analyzing symptoms. Please try again.";

/// Assistant text when the interview is abandoned.
pub const MANUAL_ENTRY_MESSAGE: &str =
    "I could not reach an assessment from this conversation. Please add your symptoms to the timeline manually or consult a doctor.";

/// Consecutive summary-less completions tolerated before abandoning.
pub const DEFAULT_MAX_EMPTY_COMPLETIONS: u32 = 3;

/// Local rejections of a submission. The session is left untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("submission needs text or at least one attachment")]
    EmptySubmission,

    #[error("an assessment round is already in flight")]
    SubmissionInFlight,

    #[error("patient context cannot change during an interview")]
    PatientChanged,
}

/// Progress of the best-effort provider search for a finalized session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SpecialistStatus {
    #[default]
    NotRequested,
    Pending {
        specialty: String,
    },
    Ready {
        specialty: String,
        listings: Vec<DoctorListing>,
    },
    Unavailable {
        specialty: String,
    },
}

impl SpecialistStatus {
    pub fn specialty(&self) -> Option<&str> {
        match self {
            SpecialistStatus::NotRequested => None,
            SpecialistStatus::Pending { specialty }
            | SpecialistStatus::Ready { specialty, .. }
            | SpecialistStatus::Unavailable { specialty } => Some(specialty),
        }
    }
}

/// Everything the engine needs to call the oracle for one round.
#[derive(Debug, Clone)]
pub struct PendingRound {
    pub session_id: SessionId,
    pub generation: u64,
    /// 1-based count of user turns, including this one.
    pub round: u32,
    /// Prior turns as role-prefixed lines.
    pub history: Vec<String>,
    /// Text of the new user turn.
    pub prompt: String,
    pub media: Vec<MediaPayload>,
    pub patient: PatientContext,
}

/// How a round ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundResolution {
    /// The oracle asked a follow-up question.
    Question(String),
    /// The interview concluded.
    Finalized {
        assessment: FinalAssessment,
        /// Media submitted in the finalizing round.
        media: Vec<MediaRef>,
    },
    /// A complete answer had nothing to summarize and was turned into a
    /// clarifying question.
    Demoted { empty_completions: u32 },
    /// Too many consecutive demotions; the interview gave up.
    Abandoned,
    /// The oracle failed or broke its contract; the round can be retried.
    Failed,
}

/// Read-only view of a session for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub status: SessionStatus,
    pub patient: Option<PatientContext>,
    pub turns: Vec<ConversationTurn>,
    pub pending_attachments: usize,
    pub assessment: Option<FinalAssessment>,
    pub specialist: SpecialistStatus,
}

/// Assessment session aggregate.
///
/// # Invariants
///
/// - at most one round is awaiting the oracle
/// - `assessment` is set only while status is `Complete`
/// - the bound patient does not change while turns exist
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    id: SessionId,
    status: SessionStatus,
    patient: Option<PatientContext>,
    turns: Vec<ConversationTurn>,
    pending_attachments: Vec<MediaPayload>,
    assessment: Option<FinalAssessment>,
    specialist: SpecialistStatus,
    empty_completions: u32,
    max_empty_completions: u32,
    generation: u64,
}

impl AssessmentSession {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            status: SessionStatus::Idle,
            patient: None,
            turns: Vec::new(),
            pending_attachments: Vec::new(),
            assessment: None,
            specialist: SpecialistStatus::NotRequested,
            empty_completions: 0,
            max_empty_completions: DEFAULT_MAX_EMPTY_COMPLETIONS,
            generation: 0,
        }
    }

    /// Sets how many consecutive summary-less completions are tolerated.
    pub fn with_max_empty_completions(mut self, max: u32) -> Self {
        self.max_empty_completions = max.max(1);
        self
    }

    /// Stages an attachment for the next user turn.
    pub fn stage_attachment(&mut self, payload: MediaPayload) {
        self.pending_attachments.push(payload);
    }

    /// Starts a round: validates the submission, appends the user turn and
    /// returns what the oracle should be asked.
    ///
    /// A finished session (complete or abandoned) is cleared first. Staged
    /// attachments survive that clearing and go into the new turn.
    ///
    /// # Errors
    ///
    /// - `SubmissionInFlight` while another round awaits the oracle
    /// - `EmptySubmission` if there is no text and no attachment
    /// - `PatientChanged` if the patient differs from the one the
    ///   ongoing interview is about
    pub fn begin_turn(
        &mut self,
        text: &str,
        attachments: Vec<MediaPayload>,
        patient: &PatientContext,
    ) -> Result<PendingRound, SessionError> {
        if !self.status.accepts_submission() {
            return Err(SessionError::SubmissionInFlight);
        }
        if text.trim().is_empty() && attachments.is_empty() && self.pending_attachments.is_empty()
        {
            return Err(SessionError::EmptySubmission);
        }

        if self.status.is_finished() {
            self.clear_interview();
        }

        let patient_changed = !self.turns.is_empty()
            && self.patient.as_ref().map_or(false, |bound| bound != patient);
        if patient_changed {
            return Err(SessionError::PatientChanged);
        }
        self.patient = Some(patient.clone());

        let mut media: Vec<MediaPayload> = self.pending_attachments.drain(..).collect();
        media.extend(attachments);

        let history = self.history_lines();
        let refs = media.iter().map(|m| m.reference().clone()).collect();
        let turn = ConversationTurn::user(text, refs);
        let prompt = turn.text().to_string();
        self.turns.push(turn);
        self.set_status(SessionStatus::AwaitingOracle);

        Ok(PendingRound {
            session_id: self.id,
            generation: self.generation,
            round: self.user_turn_count(),
            history,
            prompt,
            media,
            patient: patient.clone(),
        })
    }

    /// Applies the oracle's answer to the round started under `generation`.
    ///
    /// Returns `None` when the round is stale (the session was reset while
    /// the call was in flight); the answer is discarded.
    pub fn resolve_round(
        &mut self,
        generation: u64,
        result: AssessmentResult,
    ) -> Option<RoundResolution> {
        if !self.is_current(generation) {
            return None;
        }

        let resolution = match result {
            AssessmentResult::InProgress { next_question } => {
                let question = next_question.unwrap_or_else(|| DEFAULT_FOLLOW_UP.to_string());
                self.empty_completions = 0;
                self.turns.push(ConversationTurn::assistant(question.clone()));
                self.set_status(SessionStatus::InProgress);
                RoundResolution::Question(question)
            }
            AssessmentResult::Complete(report) => match report.finalize() {
                Ok(assessment) => {
                    self.empty_completions = 0;
                    self.specialist = match &assessment.recommended_specialist {
                        Some(specialty) => SpecialistStatus::Pending {
                            specialty: specialty.clone(),
                        },
                        None => SpecialistStatus::NotRequested,
                    };
                    self.assessment = Some(assessment.clone());
                    self.set_status(SessionStatus::Complete);
                    RoundResolution::Finalized {
                        assessment,
                        media: self.last_user_media(),
                    }
                }
                Err(_) => {
                    self.empty_completions += 1;
                    if self.empty_completions >= self.max_empty_completions {
                        self.turns
                            .push(ConversationTurn::assistant(MANUAL_ENTRY_MESSAGE));
                        self.set_status(SessionStatus::Abandoned);
                        RoundResolution::Abandoned
                    } else {
                        self.turns.push(ConversationTurn::assistant(CLARIFYING_QUESTION));
                        self.set_status(SessionStatus::InProgress);
                        RoundResolution::Demoted {
                            empty_completions: self.empty_completions,
                        }
                    }
                }
            },
        };
        Some(resolution)
    }

    /// Records a failed round: one retry-inviting assistant turn, prior
    /// turns and any held result untouched.
    ///
    /// Returns `None` when the round is stale.
    pub fn fail_round(&mut self, generation: u64) -> Option<RoundResolution> {
        if !self.is_current(generation) {
            return None;
        }
        self.turns.push(ConversationTurn::assistant(RETRY_MESSAGE));
        self.set_status(SessionStatus::InProgress);
        Some(RoundResolution::Failed)
    }

    /// Merges a specialist lookup outcome into the display state.
    ///
    /// Ignored unless the lookup belongs to the current generation and the
    /// session is still waiting for it. Returns whether it was applied.
    pub fn merge_specialist(&mut self, generation: u64, outcome: SpecialistStatus) -> bool {
        if generation != self.generation
            || !matches!(self.specialist, SpecialistStatus::Pending { .. })
        {
            return false;
        }
        self.specialist = outcome;
        true
    }

    /// Clears the interview and staged attachments. Any round in flight
    /// becomes stale.
    pub fn reset(&mut self) {
        self.clear_interview();
        self.pending_attachments.clear();
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn assessment(&self) -> Option<&FinalAssessment> {
        self.assessment.as_ref()
    }

    pub fn specialist(&self) -> &SpecialistStatus {
        &self.specialist
    }

    pub fn patient(&self) -> Option<&PatientContext> {
        self.patient.as_ref()
    }

    pub fn pending_attachments(&self) -> &[MediaPayload] {
        &self.pending_attachments
    }

    pub fn empty_completions(&self) -> u32 {
        self.empty_completions
    }

    /// Prior turns as role-prefixed lines.
    pub fn history_lines(&self) -> Vec<String> {
        self.turns.iter().map(ConversationTurn::history_line).collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            status: self.status,
            patient: self.patient.clone(),
            turns: self.turns.clone(),
            pending_attachments: self.pending_attachments.len(),
            assessment: self.assessment.clone(),
            specialist: self.specialist.clone(),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation && self.status == SessionStatus::AwaitingOracle
    }

    fn clear_interview(&mut self) {
        self.turns.clear();
        self.assessment = None;
        self.specialist = SpecialistStatus::NotRequested;
        self.empty_completions = 0;
        self.patient = None;
        self.generation += 1;
        if self.status != SessionStatus::Idle {
            self.set_status(SessionStatus::Idle);
        }
    }

    fn set_status(&mut self, next: SessionStatus) {
        debug_assert!(
            self.status.can_transition_to(&next),
            "invalid session transition {:?} -> {:?}",
            self.status,
            next
        );
        self.status = next;
    }

    fn user_turn_count(&self) -> u32 {
        self.turns
            .iter()
            .filter(|t| t.role() == TurnRole::User)
            .count() as u32
    }

    fn last_user_media(&self) -> Vec<MediaRef> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role() == TurnRole::User)
            .map(|t| t.media().to_vec())
            .unwrap_or_default()
    }
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new()
    }
}
