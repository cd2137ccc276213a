//! Conversation domain module.
//!
//! The multi-turn symptom interview: turns, the session lifecycle and the
//! aggregate that applies oracle answers to the transcript.

mod session;
mod status;
mod turn;

pub use session::{
    AssessmentSession, PendingRound, RoundResolution, SessionError, SessionSnapshot,
    SpecialistStatus, CLARIFYING_QUESTION, DEFAULT_FOLLOW_UP, DEFAULT_MAX_EMPTY_COMPLETIONS,
    MANUAL_ENTRY_MESSAGE, RETRY_MESSAGE,
};
pub use status::SessionStatus;
pub use turn::{ConversationTurn, TurnRole};
