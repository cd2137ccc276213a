//! Conversation turns.
//!
//! Turns are immutable records of one interview exchange. The history sent
//! to the oracle is built from them as role-prefixed lines.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, TurnId};
use crate::domain::media::MediaRef;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// The patient or caregiver.
    User,
    /// The interviewing oracle.
    Assistant,
}

impl TurnRole {
    /// Prefix used when the turn is replayed to the oracle.
    pub fn history_prefix(&self) -> &'static str {
        match self {
            TurnRole::User => "Patient",
            TurnRole::Assistant => "Doctor",
        }
    }
}

/// One entry in the interview transcript.
///
/// # Invariants
///
/// - a user turn has non-blank text or at least one media reference
/// - `created_at` never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    id: TurnId,
    role: TurnRole,
    text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    media: Vec<MediaRef>,
    created_at: Timestamp,
}

impl ConversationTurn {
    fn new(role: TurnRole, text: String, media: Vec<MediaRef>) -> Self {
        Self {
            id: TurnId::new(),
            role,
            text,
            media,
            created_at: Timestamp::now(),
        }
    }

    /// Creates a user turn. Text is trimmed; emptiness is checked by the
    /// session, which also knows about staged attachments.
    pub fn user(text: &str, media: Vec<MediaRef>) -> Self {
        Self::new(TurnRole::User, text.trim().to_string(), media)
    }

    /// Creates an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, text.into(), Vec::new())
    }

    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn role(&self) -> TurnRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn media(&self) -> &[MediaRef] {
        &self.media
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Renders the turn as a history line, e.g. `Patient: my knee hurts`.
    pub fn history_line(&self) -> String {
        format!("{}: {}", self.role.history_prefix(), self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_turn_history_line() {
        let turn = ConversationTurn::user("  my knee hurts ", vec![]);
        assert_eq!(turn.history_line(), "Patient: my knee hurts");
        assert_eq!(turn.role(), TurnRole::User);
    }

    #[test]
    fn assistant_turn_history_line() {
        let turn = ConversationTurn::assistant("Since when?");
        assert_eq!(turn.history_line(), "Doctor: Since when?");
        assert!(turn.media().is_empty());
    }

    #[test]
    fn user_turn_keeps_media() {
        let media = vec![MediaRef::for_data("x")];
        let turn = ConversationTurn::user("", media.clone());
        assert_eq!(turn.media(), media.as_slice());
        assert_eq!(turn.text(), "");
    }
}
