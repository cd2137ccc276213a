//! Assessment session lifecycle.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle state of an assessment session.
///
/// - `Idle`: no turns yet
/// - `AwaitingOracle`: a user turn is out for assessment
/// - `InProgress`: the oracle asked a follow-up (or a round failed)
/// - `Complete`: a final assessment is held
/// - `Abandoned`: the interview gave up and fell back to manual entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    AwaitingOracle,
    InProgress,
    Complete,
    Abandoned,
}

impl SessionStatus {
    /// Returns true if a new user turn may be submitted.
    pub fn accepts_submission(&self) -> bool {
        !matches!(self, Self::AwaitingOracle)
    }

    /// Returns true if the next submission starts a fresh interview.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Complete | Self::Abandoned)
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            (Idle, AwaitingOracle)
                | (InProgress, AwaitingOracle)
                | (AwaitingOracle, InProgress)
                | (AwaitingOracle, Complete)
                | (AwaitingOracle, Abandoned)
                // reset
                | (AwaitingOracle, Idle)
                | (InProgress, Idle)
                | (Complete, Idle)
                | (Abandoned, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            Idle => vec![AwaitingOracle],
            AwaitingOracle => vec![InProgress, Complete, Abandoned, Idle],
            InProgress => vec![AwaitingOracle, Idle],
            Complete | Abandoned => vec![Idle],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn awaiting_oracle_blocks_submission() {
        assert!(!SessionStatus::AwaitingOracle.accepts_submission());
        assert!(SessionStatus::InProgress.accepts_submission());
        assert!(SessionStatus::Complete.accepts_submission());
    }

    #[test]
    fn finished_states_only_reset() {
        assert_eq!(
            SessionStatus::Complete.valid_transitions(),
            vec![SessionStatus::Idle]
        );
        assert!(SessionStatus::Complete
            .transition_to(SessionStatus::AwaitingOracle)
            .is_err());
    }

    #[test]
    fn valid_transitions_agree_with_can_transition_to() {
        let all = [
            SessionStatus::Idle,
            SessionStatus::AwaitingOracle,
            SessionStatus::InProgress,
            SessionStatus::Complete,
            SessionStatus::Abandoned,
        ];
        for from in all {
            for to in all {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn no_status_is_terminal() {
        assert!(!SessionStatus::Abandoned.is_terminal());
        assert!(SessionStatus::Abandoned.is_finished());
    }
}
