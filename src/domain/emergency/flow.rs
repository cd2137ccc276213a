//! Emergency triage state machine.
//!
//! A rapid yes/no screen that short-circuits to a critical alert on the
//! first "yes". The first-aid guide is a parallel mode opened from the
//! dashboard. Reaching the alert persists nothing by itself; logging a
//! call is a separate, explicit action.

use serde::{Deserialize, Serialize};

use super::catalog::{TriageQuestion, TRIAGE_QUESTIONS};
use super::guide::{FirstAidGuide, GuideWalkthrough};
use crate::domain::foundation::{StateMachine, ValidationError};

/// Screen the emergency flow is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyMode {
    #[default]
    Dashboard,
    Triage,
    RedAlert,
    Guide,
}

impl StateMachine for EmergencyMode {
    fn can_transition_to(&self, target: &Self) -> bool {
        use EmergencyMode::*;
        matches!(
            (self, target),
            (Dashboard, Triage)
                | (Dashboard, Guide)
                | (Triage, RedAlert)
                | (Triage, Dashboard)
                | (RedAlert, Dashboard)
                | (Guide, Dashboard)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use EmergencyMode::*;
        match self {
            Dashboard => vec![Triage, Guide],
            Triage => vec![RedAlert, Dashboard],
            RedAlert | Guide => vec![Dashboard],
        }
    }
}

/// What a triage answer led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageOutcome {
    /// Ask the question at this index next.
    NextQuestion(usize),
    /// A "yes": call emergency services now.
    RedAlert,
    /// "No" to every question; back on the dashboard.
    AllClear,
}

/// The emergency flow for one host screen.
#[derive(Debug, Clone, Default)]
pub struct EmergencyFlow {
    mode: EmergencyMode,
    triage_index: usize,
    guide: Option<GuideWalkthrough>,
}

impl EmergencyFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EmergencyMode {
        self.mode
    }

    pub fn triage_index(&self) -> usize {
        self.triage_index
    }

    /// The question being asked, while in triage.
    pub fn current_question(&self) -> Option<&'static TriageQuestion> {
        match self.mode {
            EmergencyMode::Triage => TRIAGE_QUESTIONS.get(self.triage_index),
            _ => None,
        }
    }

    /// Starts the screen at the first question.
    pub fn start_triage(&mut self) -> Result<(), ValidationError> {
        self.mode = self.mode.transition_to(EmergencyMode::Triage)?;
        self.triage_index = 0;
        Ok(())
    }

    /// Answers the current question.
    ///
    /// # Errors
    ///
    /// Returns an error outside triage mode.
    pub fn answer(&mut self, yes: bool) -> Result<TriageOutcome, ValidationError> {
        if self.mode != EmergencyMode::Triage {
            return Err(ValidationError::invalid_format(
                "emergency_mode",
                format!("cannot answer triage questions in {:?}", self.mode),
            ));
        }

        if yes {
            self.mode = self.mode.transition_to(EmergencyMode::RedAlert)?;
            return Ok(TriageOutcome::RedAlert);
        }

        if self.triage_index + 1 < TRIAGE_QUESTIONS.len() {
            self.triage_index += 1;
            Ok(TriageOutcome::NextQuestion(self.triage_index))
        } else {
            self.mode = self.mode.transition_to(EmergencyMode::Dashboard)?;
            self.triage_index = 0;
            Ok(TriageOutcome::AllClear)
        }
    }

    /// Returns to the dashboard from any screen ("I made a mistake, go
    /// back" on the alert). The next triage starts at the first question.
    pub fn go_back(&mut self) {
        if self.mode != EmergencyMode::Dashboard {
            self.mode = EmergencyMode::Dashboard;
        }
        self.triage_index = 0;
        self.guide = None;
    }

    /// Opens a loaded guide at its first step.
    pub fn open_guide(&mut self, guide: FirstAidGuide) -> Result<(), ValidationError> {
        let walkthrough = GuideWalkthrough::new(guide)?;
        self.mode = self.mode.transition_to(EmergencyMode::Guide)?;
        self.guide = Some(walkthrough);
        Ok(())
    }

    pub fn guide(&self) -> Option<&GuideWalkthrough> {
        self.guide.as_ref()
    }

    pub fn guide_mut(&mut self) -> Option<&mut GuideWalkthrough> {
        self.guide.as_mut()
    }

    /// Forwards the host's once-per-second tick to the active guide timer.
    pub fn tick(&mut self) {
        if let Some(guide) = self.guide.as_mut() {
            guide.timer_mut().tick();
        }
    }
}
