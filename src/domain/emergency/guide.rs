//! First-aid guides and the step-by-step walkthrough.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::assessment::SchemaViolation;
use crate::domain::foundation::ValidationError;

/// How urgent the guided procedure is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuideSeverity {
    Critical,
    Urgent,
    Moderate,
}

impl GuideSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuideSeverity::Critical => "Critical",
            GuideSeverity::Urgent => "Urgent",
            GuideSeverity::Moderate => "Moderate",
        }
    }
}

impl fmt::Display for GuideSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideStep {
    pub title: String,
    pub instruction: String,
    /// The step is timed (compressions, pressure on a wound).
    pub has_timer: bool,
    pub timer_seconds: Option<u32>,
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstAidGuide {
    pub title: String,
    pub severity: GuideSeverity,
    pub steps: Vec<GuideStep>,
    pub post_emergency: Vec<String>,
}

impl FirstAidGuide {
    /// Minimal guide used when the oracle returns nothing.
    pub fn fallback(emergency: &str) -> Self {
        Self {
            title: emergency.to_string(),
            severity: GuideSeverity::Critical,
            steps: vec![GuideStep {
                title: "Seek Help".to_string(),
                instruction: "Call emergency services immediately.".to_string(),
                has_timer: false,
                timer_seconds: None,
                warning: None,
            }],
            post_emergency: vec!["Wait for ambulance".to_string()],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGuide {
    title: Option<String>,
    severity: Option<String>,
    steps: Option<Vec<RawStep>>,
    post_emergency: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStep {
    title: Option<String>,
    instruction: Option<String>,
    has_timer: Option<bool>,
    timer_seconds: Option<f64>,
    warning: Option<String>,
}

fn required(value: Option<String>, field: &str) -> Result<String, SchemaViolation> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SchemaViolation::InvalidField {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        })
}

/// Validates a parsed guide payload.
///
/// `title`, `severity`, `steps` and `postEmergency` are required and a
/// guide without steps is rejected.
pub fn parse_guide(value: serde_json::Value) -> Result<FirstAidGuide, SchemaViolation> {
    if !value.is_object() {
        return Err(SchemaViolation::NotAnObject);
    }
    let raw: RawGuide =
        serde_json::from_value(value).map_err(|e| SchemaViolation::Malformed(e.to_string()))?;

    let title = required(raw.title, "title")?;
    let severity = match required(raw.severity, "severity")?.as_str() {
        "Critical" => GuideSeverity::Critical,
        "Urgent" => GuideSeverity::Urgent,
        "Moderate" => GuideSeverity::Moderate,
        other => {
            return Err(SchemaViolation::InvalidField {
                field: "severity".to_string(),
                reason: format!("unknown severity '{}'", other),
            })
        }
    };

    let raw_steps = raw.steps.unwrap_or_default();
    if raw_steps.is_empty() {
        return Err(SchemaViolation::InvalidField {
            field: "steps".to_string(),
            reason: "must contain at least one step".to_string(),
        });
    }

    let steps = raw_steps
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let instruction = required(s.instruction, &format!("steps[{}].instruction", i))?;
            let timer_seconds = s
                .timer_seconds
                .filter(|t| t.is_finite() && *t > 0.0)
                .map(|t| t.round().min(f64::from(u32::MAX)) as u32);
            Ok(GuideStep {
                title: s
                    .title
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| format!("Step {}", i + 1)),
                instruction,
                has_timer: s.has_timer.unwrap_or(false) || timer_seconds.is_some(),
                timer_seconds,
                warning: s
                    .warning
                    .map(|w| w.trim().to_string())
                    .filter(|w| !w.is_empty()),
            })
        })
        .collect::<Result<Vec<_>, SchemaViolation>>()?;

    let post_emergency = raw.post_emergency.ok_or_else(|| SchemaViolation::InvalidField {
        field: "postEmergency".to_string(),
        reason: "is required".to_string(),
    })?;

    Ok(FirstAidGuide {
        title,
        severity,
        steps,
        post_emergency,
    })
}

/// Elapsed-seconds timer for a timed step.
///
/// Ticks come from the host event loop, once per second while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepTimer {
    running: bool,
    elapsed_secs: u32,
}

impl StepTimer {
    /// Starts the timer from zero, even if it was already running.
    pub fn start(&mut self) {
        self.running = true;
        self.elapsed_secs = 0;
    }

    /// Stops the timer, keeping the elapsed count on display.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Starts a stopped timer or stops a running one.
    pub fn toggle(&mut self) {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Advances one second if running.
    pub fn tick(&mut self) {
        if self.running {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Seconds left against a target duration, floored at zero.
    pub fn remaining_secs(&self, target: u32) -> u32 {
        target.saturating_sub(self.elapsed_secs)
    }

    /// Elapsed time as `m:ss`.
    pub fn display(&self) -> String {
        format!("{}:{:02}", self.elapsed_secs / 60, self.elapsed_secs % 60)
    }
}

/// Bounded walk through a guide's steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideWalkthrough {
    guide: FirstAidGuide,
    step: usize,
    timer: StepTimer,
}

impl GuideWalkthrough {
    /// Opens a guide at its first step.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the guide has no steps
    pub fn new(guide: FirstAidGuide) -> Result<Self, ValidationError> {
        if guide.steps.is_empty() {
            return Err(ValidationError::empty_field("steps"));
        }
        Ok(Self {
            guide,
            step: 0,
            timer: StepTimer::default(),
        })
    }

    pub fn guide(&self) -> &FirstAidGuide {
        &self.guide
    }

    pub fn step_index(&self) -> usize {
        self.step
    }

    pub fn step_count(&self) -> usize {
        self.guide.steps.len()
    }

    pub fn current_step(&self) -> &GuideStep {
        &self.guide.steps[self.step]
    }

    pub fn is_first(&self) -> bool {
        self.step == 0
    }

    pub fn is_last(&self) -> bool {
        self.step + 1 == self.guide.steps.len()
    }

    /// Moves to the next step. A no-op on the last step.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.step += 1;
        true
    }

    /// Moves to the previous step. A no-op on the first step.
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.step -= 1;
        true
    }

    pub fn timer(&self) -> &StepTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut StepTimer {
        &mut self.timer
    }

    /// "Step 2 of 5".
    pub fn progress_label(&self) -> String {
        format!("Step {} of {}", self.step + 1, self.step_count())
    }
}
