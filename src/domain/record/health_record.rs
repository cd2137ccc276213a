//! Health record entity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::edit::RecordEdit;
use crate::domain::assessment::FinalAssessment;
use crate::domain::foundation::{Percentage, ProfileId, RecordId, Timestamp, ValidationError};
use crate::domain::media::MediaRef;
use crate::domain::triage::TriageLevel;

/// What kind of event a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Symptom,
    Medication,
    Emergency,
    Appointment,
    Note,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Symptom => "symptom",
            RecordKind::Medication => "medication",
            RecordKind::Emergency => "emergency",
            RecordKind::Appointment => "appointment",
            RecordKind::Note => "note",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry on a profile's health timeline.
///
/// # Invariants
///
/// - `summary` is never blank
/// - only `summary`, `details` and `notes` change after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    id: RecordId,
    profile_id: ProfileId,
    created_at: Timestamp,
    kind: RecordKind,
    summary: String,
    /// Markdown body.
    details: String,
    triage_level: Option<TriageLevel>,
    confidence: Option<Percentage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    media: Vec<MediaRef>,
    notes: Option<String>,
}

impl HealthRecord {
    /// Creates a record with a fresh id, stamped now.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if `summary` is blank
    pub fn new(
        profile_id: ProfileId,
        kind: RecordKind,
        summary: impl Into<String>,
        details: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let summary = validate_summary(summary.into())?;
        Ok(Self {
            id: RecordId::new(),
            profile_id,
            created_at: Timestamp::now(),
            kind,
            summary,
            details: details.into(),
            triage_level: None,
            confidence: None,
            media: Vec::new(),
            notes: None,
        })
    }

    /// Builds the symptom record for a finalized assessment.
    pub fn from_assessment(
        profile_id: ProfileId,
        assessment: &FinalAssessment,
        media: Vec<MediaRef>,
    ) -> Result<Self, ValidationError> {
        let record = Self::new(
            profile_id,
            RecordKind::Symptom,
            assessment.summary.clone(),
            assessment.to_markdown(),
        )?
        .with_triage_level(assessment.triage_level)
        .with_media(media);
        Ok(match assessment.confidence {
            Some(confidence) => record.with_confidence(confidence),
            None => record,
        })
    }

    /// Builds the record logged when an emergency call is placed.
    pub fn emergency_call(
        profile_id: ProfileId,
        number: &str,
        reason: Option<&str>,
    ) -> Result<Self, ValidationError> {
        if number.trim().is_empty() {
            return Err(ValidationError::empty_field("number"));
        }
        let mut details = format!("Emergency call placed to **{}**.", number.trim());
        if let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) {
            details.push_str(&format!("\n\nReason: {}", reason));
        }
        Ok(Self::new(
            profile_id,
            RecordKind::Emergency,
            format!("Emergency call to {}", number.trim()),
            details,
        )?
        .with_triage_level(TriageLevel::Emergency))
    }

    pub fn with_triage_level(mut self, level: TriageLevel) -> Self {
        self.triage_level = Some(level);
        self
    }

    pub fn with_confidence(mut self, confidence: Percentage) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_media(mut self, media: Vec<MediaRef>) -> Self {
        self.media = media;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into()).filter(|n: &String| !n.trim().is_empty());
        self
    }

    /// Backdates the record; used when importing history.
    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }

    /// Applies a user edit to the editable fields.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the edit blanks the summary; nothing is changed
    pub fn apply(&mut self, edit: RecordEdit) -> Result<(), ValidationError> {
        let summary = edit.summary.map(validate_summary).transpose()?;

        if let Some(summary) = summary {
            self.summary = summary;
        }
        if let Some(details) = edit.details {
            self.details = details;
        }
        if let Some(notes) = edit.notes {
            self.notes = Some(notes).filter(|n| !n.trim().is_empty());
        }
        Ok(())
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn profile_id(&self) -> &ProfileId {
        &self.profile_id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn triage_level(&self) -> Option<TriageLevel> {
        self.triage_level
    }

    pub fn confidence(&self) -> Option<Percentage> {
        self.confidence
    }

    pub fn media(&self) -> &[MediaRef] {
        &self.media
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

fn validate_summary(summary: String) -> Result<String, ValidationError> {
    let trimmed = summary.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("summary"));
    }
    Ok(trimmed.to_string())
}
