//! Patient context supplied to every assessment round.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ProfileId, ValidationError};

/// Who the assessment is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PatientCategory {
    #[default]
    #[serde(rename = "self")]
    SelfCare,
    Child,
    Elderly,
    Other,
}

impl PatientCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientCategory::SelfCare => "self",
            PatientCategory::Child => "child",
            PatientCategory::Elderly => "elderly",
            PatientCategory::Other => "other",
        }
    }
}

impl fmt::Display for PatientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable description of the patient for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientContext {
    pub profile_id: ProfileId,
    pub display_name: String,
    pub category: PatientCategory,
    pub age: Option<u8>,
}

impl PatientContext {
    /// Creates a patient context, rejecting a blank display name.
    pub fn new(
        profile_id: ProfileId,
        display_name: impl Into<String>,
        category: PatientCategory,
    ) -> Result<Self, ValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(ValidationError::empty_field("display_name"));
        }
        Ok(Self {
            profile_id,
            display_name,
            category,
            age: None,
        })
    }

    /// Sets the patient's age in years.
    pub fn with_age(mut self, age: u8) -> Self {
        self.age = Some(age);
        self
    }

    /// Renders the one-line context string sent to the oracle,
    /// e.g. `child (7), Name: Sam`.
    pub fn to_prompt_line(&self) -> String {
        let age = self
            .age
            .map(|a| a.to_string())
            .unwrap_or_else(|| "?".to_string());
        format!("{} ({}), Name: {}", self.category, age, self.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ProfileId {
        ProfileId::new("p-1").unwrap()
    }

    #[test]
    fn rejects_blank_name() {
        assert!(PatientContext::new(profile(), "  ", PatientCategory::Child).is_err());
    }

    #[test]
    fn prompt_line_includes_age() {
        let ctx = PatientContext::new(profile(), "Sam", PatientCategory::Child)
            .unwrap()
            .with_age(7);
        assert_eq!(ctx.to_prompt_line(), "child (7), Name: Sam");
    }

    #[test]
    fn prompt_line_marks_unknown_age() {
        let ctx = PatientContext::new(profile(), "Ana", PatientCategory::SelfCare).unwrap();
        assert_eq!(ctx.to_prompt_line(), "self (?), Name: Ana");
    }

    #[test]
    fn category_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PatientCategory::SelfCare).unwrap(),
            "\"self\""
        );
        assert_eq!(
            serde_json::to_string(&PatientCategory::Elderly).unwrap(),
            "\"elderly\""
        );
    }
}
