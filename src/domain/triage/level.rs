//! Overall triage level shared by assessments, records and the emergency flow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Severity classification attached to an assessment or record.
///
/// Ordered from least to most urgent so levels can be compared directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum TriageLevel {
    /// Home care is appropriate.
    #[default]
    Low,
    /// A routine doctor visit is advisable.
    Medium,
    /// Prompt medical attention is needed.
    High,
    /// Call emergency services.
    Emergency,
}

impl TriageLevel {
    /// All levels, least urgent first.
    pub const ALL: [TriageLevel; 4] = [
        TriageLevel::Low,
        TriageLevel::Medium,
        TriageLevel::High,
        TriageLevel::Emergency,
    ];

    /// Returns the wire label ("Low", "Medium", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            TriageLevel::Low => "Low",
            TriageLevel::Medium => "Medium",
            TriageLevel::High => "High",
            TriageLevel::Emergency => "Emergency",
        }
    }

    /// Returns true if the level warrants an immediate emergency prompt.
    pub fn is_emergency(&self) -> bool {
        matches!(self, TriageLevel::Emergency)
    }

    /// Returns true if the user should see a professional rather than self-treat.
    pub fn requires_professional(&self) -> bool {
        *self >= TriageLevel::High
    }
}

impl fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriageLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TriageLevel::Low),
            "medium" => Ok(TriageLevel::Medium),
            "high" => Ok(TriageLevel::High),
            "emergency" => Ok(TriageLevel::Emergency),
            other => Err(ValidationError::invalid_format(
                "triage_level",
                format!("unknown level '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_low() {
        assert_eq!(TriageLevel::default(), TriageLevel::Low);
    }

    #[test]
    fn levels_are_ordered_by_urgency() {
        assert!(TriageLevel::Low < TriageLevel::Medium);
        assert!(TriageLevel::High < TriageLevel::Emergency);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("EMERGENCY".parse::<TriageLevel>().unwrap(), TriageLevel::Emergency);
        assert_eq!(" medium ".parse::<TriageLevel>().unwrap(), TriageLevel::Medium);
        assert!("critical".parse::<TriageLevel>().is_err());
    }

    #[test]
    fn serializes_with_wire_labels() {
        for level in TriageLevel::ALL {
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, format!("\"{}\"", level.as_str()));
        }
    }

    #[test]
    fn professional_threshold_starts_at_high() {
        assert!(!TriageLevel::Medium.requires_professional());
        assert!(TriageLevel::High.requires_professional());
        assert!(TriageLevel::Emergency.requires_professional());
    }

    #[test]
    fn only_emergency_is_emergency() {
        let emergencies: Vec<_> = TriageLevel::ALL
            .into_iter()
            .filter(TriageLevel::is_emergency)
            .collect();
        assert_eq!(emergencies, vec![TriageLevel::Emergency]);
    }
}
