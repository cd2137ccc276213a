//! Per-diagnosis grading: how likely a condition is and how severe it would be.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Likelihood of one differential diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Likelihood {
    High,
    Medium,
    Low,
}

impl Likelihood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Likelihood::High => "High",
            Likelihood::Medium => "Medium",
            Likelihood::Low => "Low",
        }
    }
}

impl fmt::Display for Likelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Likelihood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Likelihood::High),
            "medium" => Ok(Likelihood::Medium),
            "low" => Ok(Likelihood::Low),
            other => Err(ValidationError::invalid_format(
                "likelihood",
                format!("unknown likelihood '{}'", other),
            )),
        }
    }
}

/// Severity of one differential diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosisSeverity {
    Emergency,
    High,
    Moderate,
    Low,
}

impl DiagnosisSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosisSeverity::Emergency => "Emergency",
            DiagnosisSeverity::High => "High",
            DiagnosisSeverity::Moderate => "Moderate",
            DiagnosisSeverity::Low => "Low",
        }
    }
}

impl fmt::Display for DiagnosisSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagnosisSeverity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emergency" => Ok(DiagnosisSeverity::Emergency),
            "high" => Ok(DiagnosisSeverity::High),
            "moderate" => Ok(DiagnosisSeverity::Moderate),
            "low" => Ok(DiagnosisSeverity::Low),
            other => Err(ValidationError::invalid_format(
                "severity",
                format!("unknown severity '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn likelihood_parses_wire_values() {
        assert_eq!("High".parse::<Likelihood>().unwrap(), Likelihood::High);
        assert_eq!("low".parse::<Likelihood>().unwrap(), Likelihood::Low);
        assert!("Certain".parse::<Likelihood>().is_err());
    }

    #[test]
    fn severity_parses_wire_values() {
        assert_eq!(
            "Moderate".parse::<DiagnosisSeverity>().unwrap(),
            DiagnosisSeverity::Moderate
        );
        assert!("Medium".parse::<DiagnosisSeverity>().is_err());
    }
}
