//! Percentage value object (0-100 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A value between 0 and 100 inclusive.
///
/// Used for oracle confidence scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100);

    /// Creates a new Percentage, clamping to valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Creates a Percentage from a JSON number, rounding to the nearest integer.
    ///
    /// Fractions in `[0.0, 1.0]` are not rescaled: a model reporting `0.9`
    /// means "0.9 percent" as far as the schema is concerned.
    pub fn from_f64(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(ValidationError::invalid_format(
                "percentage",
                format!("{} is not within 0-100", value),
            ));
        }
        Ok(Self(value.round() as u8))
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_new_clamps_to_100() {
        assert_eq!(Percentage::new(101).value(), 100);
        assert_eq!(Percentage::new(42).value(), 42);
    }

    #[test]
    fn from_f64_rounds() {
        assert_eq!(Percentage::from_f64(84.6).unwrap().value(), 85);
        assert_eq!(Percentage::from_f64(0.0).unwrap(), Percentage::ZERO);
        assert_eq!(Percentage::from_f64(100.0).unwrap(), Percentage::HUNDRED);
    }

    #[test]
    fn from_f64_rejects_out_of_range() {
        assert!(Percentage::from_f64(-1.0).is_err());
        assert!(Percentage::from_f64(100.5).is_err());
        assert!(Percentage::from_f64(f64::NAN).is_err());
    }

    #[test]
    fn percentage_displays_with_sign() {
        assert_eq!(Percentage::new(75).to_string(), "75%");
    }
}
