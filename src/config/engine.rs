//! Assessment engine configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::conversation::DEFAULT_MAX_EMPTY_COMPLETIONS;
use crate::domain::doctor::{Coordinates, Location};

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Consecutive summary-less completions before the interview gives up
    #[serde(default = "default_max_empty_completions")]
    pub max_empty_completions: u32,

    /// Place name or "lat,lng" for specialist lookup
    #[serde(default = "default_location")]
    pub default_location: String,

    /// Interface language code
    #[serde(default = "default_language")]
    pub language: String,
}

impl EngineConfig {
    /// Parses `default_location`: "lat,lng" pairs become coordinates,
    /// anything else a place name. Blank means near the user.
    pub fn location(&self) -> Location {
        let raw = self.default_location.trim();
        if raw.is_empty() {
            return Location::near_me();
        }
        let coordinates = raw.split_once(',').and_then(|(lat, lng)| {
            Some(Coordinates::new(
                lat.trim().parse().ok()?,
                lng.trim().parse().ok()?,
            ))
        });
        match coordinates {
            Some(c) => Location::Coordinates(c),
            None => Location::Place(raw.to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_empty_completions == 0 {
            return Err(ValidationError::InvalidEmptyCompletionLimit);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_empty_completions: default_max_empty_completions(),
            default_location: default_location(),
            language: default_language(),
        }
    }
}

fn default_max_empty_completions() -> u32 {
    DEFAULT_MAX_EMPTY_COMPLETIONS
}

fn default_location() -> String {
    "me".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_location(loc: &str) -> EngineConfig {
        EngineConfig {
            default_location: loc.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn default_is_near_me() {
        assert_eq!(EngineConfig::default().location(), Location::near_me());
        assert_eq!(with_location(" ").location(), Location::near_me());
    }

    #[test]
    fn parses_coordinates() {
        assert_eq!(
            with_location("38.72, -9.14").location(),
            Location::Coordinates(Coordinates::new(38.72, -9.14))
        );
    }

    #[test]
    fn other_text_is_a_place() {
        assert_eq!(
            with_location("Lisbon, Portugal").location(),
            Location::Place("Lisbon, Portugal".to_string())
        );
    }

    #[test]
    fn zero_limit_is_invalid() {
        let config = EngineConfig {
            max_empty_completions: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
