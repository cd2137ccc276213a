//! Specialist lookup results and search locations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.lat, self.lng)
    }
}

/// Where to search for providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Location {
    /// Device coordinates.
    Coordinates(Coordinates),
    /// Free-text place ("Nairobi", "near me").
    Place(String),
}

impl Location {
    /// The location used when the host cannot supply one.
    pub fn near_me() -> Self {
        Location::Place("me".to_string())
    }

    /// Returns the coordinates, if known.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Location::Coordinates(c) => Some(*c),
            Location::Place(_) => None,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::near_me()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Coordinates(c) => write!(f, "{}", c),
            Location::Place(p) => f.write_str(p),
        }
    }
}

/// A nearby care provider. Read-only and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorListing {
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl DoctorListing {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            rating: None,
            phone: None,
            lat: None,
            lng: None,
        }
    }

    /// Returns the coordinates when both components are present.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }
}
