//! Specialist lookup port.
//!
//! Best-effort search for providers near a location. Callers treat every
//! failure as "no suggestions"; nothing downstream depends on it.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::doctor::{DoctorListing, Location};
use crate::domain::patient::Language;

#[async_trait]
pub trait SpecialistLookup: Send + Sync {
    /// Returns providers for the specialty, best match first.
    async fn find_nearby(&self, request: LookupRequest) -> Result<Vec<DoctorListing>, LookupError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub specialty: String,
    pub location: Location,
    pub language: Language,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LookupError {
    #[error("lookup service unavailable: {0}")]
    Unavailable(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("unparseable listings: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_object_safe() {
        fn _accepts_dyn(_lookup: &dyn SpecialistLookup) {}
    }
}
