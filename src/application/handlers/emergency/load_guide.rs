//! LoadGuideHandler - fetches a structured first-aid guide.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::emergency::{find_emergency, FirstAidGuide};
use crate::domain::patient::Language;
use crate::ports::{DiagnosticOracle, GuideRequest, OracleError};

/// Shown whenever a guide cannot be loaded.
pub const GUIDE_LOAD_FAILED: &str = "Failed to load guide. Please call emergency services.";

/// Command to load a guide for an emergency.
#[derive(Debug, Clone)]
pub struct LoadGuideCommand {
    /// Catalog id, catalog name, or free-text emergency.
    pub emergency: String,
    pub language: Language,
}

impl LoadGuideCommand {
    pub fn new(emergency: impl Into<String>, language: Language) -> Self {
        Self {
            emergency: emergency.into(),
            language,
        }
    }
}

/// The guide could not be loaded. Blocking: the user is told to call
/// emergency services instead.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GuideLoadError {
    #[error("Failed to load guide. Please call emergency services.")]
    EmptyEmergency,

    #[error("Failed to load guide. Please call emergency services. ({0})")]
    Oracle(#[from] OracleError),
}

impl GuideLoadError {
    /// Message for the user.
    pub fn instruction(&self) -> &'static str {
        GUIDE_LOAD_FAILED
    }
}

/// Handler for loading first-aid guides.
pub struct LoadGuideHandler {
    oracle: Arc<dyn DiagnosticOracle>,
}

impl LoadGuideHandler {
    pub fn new(oracle: Arc<dyn DiagnosticOracle>) -> Self {
        Self { oracle }
    }

    pub async fn handle(&self, cmd: LoadGuideCommand) -> Result<FirstAidGuide, GuideLoadError> {
        let key = cmd.emergency.trim();
        if key.is_empty() {
            return Err(GuideLoadError::EmptyEmergency);
        }
        let emergency = find_emergency(key).map_or(key, |e| e.name).to_string();

        let request = GuideRequest {
            emergency: emergency.clone(),
            language: cmd.language,
        };

        match self.oracle.first_aid_guide(request).await {
            Ok(guide) => {
                tracing::info!(%emergency, steps = guide.steps.len(), "first-aid guide loaded");
                Ok(guide)
            }
            // Nothing came back: minimal "call for help" guide.
            Err(OracleError::EmptyResponse) => {
                tracing::warn!(%emergency, "empty guide response, using fallback");
                Ok(FirstAidGuide::fallback(&emergency))
            }
            Err(err) => {
                if err.is_contract_violation() {
                    tracing::error!(%emergency, error = %err, "guide contract violation");
                } else {
                    tracing::warn!(%emergency, error = %err, "guide request failed");
                }
                Err(err.into())
            }
        }
    }
}
