//! Diagnostic oracle configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::oracle::{
    GeminiConfig, DEFAULT_BASE_URL, DEFAULT_COMPLEX_MODEL, DEFAULT_FAST_MODEL,
    DEFAULT_THINKING_BUDGET,
};

/// Gemini oracle configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    /// Gemini API key
    pub api_key: Option<Secret<String>>,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for assessments
    #[serde(default = "default_complex_model")]
    pub complex_model: String,

    /// Model used for guides and specialist lookup
    #[serde(default = "default_fast_model")]
    pub fast_model: String,

    /// Thinking budget for the complex model (0 disables)
    #[serde(default = "default_thinking_budget")]
    pub thinking_budget: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl OracleConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Builds the client configuration.
    ///
    /// # Errors
    ///
    /// `MissingRequired` if no API key is set.
    pub fn gemini(&self) -> Result<GeminiConfig, ValidationError> {
        let key = self
            .api_key
            .as_ref()
            .filter(|_| self.has_api_key())
            .ok_or(ValidationError::MissingRequired("ORACLE__API_KEY"))?;

        Ok(GeminiConfig::new(key.expose_secret().trim())
            .with_base_url(&self.base_url)
            .with_complex_model(&self.complex_model)
            .with_fast_model(&self.fast_model)
            .with_thinking_budget(self.thinking_budget)
            .with_timeout(self.timeout())
            .with_max_retries(self.max_retries))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("ORACLE__API_KEY"));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if self.complex_model.trim().is_empty() {
            return Err(ValidationError::EmptyModel("complex_model"));
        }
        if self.fast_model.trim().is_empty() {
            return Err(ValidationError::EmptyModel("fast_model"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            complex_model: default_complex_model(),
            fast_model: default_fast_model(),
            thinking_budget: default_thinking_budget(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_complex_model() -> String {
    DEFAULT_COMPLEX_MODEL.to_string()
}

fn default_fast_model() -> String {
    DEFAULT_FAST_MODEL.to_string()
}

fn default_thinking_budget() -> u32 {
    DEFAULT_THINKING_BUDGET
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    2
}
