//! Specialist lookup served by the fast Gemini model.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::adapters::oracle::{prompts, GeminiClient, GenerateContentRequest, Part};
use crate::domain::assessment::{ExtractionError, JsonExtractor};
use crate::domain::doctor::DoctorListing;
use crate::ports::{LookupError, LookupRequest, OracleError, SpecialistLookup};

/// Asks the model for a JSON list of nearby providers.
pub struct OracleSpecialistLookup {
    client: Arc<GeminiClient>,
}

impl OracleSpecialistLookup {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SpecialistLookup for OracleSpecialistLookup {
    async fn find_nearby(&self, request: LookupRequest) -> Result<Vec<DoctorListing>, LookupError> {
        let body = GenerateContentRequest::json(
            prompts::lookup_instruction(&request.language),
            vec![Part::text(prompts::lookup_prompt(
                &request.specialty,
                &request.location.to_string(),
            ))],
        )
        .with_response_schema(prompts::lookup_schema());

        match self
            .client
            .generate(&self.client.config().fast_model, &body)
            .await
        {
            Ok(raw) => parse_listings(&raw),
            // Nothing found is not a failure.
            Err(OracleError::EmptyResponse) => Ok(Vec::new()),
            Err(err) if err.is_contract_violation() => Err(LookupError::Parse(err.to_string())),
            Err(err) if err.is_retryable() => Err(LookupError::Network(err.to_string())),
            Err(err) => Err(LookupError::Unavailable(err.to_string())),
        }
    }
}

/// Lenient listing shape; models sometimes answer rating as a number.
#[derive(Debug, Deserialize)]
struct RawListing {
    #[serde(default)]
    name: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    rating: Option<serde_json::Value>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
}

fn parse_listings(raw: &str) -> Result<Vec<DoctorListing>, LookupError> {
    let value = match JsonExtractor::new().extract(raw) {
        Ok(value) => value,
        Err(ExtractionError::Empty) => return Ok(Vec::new()),
        Err(err) => return Err(LookupError::Parse(err.to_string())),
    };

    // Accept a bare array or an object wrapping one.
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map
            .remove("doctors")
            .or_else(|| map.remove("listings"))
        {
            Some(serde_json::Value::Array(items)) => items,
            _ => return Err(LookupError::Parse("expected a list of providers".to_string())),
        },
        _ => return Err(LookupError::Parse("expected a list of providers".to_string())),
    };

    let listings = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<RawListing>(item).ok())
        .filter(|raw| !raw.name.trim().is_empty())
        .map(|raw| DoctorListing {
            name: raw.name.trim().to_string(),
            address: raw.address.trim().to_string(),
            rating: raw.rating.and_then(|r| match r {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            phone: raw.phone.filter(|p| !p.trim().is_empty()),
            lat: raw.lat,
            lng: raw.lng,
        })
        .collect();

    Ok(listings)
}
