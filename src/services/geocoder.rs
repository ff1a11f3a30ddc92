use crate::models::GeocodeCandidate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when resolving an address
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geocoding API returned error: {0}")]
    Api(String),

    #[error("Location not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    results: Vec<ProviderResult>,
}

#[derive(Debug, Deserialize)]
struct ProviderResult {
    formatted: String,
    geometry: ProviderGeometry,
}

#[derive(Debug, Deserialize)]
struct ProviderGeometry {
    lat: f64,
    lng: f64,
}

/// Forward-geocoding client (OpenCage-shaped API).
///
/// Turns free-text queries into candidate locations, preserving the
/// provider's own relevance ranking. Two call shapes:
/// - `suggest` for incremental autocomplete, capped at the configured
///   suggestion limit, degrading to an empty list on any failure;
/// - `resolve` for submit-time resolution, capped to one result, with a
///   recoverable `NotFound` when the provider has no answer.
pub struct GeocoderClient {
    endpoint: String,
    api_key: String,
    country_code: String,
    suggest_limit: u8,
    client: Client,
}

impl GeocoderClient {
    pub fn new(endpoint: String, api_key: String, country_code: String, suggest_limit: u8) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self { endpoint, api_key, country_code, suggest_limit, client }
    }

    fn url(&self, query: &str, limit: u8) -> String {
        format!(
            "{}?q={}&key={}&countrycode={}&limit={}",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(query),
            self.api_key,
            self.country_code,
            limit
        )
    }

    async fn forward(&self, query: &str, limit: u8) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let url = self.url(query, limit);

        tracing::debug!("Geocoding query: {}", query);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Api(format!(
                "Geocoding request failed: {}",
                response.status()
            )));
        }

        let body: ProviderResponse = response.json().await?;

        Ok(body
            .results
            .into_iter()
            .map(|r| GeocodeCandidate {
                formatted: r.formatted,
                latitude: r.geometry.lat,
                longitude: r.geometry.lng,
            })
            .collect())
    }

    /// Incremental suggestions for autocomplete. Failures must not surface
    /// to the caller; a network error or empty provider answer both yield
    /// an empty list.
    pub async fn suggest(&self, query: &str) -> Vec<GeocodeCandidate> {
        match self.forward(query, self.suggest_limit).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("Suggestion fetch failed for {:?}: {}", query, e);
                vec![]
            }
        }
    }

    /// Resolve a committed query to its single top candidate. Zero results
    /// is a recoverable condition the caller reports to the user.
    pub async fn resolve(&self, query: &str) -> Result<GeocodeCandidate, GeocodeError> {
        let mut candidates = self.forward(query, 1).await?;

        if candidates.is_empty() {
            return Err(GeocodeError::NotFound(query.to_string()));
        }

        Ok(candidates.remove(0))
    }
}
