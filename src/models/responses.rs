use serde::{Deserialize, Serialize};

use crate::models::domain::{GeocodeCandidate, ScoredListing, ScoredSeeker};

/// Response for the listing search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchListingsResponse {
    pub results: Vec<ScoredListing>,
    /// The location the query resolved to, when proximity mode is active.
    /// `null` signals that resolve-on-submit found nothing and the results
    /// fell back to substring matching.
    #[serde(rename = "resolvedLocation")]
    pub resolved_location: Option<GeocodeCandidate>,
    pub total: usize,
}

/// Response for the seeker search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSeekersResponse {
    pub results: Vec<ScoredSeeker>,
    #[serde(rename = "resolvedLocation")]
    pub resolved_location: Option<GeocodeCandidate>,
    pub total: usize,
}

/// Response for document creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Response for the suggestion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<GeocodeCandidate>,
    /// True when a newer keystroke for the same field superseded this
    /// request before the quiet window elapsed.
    pub superseded: bool,
}

/// Response for profile picture upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PictureResponse {
    #[serde(rename = "photoUrl")]
    pub photo_url: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
