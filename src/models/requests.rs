use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Coordinates, Gender, Occupancy};

/// Request to create a listing. Coordinates may be absent; the handler
/// resolves the address before persisting and aborts when the geocoder
/// has no answer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateListingRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(range(min = 1))]
    pub rent: u32,
    #[serde(alias = "looking_for_gender", rename = "lookingForGender", default)]
    pub looking_for_gender: Gender,
    #[serde(default)]
    pub occupancy: Occupancy,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

/// Partial listing update; only present fields are written. Coordinates
/// are accepted as a pair only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateListingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent: Option<u32>,
    #[serde(rename = "lookingForGender", skip_serializing_if = "Option::is_none")]
    pub looking_for_gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<Occupancy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

/// Request to create or overwrite the caller's seeker profile.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertSeekerRequest {
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(range(min = 1))]
    pub budget: u32,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub occupancy: Occupancy,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(rename = "interestedInPg", default)]
    pub interested_in_pg: bool,
    #[serde(rename = "mobileVisible", default)]
    pub mobile_visible: bool,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

/// Search request shared by the listing and seeker endpoints.
///
/// `location` is a pre-resolved coordinate pair (the client picked a
/// suggestion); when absent and `query` is non-empty, the handler attempts
/// a resolve-on-submit, falling back to substring matching when the
/// geocoder has no answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub location: Option<Coordinates>,
    #[serde(rename = "radiusKm", default)]
    pub radius_km: Option<f64>,
    /// When present, this user's stored preference tags drive the match
    /// score; without it every result takes the filler score.
    #[serde(rename = "viewerId", default)]
    pub viewer_id: Option<String>,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            gender: Gender::Any,
            query: None,
            location: None,
            radius_km: None,
            viewer_id: None,
        }
    }
}

/// Request to replace the caller's preference tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub preferences: Vec<String>,
}

/// Query parameters for the suggestion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestQuery {
    pub q: String,
    /// Input-field identity used to key the debounce; defaults to a shared
    /// key when the client does not disambiguate.
    #[serde(default = "default_field")]
    pub field: String,
}

fn default_field() -> String {
    "search".to_string()
}
