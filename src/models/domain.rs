use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// Listings and seeker profiles carry coordinates as two nullable wire
/// fields; this type only ever exists as a valid pair. Entities expose
/// `coordinates()` which yields `Some` only when both halves are present,
/// so a half-set pair behaves exactly like a missing one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn from_pair(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(latitude), Some(longitude)) => Some(Self { latitude, longitude }),
            _ => None,
        }
    }
}

/// Gender vocabulary shared by listings (desired occupant), seeker profiles
/// and the search filter. Filtering is an exact enum match: a filter of
/// `Any` passes everything, but an entity tagged `Any` does not match a
/// `Male` or `Female` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Any,
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Any
    }
}

/// Occupancy vocabulary for listings and seeker preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupancy {
    Single,
    Shared,
    Any,
}

impl Default for Occupancy {
    fn default() -> Self {
        Occupancy::Any
    }
}

/// Anything that may carry a coordinate pair. The proximity filter operates
/// on this seam so listings and seeker profiles share one implementation.
pub trait Locatable {
    fn coordinates(&self) -> Option<Coordinates>;
}

/// A posted room/property available to share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    // The store assigns the document id at creation; an empty id never
    // reaches the wire.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub title: String,
    pub address: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    pub rent: u32,
    #[serde(rename = "lookingForGender", default)]
    pub looking_for_gender: Gender,
    #[serde(default)]
    pub occupancy: Occupancy,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "ownerId")]
    pub owner_id: String,
    // Listing photo upload is disabled in the current build; this stays
    // empty but is kept on the wire for forward compatibility.
    #[serde(rename = "imageUrls", default)]
    pub image_urls: Vec<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Locatable for Listing {
    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_pair(self.lat, self.lng)
    }
}

/// A user's request-for-roommate posting. Document id equals the owning
/// user's id, so each user has at most one and an upsert overwrites it
/// wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeekerProfile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub location: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub gender: Gender,
    pub budget: u32,
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
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "profilePicUrl", default)]
    pub profile_pic_url: Option<String>,
    /// First comma-delimited segment of `location`, derived at write time.
    #[serde(default)]
    pub city: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Locatable for SeekerProfile {
    fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_pair(self.lat, self.lng)
    }
}

/// Derive the city string from a free-text location: everything before the
/// first comma, trimmed.
pub fn derive_city(location: &str) -> String {
    location
        .split(',')
        .next()
        .unwrap_or(location)
        .trim()
        .to_string()
}

/// Per-user profile, one-to-one with an authenticated identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(rename = "photoUrl", default)]
    pub photo_url: Option<String>,
    /// Preference tags used by the match scorer, drawn from a fixed
    /// vocabulary (Night Owl, Early Bird, Studious, ...).
    #[serde(default)]
    pub preferences: Vec<String>,
}

/// Transient geocoding result; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    pub formatted: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeocodeCandidate {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// A listing annotated with search output: distance from the reference
/// point (proximity mode only) and the heuristic match score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredListing {
    #[serde(flatten)]
    pub listing: Listing,
    /// Kilometers with one-decimal rounding; absent outside proximity mode.
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
}

/// A seeker profile annotated with search output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredSeeker {
    #[serde(flatten)]
    pub seeker: SeekerProfile,
    #[serde(rename = "distanceKm")]
    pub distance_km: Option<f64>,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
}

/// Geospatial bounding box used as a cheap pre-filter before exact
/// haversine distance.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_require_both_halves() {
        assert!(Coordinates::from_pair(Some(19.0), Some(72.8)).is_some());
        assert!(Coordinates::from_pair(Some(19.0), None).is_none());
        assert!(Coordinates::from_pair(None, Some(72.8)).is_none());
        assert!(Coordinates::from_pair(None, None).is_none());
    }

    #[test]
    fn derive_city_takes_first_segment() {
        assert_eq!(derive_city("Hinjewadi, Pune, Maharashtra"), "Hinjewadi");
        assert_eq!(derive_city("Mumbai"), "Mumbai");
        assert_eq!(derive_city(" Andheri , Mumbai"), "Andheri");
    }

    #[test]
    fn gender_serializes_as_display_labels() {
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), "\"Male\"");
        assert_eq!(serde_json::to_string(&Gender::Any).unwrap(), "\"Any\"");
    }
}
