//! Roomly Match - search and matching service for a room/roommate marketplace
//!
//! This library powers listing and seeker search: geocoding addresses,
//! filtering by desired gender and proximity, sorting by distance, and
//! scoring every result against the viewer's preference tags.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    distance::{calculate_bounding_box, haversine_distance_m, meters_to_km},
    match_score, nearby, SearchEngine, SearchMode,
};
pub use crate::models::{
    Coordinates, Gender, GeocodeCandidate, Listing, Locatable, ScoredListing, ScoredSeeker,
    SearchRequest, SeekerProfile, UserProfile,
};
