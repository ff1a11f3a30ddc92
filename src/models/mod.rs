// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    derive_city, BoundingBox, Coordinates, Gender, GeocodeCandidate, Listing, Locatable,
    Occupancy, ScoredListing, ScoredSeeker, SeekerProfile, UserProfile,
};
pub use requests::{
    CreateListingRequest, SearchRequest, SuggestQuery, UpdateListingRequest,
    UpdatePreferencesRequest, UpsertSeekerRequest,
};
pub use responses::{
    CreatedResponse, ErrorResponse, HealthResponse, PictureResponse, SearchListingsResponse,
    SearchSeekersResponse, SuggestResponse,
};
