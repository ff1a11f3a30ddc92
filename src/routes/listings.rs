use actix_web::{web, HttpRequest, HttpResponse, Responder};
use thiserror::Error;
use validator::Validate;

use crate::models::{
    Coordinates, CreateListingRequest, CreatedResponse, Listing, SearchListingsResponse,
    SearchRequest, UpdateListingRequest,
};
use crate::routes::{
    error_body, fetch_listings, require_identity, resolve_search_mode, viewer_tags, AppState,
};
use crate::services::{CacheKey, GeocodeError, GeocoderClient, Identity, StoreClient, StoreError};

/// Configure all listing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/listings", web::post().to(create_listing))
        .route("/listings/search", web::post().to(search_listings))
        .route("/listings/mine", web::get().to(my_listings))
        .route("/listings/{id}", web::get().to(get_listing))
        .route("/listings/{id}", web::patch().to(update_listing));
}

/// Errors from the resolve-then-persist creation flow
#[derive(Debug, Error)]
pub enum ListingCreateError {
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolve-then-persist flow for listing creation.
///
/// When the request carries no coordinate pair, exactly one resolve call is
/// made for the address before anything is written; if the geocoder has no
/// answer, the listing is never persisted.
pub async fn create_listing_document(
    store: &StoreClient,
    geocoder: &GeocoderClient,
    identity: &Identity,
    req: CreateListingRequest,
) -> Result<(String, Listing), ListingCreateError> {
    let coords = match Coordinates::from_pair(req.lat, req.lng) {
        Some(coords) => coords,
        None => geocoder.resolve(&req.address).await?.coordinates(),
    };

    let listing = Listing {
        id: String::new(),
        title: req.title,
        address: req.address,
        lat: Some(coords.latitude),
        lng: Some(coords.longitude),
        rent: req.rent,
        looking_for_gender: req.looking_for_gender,
        occupancy: req.occupancy,
        highlights: req.highlights,
        amenities: req.amenities,
        description: req.description,
        owner_id: identity.user_id.clone(),
        // Listing photo upload is disabled in the current build.
        image_urls: vec![],
        created_at: Some(chrono::Utc::now()),
    };

    let collection = store.collections().listings.clone();
    let id = store.create_document(&collection, &listing).await?;

    Ok((id, listing))
}

/// Errors from the owner-checked update flow
#[derive(Debug, Error)]
pub enum ListingUpdateError {
    #[error("coordinates must be supplied as a pair")]
    HalfCoordinates,

    #[error("only the listing owner can edit it")]
    NotOwner,

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid update payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Owner-checked partial update of a listing.
///
/// Coordinates may only arrive as a pair; a lone latitude or longitude
/// would otherwise be patched field-wise onto the stored document and pair
/// a fresh half with a stale one. A changed address without a fresh pair
/// is re-resolved before the patch, so stored coordinates always describe
/// the stored address.
pub async fn update_listing_document(
    store: &StoreClient,
    geocoder: &GeocoderClient,
    identity: &Identity,
    id: &str,
    mut update: UpdateListingRequest,
) -> Result<(), ListingUpdateError> {
    if update.lat.is_some() != update.lng.is_some() {
        return Err(ListingUpdateError::HalfCoordinates);
    }

    let collection = store.collections().listings.clone();
    let existing: Listing = store.get_document(&collection, id).await?;

    if existing.owner_id != identity.user_id {
        return Err(ListingUpdateError::NotOwner);
    }

    if update.address.is_some() && Coordinates::from_pair(update.lat, update.lng).is_none() {
        let address = update.address.as_deref().unwrap_or_default();
        let coords = geocoder.resolve(address).await?.coordinates();
        update.lat = Some(coords.latitude);
        update.lng = Some(coords.longitude);
    }

    let fields = serde_json::to_value(&update)?;
    store.update_document(&collection, id, fields).await?;

    Ok(())
}

/// Create listing endpoint
///
/// POST /api/v1/listings
async fn create_listing(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<CreateListingRequest>,
) -> impl Responder {
    let identity = match require_identity(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_listing: {}", errors);
        return HttpResponse::BadRequest().json(error_body(
            400,
            "validation_failed",
            "Please fill in all required fields.",
        ));
    }

    match create_listing_document(&state.store, &state.geocoder, &identity, req.into_inner()).await
    {
        Ok((id, _listing)) => {
            tracing::info!("Created listing {} for {}", id, identity.user_id);
            state.cache.invalidate(&CacheKey::listings()).await;
            HttpResponse::Created().json(CreatedResponse { id })
        }
        Err(ListingCreateError::Geocode(GeocodeError::NotFound(address))) => {
            tracing::info!("Aborting listing creation, location not found: {}", address);
            HttpResponse::UnprocessableEntity().json(error_body(
                422,
                "location_not_found",
                "Could not find coordinates for this address.",
            ))
        }
        Err(ListingCreateError::Geocode(e)) => {
            tracing::error!("Geocoding failed during listing creation: {}", e);
            HttpResponse::BadGateway().json(error_body(502, "geocoding_failed", e.to_string()))
        }
        Err(ListingCreateError::Store(e)) => {
            tracing::error!("Failed to persist listing: {}", e);
            HttpResponse::BadGateway().json(error_body(502, "store_unavailable", e.to_string()))
        }
    }
}

/// Search listings endpoint
///
/// POST /api/v1/listings/search
///
/// Request body:
/// ```json
/// {
///   "gender": "Female",
///   "query": "Hinjewadi",
///   "location": {"latitude": 18.59, "longitude": 73.73},
///   "radiusKm": 10,
///   "viewerId": "string"
/// }
/// ```
async fn search_listings(
    state: web::Data<AppState>,
    req: web::Json<SearchRequest>,
) -> impl Responder {
    let req = req.into_inner();

    let (mode, resolved_location) = match resolve_search_mode(&state, &req).await {
        Ok(parts) => parts,
        Err(response) => return response,
    };

    let listings = match fetch_listings(&state).await {
        Ok(listings) => listings,
        Err(response) => return response,
    };

    let tags = viewer_tags(&state, req.viewer_id.as_deref()).await;

    let results = state
        .engine
        .search_listings(listings, req.gender, &mode, &tags, req.radius_km);

    tracing::info!("Listing search returned {} results (mode: {:?})", results.len(), mode);

    HttpResponse::Ok().json(SearchListingsResponse {
        total: results.len(),
        results,
        resolved_location,
    })
}

/// Fetch the caller's own listings
///
/// GET /api/v1/listings/mine
async fn my_listings(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let identity = match require_identity(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    let collection = state.store.collections().listings.clone();
    match state
        .store
        .query_equal::<Listing>(&collection, "ownerId", &identity.user_id)
        .await
    {
        Ok(listings) => HttpResponse::Ok().json(listings),
        Err(e) => {
            tracing::error!("Failed to fetch listings for {}: {}", identity.user_id, e);
            HttpResponse::BadGateway().json(error_body(502, "store_unavailable", e.to_string()))
        }
    }
}

/// Fetch a single listing
///
/// GET /api/v1/listings/{id}
async fn get_listing(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let collection = state.store.collections().listings.clone();

    match state.store.get_document::<Listing>(&collection, &id).await {
        Ok(listing) => HttpResponse::Ok().json(listing),
        Err(StoreError::NotFound(_)) => HttpResponse::NotFound().json(error_body(
            404,
            "not_found",
            format!("Listing {} does not exist", id),
        )),
        Err(e) => {
            tracing::error!("Failed to fetch listing {}: {}", id, e);
            HttpResponse::BadGateway().json(error_body(502, "store_unavailable", e.to_string()))
        }
    }
}

/// Update a listing's fields (owner only)
///
/// PATCH /api/v1/listings/{id}
async fn update_listing(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    path: web::Path<String>,
    req: web::Json<UpdateListingRequest>,
) -> impl Responder {
    let identity = match require_identity(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    let id = path.into_inner();

    match update_listing_document(&state.store, &state.geocoder, &identity, &id, req.into_inner())
        .await
    {
        Ok(()) => {
            state.cache.invalidate(&CacheKey::listings()).await;
            tracing::info!("Updated listing {} for {}", id, identity.user_id);
            HttpResponse::Ok().json(CreatedResponse { id })
        }
        Err(ListingUpdateError::HalfCoordinates) => HttpResponse::BadRequest().json(error_body(
            400,
            "invalid_coordinates",
            "Latitude and longitude must be supplied together.",
        )),
        Err(ListingUpdateError::NotOwner) => HttpResponse::Forbidden().json(error_body(
            403,
            "not_owner",
            "Only the listing owner can edit it",
        )),
        Err(ListingUpdateError::Store(StoreError::NotFound(_))) => HttpResponse::NotFound()
            .json(error_body(404, "not_found", format!("Listing {} does not exist", id))),
        Err(ListingUpdateError::Geocode(GeocodeError::NotFound(_))) => {
            HttpResponse::UnprocessableEntity().json(error_body(
                422,
                "location_not_found",
                "Could not find coordinates for this address.",
            ))
        }
        Err(ListingUpdateError::Geocode(e)) => {
            tracing::error!("Geocoding failed during listing update: {}", e);
            HttpResponse::BadGateway().json(error_body(502, "geocoding_failed", e.to_string()))
        }
        Err(ListingUpdateError::Encode(e)) => {
            HttpResponse::BadRequest().json(error_body(400, "invalid_update", e.to_string()))
        }
        Err(ListingUpdateError::Store(e)) => {
            tracing::error!("Failed to update listing {}: {}", id, e);
            HttpResponse::BadGateway().json(error_body(502, "store_unavailable", e.to_string()))
        }
    }
}
