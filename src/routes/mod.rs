// Route exports
pub mod geocode;
pub mod listings;
pub mod profiles;
pub mod seekers;

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::{filters::SearchMode, SearchEngine};
use crate::models::{
    ErrorResponse, GeocodeCandidate, HealthResponse, Listing, SearchRequest, SeekerProfile,
    UserProfile,
};
use crate::services::{
    CacheKey, CollectionCache, GeocodeError, GeocoderClient, Identity, IdentityVerifier,
    StorageClient, StoreClient, SuggestScheduler,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StoreClient>,
    pub geocoder: Arc<GeocoderClient>,
    pub suggest: Arc<SuggestScheduler>,
    pub storage: Arc<StorageClient>,
    pub verifier: Arc<IdentityVerifier>,
    pub cache: Arc<CollectionCache>,
    pub engine: SearchEngine,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(listings::configure)
            .configure(seekers::configure)
            .configure(profiles::configure)
            .configure(geocode::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await;

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

pub(crate) fn error_body(status: u16, error: &str, message: impl Into<String>) -> ErrorResponse {
    ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status,
    }
}

/// Resolve the caller's identity or produce the 401 response directing the
/// user to authenticate.
pub(crate) fn require_identity(
    state: &AppState,
    req: &HttpRequest,
) -> Result<Identity, HttpResponse> {
    state.verifier.identify(req).map_err(|e| {
        tracing::info!("Rejected unauthenticated request to {}: {}", req.path(), e);
        HttpResponse::Unauthorized().json(error_body(
            401,
            "authentication_required",
            "Please log in to continue",
        ))
    })
}

/// Determine the active search mode for a request.
///
/// A pre-resolved location always wins. Otherwise a non-empty query is
/// resolved on submit: one geocode call, whose "not found" outcome degrades
/// to substring matching rather than failing the search. Provider failures
/// surface as a transient 502.
pub(crate) async fn resolve_search_mode(
    state: &AppState,
    req: &SearchRequest,
) -> Result<(SearchMode, Option<GeocodeCandidate>), HttpResponse> {
    if let Some(origin) = req.location {
        return Ok((SearchMode::Proximity(origin), None));
    }

    let query = match req.query.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q,
        _ => return Ok((SearchMode::None, None)),
    };

    match state.geocoder.resolve(query).await {
        Ok(candidate) => {
            let origin = candidate.coordinates();
            Ok((SearchMode::Proximity(origin), Some(candidate)))
        }
        Err(GeocodeError::NotFound(_)) => {
            tracing::info!("Location not found for {:?}, falling back to text match", query);
            Ok((SearchMode::Text(query.to_string()), None))
        }
        Err(e) => {
            tracing::error!("Geocoding failed for {:?}: {}", query, e);
            Err(HttpResponse::BadGateway().json(error_body(
                502,
                "geocoding_failed",
                "Failed to search location. Please try again.",
            )))
        }
    }
}

/// Fetch the full listing collection, through the in-memory cache.
pub(crate) async fn fetch_listings(state: &AppState) -> Result<Vec<Listing>, HttpResponse> {
    let key = CacheKey::listings();
    if let Ok(cached) = state.cache.get::<Vec<Listing>>(&key).await {
        return Ok(cached);
    }

    let collection = state.store.collections().listings.clone();
    let listings: Vec<Listing> = state.store.list_documents(&collection).await.map_err(|e| {
        tracing::error!("Failed to fetch listings: {}", e);
        HttpResponse::BadGateway().json(error_body(502, "store_unavailable", e.to_string()))
    })?;

    if let Err(e) = state.cache.set(&key, &listings).await {
        tracing::warn!("Failed to cache listings: {}", e);
    }

    Ok(listings)
}

/// Fetch the full seeker collection, through the in-memory cache.
pub(crate) async fn fetch_seekers(state: &AppState) -> Result<Vec<SeekerProfile>, HttpResponse> {
    let key = CacheKey::seekers();
    if let Ok(cached) = state.cache.get::<Vec<SeekerProfile>>(&key).await {
        return Ok(cached);
    }

    let collection = state.store.collections().seekers.clone();
    let seekers: Vec<SeekerProfile> =
        state.store.list_documents(&collection).await.map_err(|e| {
            tracing::error!("Failed to fetch seekers: {}", e);
            HttpResponse::BadGateway().json(error_body(502, "store_unavailable", e.to_string()))
        })?;

    if let Err(e) = state.cache.set(&key, &seekers).await {
        tracing::warn!("Failed to cache seekers: {}", e);
    }

    Ok(seekers)
}

/// Preference tags of the viewing user, when known. Any failure (no viewer,
/// profile absent, store error) degrades to an empty set, which routes the
/// match scorer to its filler path.
pub(crate) async fn viewer_tags(state: &AppState, viewer_id: Option<&str>) -> Vec<String> {
    let Some(viewer_id) = viewer_id else {
        return vec![];
    };

    let key = CacheKey::profile(viewer_id);
    if let Ok(profile) = state.cache.get::<UserProfile>(&key).await {
        return profile.preferences;
    }

    let collection = state.store.collections().users.clone();
    match state.store.get_document::<UserProfile>(&collection, viewer_id).await {
        Ok(profile) => {
            if let Err(e) = state.cache.set(&key, &profile).await {
                tracing::warn!("Failed to cache profile {}: {}", viewer_id, e);
            }
            profile.preferences
        }
        Err(e) => {
            tracing::debug!("No preferences for viewer {}: {}", viewer_id, e);
            vec![]
        }
    }
}
