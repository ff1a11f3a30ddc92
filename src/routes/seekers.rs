use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    derive_city, CreatedResponse, SearchRequest, SearchSeekersResponse, SeekerProfile,
    UpsertSeekerRequest,
};
use crate::routes::{
    error_body, fetch_seekers, require_identity, resolve_search_mode, viewer_tags, AppState,
};
use crate::services::{CacheKey, StoreError};

/// Configure all seeker routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/seekers", web::put().to(upsert_seeker))
        .route("/seekers/search", web::post().to(search_seekers))
        .route("/seekers/{id}", web::get().to(get_seeker));
}

/// Create or overwrite the caller's seeker posting
///
/// PUT /api/v1/seekers
///
/// The document id equals the authenticated user's id, so each user holds
/// at most one posting and a repeat submit replaces the previous one
/// wholesale. Location text is stored as typed; no geocoding happens here.
async fn upsert_seeker(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<UpsertSeekerRequest>,
) -> impl Responder {
    let identity = match require_identity(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for upsert_seeker: {}", errors);
        return HttpResponse::BadRequest().json(error_body(
            400,
            "validation_failed",
            "Please fill in all required fields.",
        ));
    }

    let req = req.into_inner();

    let profile = SeekerProfile {
        id: identity.user_id.clone(),
        user_id: identity.user_id.clone(),
        city: derive_city(&req.location),
        location: req.location,
        lat: req.lat,
        lng: req.lng,
        gender: req.gender,
        budget: req.budget,
        occupancy: req.occupancy,
        highlights: req.highlights,
        interested_in_pg: req.interested_in_pg,
        mobile_visible: req.mobile_visible,
        bio: req.bio,
        name: identity.name.clone(),
        email: identity.email.clone(),
        profile_pic_url: identity.photo_url.clone(),
        created_at: Some(chrono::Utc::now()),
    };

    let collection = state.store.collections().seekers.clone();
    match state
        .store
        .set_document(&collection, &identity.user_id, &profile)
        .await
    {
        Ok(()) => {
            state.cache.invalidate(&CacheKey::seekers()).await;
            tracing::info!("Upserted seeker profile for {}", identity.user_id);
            HttpResponse::Ok().json(CreatedResponse { id: identity.user_id })
        }
        Err(e) => {
            tracing::error!("Failed to upsert seeker profile: {}", e);
            HttpResponse::BadGateway().json(error_body(502, "store_unavailable", e.to_string()))
        }
    }
}

/// Search seeker postings
///
/// POST /api/v1/seekers/search
async fn search_seekers(
    state: web::Data<AppState>,
    req: web::Json<SearchRequest>,
) -> impl Responder {
    let req = req.into_inner();

    let (mode, resolved_location) = match resolve_search_mode(&state, &req).await {
        Ok(parts) => parts,
        Err(response) => return response,
    };

    let seekers = match fetch_seekers(&state).await {
        Ok(seekers) => seekers,
        Err(response) => return response,
    };

    let tags = viewer_tags(&state, req.viewer_id.as_deref()).await;

    let results = state
        .engine
        .search_seekers(seekers, req.gender, &mode, &tags, req.radius_km);

    tracing::info!("Seeker search returned {} results (mode: {:?})", results.len(), mode);

    HttpResponse::Ok().json(SearchSeekersResponse {
        total: results.len(),
        results,
        resolved_location,
    })
}

/// Fetch a single seeker posting
///
/// GET /api/v1/seekers/{id}
async fn get_seeker(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let collection = state.store.collections().seekers.clone();

    match state
        .store
        .get_document::<SeekerProfile>(&collection, &id)
        .await
    {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(StoreError::NotFound(_)) => HttpResponse::NotFound().json(error_body(
            404,
            "not_found",
            format!("Seeker posting {} does not exist", id),
        )),
        Err(e) => {
            tracing::error!("Failed to fetch seeker {}: {}", id, e);
            HttpResponse::BadGateway().json(error_body(502, "store_unavailable", e.to_string()))
        }
    }
}
