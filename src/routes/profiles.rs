use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::models::{PictureResponse, UpdatePreferencesRequest, UserProfile};
use crate::routes::{error_body, require_identity, AppState};
use crate::services::{CacheKey, StoreError};

/// Configure all profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profiles/preferences", web::patch().to(update_preferences))
        .route("/profiles/picture", web::post().to(upload_picture))
        .route("/profiles/{id}", web::get().to(get_profile));
}

/// Fetch a user profile
///
/// GET /api/v1/profiles/{id}
async fn get_profile(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    let key = CacheKey::profile(&id);
    if let Ok(profile) = state.cache.get::<UserProfile>(&key).await {
        return HttpResponse::Ok().json(profile);
    }

    let collection = state.store.collections().users.clone();
    match state.store.get_document::<UserProfile>(&collection, &id).await {
        Ok(profile) => {
            if let Err(e) = state.cache.set(&key, &profile).await {
                tracing::warn!("Failed to cache profile {}: {}", id, e);
            }
            HttpResponse::Ok().json(profile)
        }
        Err(StoreError::NotFound(_)) => HttpResponse::NotFound().json(error_body(
            404,
            "not_found",
            format!("Profile {} does not exist", id),
        )),
        Err(e) => {
            tracing::error!("Failed to fetch profile {}: {}", id, e);
            HttpResponse::BadGateway().json(error_body(502, "store_unavailable", e.to_string()))
        }
    }
}

/// Replace the caller's preference tags
///
/// PATCH /api/v1/profiles/preferences
async fn update_preferences(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<UpdatePreferencesRequest>,
) -> impl Responder {
    let identity = match require_identity(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    let fields = serde_json::json!({ "preferences": req.into_inner().preferences });
    let collection = state.store.collections().users.clone();

    match state
        .store
        .update_document(&collection, &identity.user_id, fields)
        .await
    {
        Ok(()) => {
            state
                .cache
                .invalidate(&CacheKey::profile(&identity.user_id))
                .await;
            tracing::info!("Updated preferences for {}", identity.user_id);
            HttpResponse::NoContent().finish()
        }
        Err(StoreError::NotFound(_)) => HttpResponse::NotFound().json(error_body(
            404,
            "not_found",
            "Profile does not exist yet",
        )),
        Err(e) => {
            tracing::error!("Failed to update preferences: {}", e);
            HttpResponse::BadGateway().json(error_body(502, "store_unavailable", e.to_string()))
        }
    }
}

/// Upload a profile picture and point the profile at it
///
/// POST /api/v1/profiles/picture
///
/// The raw image bytes form the request body; the Content-Type header names
/// the image format.
async fn upload_picture(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    body: web::Bytes,
) -> impl Responder {
    let identity = match require_identity(&state, &http_req) {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    if body.is_empty() {
        return HttpResponse::BadRequest().json(error_body(
            400,
            "empty_body",
            "Image bytes are required",
        ));
    }

    let content_type = http_req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("image/jpeg")
        .to_string();

    // One object per user; a new upload overwrites the previous picture.
    let object_path = format!("profile_pics/{}", identity.user_id);

    if let Err(e) = state
        .storage
        .upload(&object_path, body.to_vec(), &content_type)
        .await
    {
        tracing::error!("Failed to upload picture for {}: {}", identity.user_id, e);
        return HttpResponse::BadGateway()
            .json(error_body(502, "storage_unavailable", e.to_string()));
    }

    let photo_url = state.storage.public_url(&object_path);

    let fields = serde_json::json!({ "photoUrl": photo_url.clone() });
    let collection = state.store.collections().users.clone();

    match state
        .store
        .update_document(&collection, &identity.user_id, fields)
        .await
    {
        Ok(()) => {
            state
                .cache
                .invalidate(&CacheKey::profile(&identity.user_id))
                .await;
            tracing::info!("Updated profile picture for {}", identity.user_id);
            HttpResponse::Ok().json(PictureResponse { photo_url })
        }
        Err(e) => {
            tracing::error!("Failed to record picture URL: {}", e);
            HttpResponse::BadGateway().json(error_body(502, "store_unavailable", e.to_string()))
        }
    }
}
