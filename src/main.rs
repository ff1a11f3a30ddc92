mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::core::SearchEngine;
use crate::routes::AppState;
use crate::services::{
    CollectionCache, GeocoderClient, IdentityVerifier, StorageClient, StoreClient,
    StoreCollections, SuggestScheduler,
};

/// JSON error response for payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST),
        )
        .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting Roomly matching service...");

    // Initialize document store client
    let collections = StoreCollections {
        listings: settings.collection.listings,
        seekers: settings.collection.seekers,
        users: settings.collection.users,
    };

    let store = Arc::new(StoreClient::new(
        settings.store.endpoint,
        settings.store.api_key,
        settings.store.project_id,
        settings.store.database_id,
        collections,
    ));

    info!("Document store client initialized");

    // Initialize geocoder and the shared suggestion scheduler
    let geocoder = Arc::new(GeocoderClient::new(
        settings.geocoder.endpoint,
        settings.geocoder.api_key,
        settings.geocoder.country_code,
        settings.geocoder.suggest_limit,
    ));

    let suggest = Arc::new(SuggestScheduler::new(
        Arc::clone(&geocoder),
        settings.search.debounce_ms,
        settings.search.min_query_len,
    ));

    info!(
        "Geocoder initialized (debounce: {}ms, min query: {} chars)",
        settings.search.debounce_ms, settings.search.min_query_len
    );

    // Initialize object storage client
    let storage = Arc::new(StorageClient::new(
        settings.storage.endpoint,
        settings.storage.api_key,
        settings.storage.bucket,
    ));

    // Initialize identity verifier
    let verifier = Arc::new(IdentityVerifier::new(&settings.auth.jwt_secret));

    // Initialize in-memory cache
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let max_entries = settings.cache.max_entries.unwrap_or(1000);
    let cache = Arc::new(CollectionCache::new(max_entries, cache_ttl));

    info!("Cache initialized ({} entries, TTL: {}s)", max_entries, cache_ttl);

    // Initialize the search engine with the configured radius
    let engine = SearchEngine::new(settings.search.radius_km);

    info!("Search engine initialized (radius: {}km)", engine.radius_km());

    // Build application state
    let app_state = AppState {
        store,
        geocoder,
        suggest,
        storage,
        verifier,
        cache,
        engine,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))
    .map_err(|e| {
        error!("Failed to bind server: {}", e);
        e
    })?
    .run()
    .await
}
