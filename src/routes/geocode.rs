use actix_web::{web, HttpResponse, Responder};

use crate::models::{SuggestQuery, SuggestResponse};
use crate::routes::AppState;

/// Configure geocoding routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/geocode/suggest", web::get().to(suggest));
}

/// Location autocomplete endpoint
///
/// GET /api/v1/geocode/suggest?q=hinj&field=listing-address
///
/// Requests sit out a quiet window before hitting the provider; a newer
/// request for the same field cancels the older one, which then reports
/// `superseded: true` with no suggestions. Queries below the minimum length
/// return empty without touching the provider.
async fn suggest(state: web::Data<AppState>, query: web::Query<SuggestQuery>) -> impl Responder {
    let query = query.into_inner();

    match state.suggest.suggest(&query.field, &query.q).await {
        Some(suggestions) => HttpResponse::Ok().json(SuggestResponse {
            suggestions,
            superseded: false,
        }),
        None => HttpResponse::Ok().json(SuggestResponse {
            suggestions: vec![],
            superseded: true,
        }),
    }
}
