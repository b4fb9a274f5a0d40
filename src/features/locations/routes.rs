use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::locations::handlers;
use crate::features::locations::services::{
    FormSessionService, LocationService, RegionSearchService,
};

/// Create routes for the locations feature
///
/// Note: This feature is public (no authentication required)
pub fn routes(
    location_service: Arc<LocationService>,
    search_service: Arc<RegionSearchService>,
    session_service: Arc<FormSessionService>,
) -> Router {
    let locations = Router::new()
        .route("/api/locations/resolve", post(handlers::resolve_location))
        .route("/api/locations/reverse", get(handlers::reverse_geocode))
        .with_state(location_service);

    let search = Router::new()
        .route("/api/locations/search", get(handlers::search_regions))
        .with_state(search_service);

    let forms = Router::new()
        .route("/api/location-forms", post(handlers::create_session))
        .route(
            "/api/location-forms/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route(
            "/api/location-forms/{id}/resolve",
            post(handlers::resolve_into_session),
        )
        .route(
            "/api/location-forms/{id}/fields/{field}",
            put(handlers::edit_field),
        )
        .with_state(session_service);

    locations.merge(search).merge(forms)
}
