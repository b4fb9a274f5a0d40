use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::geocoding::models::GeocodingResult;
use crate::features::locations::dtos::{
    RegionSearchQuery, RegionSearchResponseDto, ResolveLocationDto, ReverseGeocodeQuery,
};
use crate::features::locations::services::{
    LocationResolution, LocationService, RegionSearchService,
};
use crate::features::regions::models::AdminLevel;
use crate::shared::types::ApiResponse;

/// Resolve coordinates, address fragments or a free-text address
///
/// Returns the matched hierarchy, its sync status and the fields that may be
/// auto-filled. Invalid or empty input yields an empty resolution, not an error.
#[utoipa::path(
    post,
    path = "/api/locations/resolve",
    request_body = ResolveLocationDto,
    responses(
        (status = 200, description = "Location resolved", body = ApiResponse<LocationResolution>),
        (status = 400, description = "Validation error"),
        (status = 502, description = "Geocoding or regions API unavailable")
    ),
    tag = "locations"
)]
pub async fn resolve_location(
    State(service): State<Arc<LocationService>>,
    AppJson(dto): AppJson<ResolveLocationDto>,
) -> Result<Json<ApiResponse<LocationResolution>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let resolution = service.resolve(&dto.into_query()?).await?;
    let message = resolution
        .status
        .needs_review()
        .then(|| "Please confirm the detected location".to_string());
    Ok(Json(ApiResponse::success(Some(resolution), message, None)))
}

/// Reverse geocode coordinates without matching them
#[utoipa::path(
    get,
    path = "/api/locations/reverse",
    params(ReverseGeocodeQuery),
    responses(
        (status = 200, description = "Geocoding result, empty when nothing was found", body = ApiResponse<GeocodingResult>),
        (status = 400, description = "Invalid coordinates"),
        (status = 502, description = "Geocoding service unavailable")
    ),
    tag = "locations"
)]
pub async fn reverse_geocode(
    State(service): State<Arc<LocationService>>,
    Query(query): Query<ReverseGeocodeQuery>,
) -> Result<Json<ApiResponse<GeocodingResult>>> {
    let result = service.reverse_geocode(query.lat, query.lon).await?;
    let message = result
        .is_none()
        .then(|| "No address found at these coordinates".to_string());
    Ok(Json(ApiResponse::success(result, message, None)))
}

/// Fuzzy search one administrative level
#[utoipa::path(
    get,
    path = "/api/locations/search",
    params(RegionSearchQuery),
    responses(
        (status = 200, description = "Best match", body = ApiResponse<RegionSearchResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 502, description = "Regions API unavailable")
    ),
    tag = "locations"
)]
pub async fn search_regions(
    State(service): State<Arc<RegionSearchService>>,
    Query(query): Query<RegionSearchQuery>,
) -> Result<Json<ApiResponse<RegionSearchResponseDto>>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if query.level != AdminLevel::Province && query.parent_code.is_none() {
        return Err(AppError::Validation(format!(
            "parentCode is required to search {}",
            query.level
        )));
    }

    let result = service
        .search(query.level, query.parent_code.as_deref(), &query.query)
        .await?;
    let unit = result.to_unit(query.level);

    Ok(Json(ApiResponse::success(
        Some(RegionSearchResponseDto { result, unit }),
        None,
        None,
    )))
}
