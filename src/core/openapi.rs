use utoipa::{Modify, OpenApi};

use crate::features::geocoding::models::{AddressFragments, GeocodingResult};
use crate::features::locations::services::ResolutionSource;
use crate::features::locations::{dtos as locations_dtos, handlers as locations_handlers};
use crate::features::locations::{models as locations_models, services as locations_services};
use crate::features::regions::models::{AdminLevel, AdministrativeUnit};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Locations
        locations_handlers::resolve_location,
        locations_handlers::reverse_geocode,
        locations_handlers::search_regions,
        // Location forms
        locations_handlers::create_session,
        locations_handlers::get_session,
        locations_handlers::resolve_into_session,
        locations_handlers::edit_field,
        locations_handlers::delete_session,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Regions
            AdminLevel,
            AdministrativeUnit,
            // Geocoding
            AddressFragments,
            GeocodingResult,
            ApiResponse<GeocodingResult>,
            // Locations
            locations_models::MatchType,
            locations_models::MatchResult,
            locations_models::ResolvedHierarchy,
            locations_models::SyncState,
            locations_models::SyncStatus,
            locations_models::FieldValue,
            locations_models::LocationForm,
            locations_models::FieldUpdate,
            locations_models::SkippedField,
            locations_models::SkipReason,
            locations_models::FormBinding,
            ResolutionSource,
            locations_services::LocationResolution,
            locations_dtos::AddressInputDto,
            locations_dtos::ResolveLocationDto,
            locations_dtos::RegionSearchResponseDto,
            locations_dtos::ManualFieldEditDto,
            locations_dtos::FormSessionResponseDto,
            locations_dtos::SessionResolutionResponseDto,
            locations_dtos::FieldEditResponseDto,
            ApiResponse<locations_services::LocationResolution>,
            ApiResponse<locations_dtos::RegionSearchResponseDto>,
            ApiResponse<locations_dtos::FormSessionResponseDto>,
            ApiResponse<locations_dtos::SessionResolutionResponseDto>,
            ApiResponse<locations_dtos::FieldEditResponseDto>,
        )
    ),
    tags(
        (name = "locations", description = "Match coordinates or addresses to Indonesian administrative regions"),
        (name = "location-forms", description = "Report form location sessions with stale-response protection"),
    ),
    info(
        title = "Viralkan Core API",
        version = "0.1.0",
        description = "Administrative-location reconciliation for Viralkan road damage reports",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_location_paths() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/locations/resolve"));
        assert!(doc.paths.paths.contains_key("/api/locations/search"));
        assert!(doc
            .paths
            .paths
            .contains_key("/api/location-forms/{id}/fields/{field}"));
    }

    #[test]
    fn test_swagger_info_modifier_overrides_info() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Custom".to_string(),
            version: "9.9.9".to_string(),
            description: "desc".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Custom");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
