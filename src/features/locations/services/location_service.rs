use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::geocoding::models::{is_valid_coordinate, AddressFragments, GeocodingResult};
use crate::features::geocoding::services::Geocoder;
use crate::features::locations::models::{FormBinding, ResolvedHierarchy, SyncStatus};
use crate::features::locations::services::{FormBinder, HierarchyResolver, SyncStatusEvaluator};

/// What the user gave us to locate a report
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// From photo EXIF or browser geolocation
    Coordinates { lat: f64, lon: f64 },
    /// Fragments typed by the user
    Address(AddressFragments),
    /// Free-form address, forward geocoded first
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Coordinates,
    Address,
    Text,
}

impl LocationQuery {
    pub fn source(&self) -> ResolutionSource {
        match self {
            LocationQuery::Coordinates { .. } => ResolutionSource::Coordinates,
            LocationQuery::Address(_) => ResolutionSource::Address,
            LocationQuery::Text(_) => ResolutionSource::Text,
        }
    }
}

/// Everything one resolution produced. A plain value: applying it to a form
/// is a separate step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationResolution {
    pub source: ResolutionSource,
    pub geocoding: Option<GeocodingResult>,
    pub hierarchy: ResolvedHierarchy,
    pub status: SyncStatus,
    pub binding: FormBinding,
    /// Malformed coordinates or an empty query; nothing was looked up
    pub invalid_input: bool,
    pub resolved_at: DateTime<Utc>,
}

/// Runs the pipeline: geocode, resolve the hierarchy, evaluate, bind
pub struct LocationService {
    geocoder: Arc<dyn Geocoder>,
    resolver: Arc<HierarchyResolver>,
    evaluator: SyncStatusEvaluator,
    binder: FormBinder,
}

impl LocationService {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        resolver: Arc<HierarchyResolver>,
        evaluator: SyncStatusEvaluator,
    ) -> Self {
        Self {
            geocoder,
            resolver,
            evaluator,
            binder: FormBinder::new(evaluator.confirm_threshold()),
        }
    }

    pub async fn resolve(&self, query: &LocationQuery) -> Result<LocationResolution> {
        match query {
            LocationQuery::Coordinates { lat, lon } => self.resolve_coordinates(*lat, *lon).await,
            LocationQuery::Address(fragments) => self.resolve_address(fragments).await,
            LocationQuery::Text(text) => self.resolve_text(text).await,
        }
    }

    pub async fn resolve_coordinates(&self, lat: f64, lon: f64) -> Result<LocationResolution> {
        let source = ResolutionSource::Coordinates;

        if !is_valid_coordinate(lat, lon) {
            tracing::debug!("Ignoring invalid coordinates ({}, {})", lat, lon);
            return Ok(self.empty(source, true));
        }

        match self.geocoder.reverse_geocode(lat, lon).await? {
            Some(geocoding) => self.finish(source, geocoding).await,
            None => {
                tracing::info!("No address found at ({}, {})", lat, lon);
                Ok(self.empty(source, false))
            }
        }
    }

    /// Manually entered fragments; the geocoder is not involved
    pub async fn resolve_address(&self, fragments: &AddressFragments) -> Result<LocationResolution> {
        let source = ResolutionSource::Address;

        if fragments.is_empty() {
            return Ok(self.empty(source, true));
        }

        let hierarchy = self.resolver.resolve_fragments(fragments).await?;
        Ok(self.conclude(source, None, hierarchy))
    }

    pub async fn resolve_text(&self, text: &str) -> Result<LocationResolution> {
        let source = ResolutionSource::Text;
        let text = text.trim();

        if text.is_empty() {
            return Ok(self.empty(source, true));
        }

        match self.geocoder.geocode(text).await? {
            Some(geocoding) => self.finish(source, geocoding).await,
            None => {
                tracing::info!("No geocoding result for query: {}", text);
                Ok(self.empty(source, false))
            }
        }
    }

    /// Raw reverse geocoding without matching
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Option<GeocodingResult>> {
        if !is_valid_coordinate(lat, lon) {
            return Err(AppError::Validation(format!(
                "Invalid coordinates ({}, {})",
                lat, lon
            )));
        }
        self.geocoder.reverse_geocode(lat, lon).await
    }

    async fn finish(
        &self,
        source: ResolutionSource,
        geocoding: GeocodingResult,
    ) -> Result<LocationResolution> {
        let hierarchy = self.resolver.resolve(&geocoding).await?;
        Ok(self.conclude(source, Some(geocoding), hierarchy))
    }

    fn conclude(
        &self,
        source: ResolutionSource,
        geocoding: Option<GeocodingResult>,
        hierarchy: ResolvedHierarchy,
    ) -> LocationResolution {
        let status = self.evaluator.evaluate(&hierarchy);
        let binding = self.binder.bind(&hierarchy, &status);

        tracing::info!(
            "Location resolved via {:?}: state={:?} overall={:.3} applied={:?}",
            source,
            status.state,
            status.overall_confidence,
            binding.applied_fields
        );

        LocationResolution {
            source,
            geocoding,
            hierarchy,
            status,
            binding,
            invalid_input: false,
            resolved_at: Utc::now(),
        }
    }

    fn empty(&self, source: ResolutionSource, invalid_input: bool) -> LocationResolution {
        let mut resolution = self.conclude(source, None, ResolvedHierarchy::empty());
        resolution.invalid_input = invalid_input;
        resolution
    }
}
