use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::geocoding::models::GeocodingResult;

/// Third-party geocoding provider.
///
/// Best effort: `Ok(None)` means the provider found nothing, `Err` is a
/// transport failure the caller may retry.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Option<GeocodingResult>>;

    /// Forward geocoding of a free-form address query
    async fn geocode(&self, query: &str) -> Result<Option<GeocodingResult>>;
}
