use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Free-text address fragments, as returned by a geocoder or typed by a user.
///
/// There is no guaranteed vocabulary alignment with the administrative
/// directory; any fragment may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressFragments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// Kecamatan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    /// Kabupaten/Kota
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
}

impl AddressFragments {
    /// True when none of the administrative fragments carries text
    pub fn is_empty(&self) -> bool {
        [&self.district, &self.city, &self.province]
            .iter()
            .all(|f| f.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

/// Result of a single geocoding lookup. Ephemeral: consumed by the resolver
/// and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeocodingResult {
    #[serde(flatten)]
    pub address: AddressFragments,
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Latitude in [-90, 90] and longitude in [-180, 180], both finite
pub fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}
