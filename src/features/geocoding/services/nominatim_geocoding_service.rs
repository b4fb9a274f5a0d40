use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::core::config::NominatimConfig;
use crate::core::error::{AppError, Result};
use crate::features::geocoding::models::{AddressFragments, GeocodingResult};
use crate::features::geocoding::services::Geocoder;

/// Nominatim place (search result or reverse lookup)
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
    pub address: Option<NominatimAddress>,
}

/// Nominatim reverse lookups answer `{"error": "..."}` when nothing is found
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NominatimReverseResponse {
    Place(NominatimPlace),
    NotFound { error: String },
}

/// Nominatim address components relevant to Indonesian addresses
#[derive(Debug, Default, Deserialize)]
pub struct NominatimAddress {
    pub road: Option<String>,
    pub suburb: Option<String>,
    pub city_district: Option<String>,
    pub municipality: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub state: Option<String>,
}

impl NominatimAddress {
    /// Get regency/city, falling back to county, town or village
    pub fn get_city(&self) -> Option<String> {
        self.city
            .clone()
            .or_else(|| self.county.clone())
            .or_else(|| self.town.clone())
            .or_else(|| self.village.clone())
    }

    /// Get kecamatan, falling back to municipality or suburb
    pub fn get_district(&self) -> Option<String> {
        self.city_district
            .clone()
            .or_else(|| self.municipality.clone())
            .or_else(|| self.suburb.clone())
    }
}

impl NominatimPlace {
    /// Convert into a geocoding result; places with unparsable coordinates are dropped
    pub fn into_geocoding_result(self) -> Option<GeocodingResult> {
        let lat = self.lat.parse::<f64>().ok()?;
        let lon = self.lon.parse::<f64>().ok()?;
        let address = self.address.unwrap_or_default();

        Some(GeocodingResult {
            address: AddressFragments {
                street: address.road.clone(),
                district: address.get_district(),
                city: address.get_city(),
                province: address.state.clone(),
            },
            lat,
            lon,
            display_name: Some(self.display_name),
        })
    }
}

/// Service for geocoding addresses using Nominatim
pub struct NominatimGeocodingService {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocodingService {
    pub fn new(config: &NominatimConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn reverse_url(&self, lat: f64, lon: f64) -> String {
        format!(
            "{}/reverse?lat={}&lon={}&format=jsonv2&addressdetails=1&zoom=18&accept-language=id",
            self.base_url, lat, lon
        )
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&format=jsonv2&addressdetails=1&limit=1&countrycodes=id&accept-language=id",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    /// Execute HTTP request to Nominatim.
    ///
    /// `None` when Nominatim has nothing for the request (404). Rate limiting
    /// and server errors are transport failures the caller may retry.
    async fn execute_request(&self, url: &str) -> Result<Option<reqwest::Response>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!("Nominatim request failed: {:?}", e);
            AppError::ExternalServiceError(format!("Nominatim request failed: {}", e))
        })?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::warn!("Nominatim returned status: {}", status);
            return Ok(None);
        }

        if !status.is_success() {
            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!("Nominatim rate limit hit");
            } else {
                tracing::error!("Nominatim returned status: {}", status);
            }
            return Err(AppError::ExternalServiceError(format!(
                "Nominatim returned HTTP {}",
                status
            )));
        }

        Ok(Some(response))
    }
}

fn parse_error(e: reqwest::Error) -> AppError {
    tracing::error!("Failed to parse Nominatim response: {:?}", e);
    AppError::ExternalServiceError(format!("Failed to parse Nominatim response: {}", e))
}

#[async_trait]
impl Geocoder for NominatimGeocodingService {
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Option<GeocodingResult>> {
        let url = self.reverse_url(lat, lon);
        tracing::debug!("Reverse geocoding: ({}, {}) -> {}", lat, lon, url);

        let Some(response) = self.execute_request(&url).await? else {
            return Ok(None);
        };

        match response
            .json::<NominatimReverseResponse>()
            .await
            .map_err(parse_error)?
        {
            NominatimReverseResponse::Place(place) => Ok(place.into_geocoding_result()),
            NominatimReverseResponse::NotFound { error } => {
                tracing::debug!("Nominatim found nothing at ({}, {}): {}", lat, lon, error);
                Ok(None)
            }
        }
    }

    async fn geocode(&self, query: &str) -> Result<Option<GeocodingResult>> {
        let url = self.search_url(query);
        tracing::debug!("Geocoding (free-form): {} -> {}", query, url);

        let Some(response) = self.execute_request(&url).await? else {
            return Ok(None);
        };

        let places: Vec<NominatimPlace> = response.json().await.map_err(parse_error)?;

        Ok(places
            .into_iter()
            .next()
            .and_then(NominatimPlace::into_geocoding_result))
    }
}
