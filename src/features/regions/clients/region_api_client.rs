use async_trait::async_trait;
use reqwest::StatusCode;

use crate::core::config::RegionsApiConfig;
use crate::core::error::{AppError, Result};
use crate::features::regions::dtos::RegionListPayload;
use crate::features::regions::models::{AdminLevel, AdministrativeUnit};
use crate::features::regions::services::RegionDirectory;

/// Client for the backend regions API
pub struct RegionApiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl RegionApiClient {
    pub fn new(config: &RegionsApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn provinces_url(&self) -> String {
        format!("{}/api/regions/provinces", self.base_url)
    }

    fn regencies_url(&self, province_code: &str) -> String {
        format!(
            "{}/api/regions/provinces/{}/regencies",
            self.base_url,
            urlencoding::encode(province_code)
        )
    }

    fn districts_url(&self, regency_code: &str) -> String {
        format!(
            "{}/api/regions/regencies/{}/districts",
            self.base_url,
            urlencoding::encode(regency_code)
        )
    }

    /// Fetch a list endpoint and decode it into units of `level`
    async fn fetch_units(
        &self,
        url: &str,
        level: AdminLevel,
        scope_code: Option<&str>,
    ) -> Result<Vec<AdministrativeUnit>> {
        tracing::debug!("Fetching {} list: {}", level, url);

        let mut request = self.http_client.get(url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Regions API request failed: {:?}", e);
            AppError::ExternalServiceError(format!("Regions API request failed: {}", e))
        })?;

        let status = response.status();

        // Unknown parent code: nothing to match against, not a transport failure
        if status == StatusCode::NOT_FOUND {
            tracing::warn!(
                "Regions API has no {} list for parent {:?}",
                level,
                scope_code
            );
            return Ok(Vec::new());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Regions API returned status {}: {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "Regions API returned HTTP {}",
                status
            )));
        }

        let payload: RegionListPayload = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse regions API response: {:?}", e);
            AppError::ExternalServiceError(format!("Failed to parse regions API response: {}", e))
        })?;

        payload.into_units(level, scope_code)
    }
}

#[async_trait]
impl RegionDirectory for RegionApiClient {
    async fn list_provinces(&self) -> Result<Vec<AdministrativeUnit>> {
        self.fetch_units(&self.provinces_url(), AdminLevel::Province, None)
            .await
    }

    async fn list_regencies(&self, province_code: &str) -> Result<Vec<AdministrativeUnit>> {
        self.fetch_units(
            &self.regencies_url(province_code),
            AdminLevel::Regency,
            Some(province_code),
        )
        .await
    }

    async fn list_districts(&self, regency_code: &str) -> Result<Vec<AdministrativeUnit>> {
        self.fetch_units(
            &self.districts_url(regency_code),
            AdminLevel::District,
            Some(regency_code),
        )
        .await
    }
}
