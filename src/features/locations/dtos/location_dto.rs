use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::geocoding::models::AddressFragments;
use crate::features::locations::models::{FieldValue, LocationForm, MatchResult, SyncStatus};
use crate::features::locations::services::form_session_service::{
    ApplyOutcome, FieldEdit, SessionResolution,
};
use crate::features::locations::services::{FormSession, LocationQuery, LocationResolution};
use crate::features::regions::models::{AdminLevel, AdministrativeUnit};
use crate::shared::validation::REGION_CODE_REGEX;

/// Address fragments typed by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressInputDto {
    #[validate(length(max = 255, message = "Street must not exceed 255 characters"))]
    pub street: Option<String>,

    /// Kecamatan
    #[validate(length(max = 120, message = "District must not exceed 120 characters"))]
    pub district: Option<String>,

    /// Kabupaten/Kota
    #[validate(length(max = 120, message = "City must not exceed 120 characters"))]
    pub city: Option<String>,

    #[validate(length(max = 120, message = "Province must not exceed 120 characters"))]
    pub province: Option<String>,
}

impl From<AddressInputDto> for AddressFragments {
    fn from(dto: AddressInputDto) -> Self {
        Self {
            street: dto.street,
            district: dto.district,
            city: dto.city,
            province: dto.province,
        }
    }
}

/// Request DTO for resolving a location.
///
/// Coordinates take precedence over address fragments, which take precedence
/// over the free-text query. An empty request yields an empty resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveLocationDto {
    pub lat: Option<f64>,
    pub lon: Option<f64>,

    #[validate(nested)]
    pub address: Option<AddressInputDto>,

    /// Free-form address, forward geocoded before matching
    #[validate(length(max = 500, message = "Query must not exceed 500 characters"))]
    pub query: Option<String>,
}

impl ResolveLocationDto {
    pub fn into_query(self) -> Result<LocationQuery> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => return Ok(LocationQuery::Coordinates { lat, lon }),
            (Some(_), None) | (None, Some(_)) => {
                return Err(AppError::Validation(
                    "lat and lon must be provided together".to_string(),
                ))
            }
            (None, None) => {}
        }

        if let Some(address) = self.address {
            let fragments = AddressFragments::from(address);
            if !fragments.is_empty() {
                return Ok(LocationQuery::Address(fragments));
            }
        }

        Ok(LocationQuery::Text(self.query.unwrap_or_default()))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReverseGeocodeQuery {
    pub lat: f64,
    pub lon: f64,
}

/// Query params for a single-level region search
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RegionSearchQuery {
    /// `province`, `regency` or `district`
    pub level: AdminLevel,

    #[validate(length(min = 1, max = 120, message = "Query must be 1-120 characters"))]
    pub query: String,

    /// Required below province level
    #[validate(regex(path = *REGION_CODE_REGEX, message = "Invalid region code"))]
    pub parent_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionSearchResponseDto {
    pub result: MatchResult,
    pub unit: Option<AdministrativeUnit>,
}

/// Manual edit of one form field. Omit both values to clear the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManualFieldEditDto {
    #[validate(regex(path = *REGION_CODE_REGEX, message = "Invalid region code"))]
    pub code: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
}

impl ManualFieldEditDto {
    /// Code and name are set together or not at all
    pub fn into_value(self) -> Result<Option<FieldValue>> {
        match (self.code, self.name) {
            (Some(code), Some(name)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(AppError::Validation("name must not be blank".to_string()));
                }
                Ok(Some(FieldValue::new(code, name)))
            }
            (None, None) => Ok(None),
            _ => Err(AppError::Validation(
                "code and name must be provided together".to_string(),
            )),
        }
    }
}

/// Response DTO for a form session
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormSessionResponseDto {
    pub id: Uuid,
    pub form: LocationForm,
    pub latest_sequence: u64,
    pub applied_sequence: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SyncStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FormSession> for FormSessionResponseDto {
    fn from(session: FormSession) -> Self {
        Self {
            id: session.id,
            form: session.form,
            latest_sequence: session.latest_sequence,
            applied_sequence: session.applied_sequence,
            status: session.status,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

/// Response DTO for resolving a location into a session
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResolutionResponseDto {
    pub sequence: u64,
    /// False when a newer request or a manual edit superseded this one
    pub applied: bool,
    pub applied_fields: Vec<AdminLevel>,
    pub cleared_fields: Vec<AdminLevel>,
    pub resolution: LocationResolution,
    pub session: FormSessionResponseDto,
}

impl From<SessionResolution> for SessionResolutionResponseDto {
    fn from(result: SessionResolution) -> Self {
        let (applied, applied_fields, cleared_fields) = match result.outcome {
            ApplyOutcome::Applied {
                applied_fields,
                cleared_fields,
            } => (true, applied_fields, cleared_fields),
            ApplyOutcome::Stale { .. } => (false, Vec::new(), Vec::new()),
        };

        Self {
            sequence: result.sequence,
            applied,
            applied_fields,
            cleared_fields,
            resolution: result.resolution,
            session: result.session.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldEditResponseDto {
    pub session: FormSessionResponseDto,
    pub cleared_fields: Vec<AdminLevel>,
}

impl From<FieldEdit> for FieldEditResponseDto {
    fn from(edit: FieldEdit) -> Self {
        Self {
            session: edit.session.into(),
            cleared_fields: edit.cleared_fields,
        }
    }
}
