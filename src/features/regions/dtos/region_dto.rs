use serde::Deserialize;

use crate::core::error::{AppError, Result};
use crate::features::regions::models::{derive_parent_code, AdminLevel, AdministrativeUnit};

/// A province, regency, or district record as served by the regions API.
///
/// Parent codes are optional on the wire; unknown fields (ids, coordinates)
/// are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRecordDto {
    pub code: String,
    pub name: String,
    #[serde(default, alias = "province_code")]
    pub province_code: Option<String>,
    #[serde(default, alias = "regency_code")]
    pub regency_code: Option<String>,
}

/// `ApiResponse` envelope wrapping a list of records
#[derive(Debug, Clone, Deserialize)]
pub struct RegionListEnvelope {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<RegionRecordDto>>,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

/// The regions API answers list endpoints either with a bare array or with
/// an `ApiResponse` envelope. Both shapes are decoded here and nowhere else.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RegionListPayload {
    Bare(Vec<RegionRecordDto>),
    Wrapped(RegionListEnvelope),
}

impl RegionListPayload {
    /// Unwrap the record list, turning failed envelopes into errors
    pub fn into_records(self) -> Result<Vec<RegionRecordDto>> {
        match self {
            RegionListPayload::Bare(records) => Ok(records),
            RegionListPayload::Wrapped(envelope) if !envelope.success => {
                Err(AppError::ExternalServiceError(format!(
                    "Regions API reported failure: {}",
                    envelope.message.unwrap_or_else(|| "no message".to_string())
                )))
            }
            RegionListPayload::Wrapped(envelope) => envelope.data.ok_or_else(|| {
                AppError::ExternalServiceError(
                    "Regions API response envelope has no data".to_string(),
                )
            }),
        }
    }

    /// Decode into administrative units of `level`.
    ///
    /// `scope_code` is the parent code the list was requested for; it is the
    /// last resort when neither the payload nor the code itself names a parent.
    pub fn into_units(
        self,
        level: AdminLevel,
        scope_code: Option<&str>,
    ) -> Result<Vec<AdministrativeUnit>> {
        let records = self.into_records()?;
        Ok(records
            .into_iter()
            .map(|record| record.into_unit(level, scope_code))
            .collect())
    }
}

impl RegionRecordDto {
    pub fn into_unit(self, level: AdminLevel, scope_code: Option<&str>) -> AdministrativeUnit {
        let wire_parent = match level {
            AdminLevel::Province => None,
            AdminLevel::Regency => self.province_code,
            AdminLevel::District => self.regency_code,
        };

        let parent_code = match level {
            AdminLevel::Province => None,
            _ => wire_parent
                .filter(|p| !p.trim().is_empty())
                .or_else(|| derive_parent_code(&self.code, level))
                .or_else(|| scope_code.map(str::to_string)),
        };

        AdministrativeUnit {
            level,
            code: self.code.trim().to_string(),
            name: self.name.trim().to_string(),
            parent_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bare_array() {
        let json = r#"[{"code":"32","name":"Jawa Barat"},{"code":"31","name":"DKI Jakarta"}]"#;
        let payload: RegionListPayload = serde_json::from_str(json).unwrap();
        let units = payload.into_units(AdminLevel::Province, None).unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].code, "32");
        assert_eq!(units[0].parent_code, None);
    }

    #[test]
    fn test_decode_wrapped_envelope() {
        let json = r#"{
            "success": true,
            "data": [{"id":"0195f7a2-0000-7000-8000-000000000000","code":"32.75","name":"Kota Bekasi","lat":-6.24,"lng":106.99}],
            "message": null,
            "meta": null,
            "errors": null
        }"#;
        let payload: RegionListPayload = serde_json::from_str(json).unwrap();
        let units = payload.into_units(AdminLevel::Regency, Some("32")).unwrap();

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].name, "Kota Bekasi");
        assert_eq!(units[0].parent_code.as_deref(), Some("32"));
    }

    #[test]
    fn test_failed_envelope_is_external_error() {
        let json = r#"{"success":false,"data":null,"message":"Province with code '99' not found"}"#;
        let payload: RegionListPayload = serde_json::from_str(json).unwrap();
        let err = payload.into_records().unwrap_err();

        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }

    #[test]
    fn test_envelope_without_data_is_external_error() {
        let payload: RegionListPayload = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(payload.into_records().is_err());
    }

    #[test]
    fn test_wire_parent_code_wins_over_derived() {
        let json = r#"[{"code":"32.75.01","name":"Bekasi Timur","regencyCode":"32.16"}]"#;
        let payload: RegionListPayload = serde_json::from_str(json).unwrap();
        let units = payload
            .into_units(AdminLevel::District, Some("32.75"))
            .unwrap();

        // A payload that contradicts the scope is kept as-is so the resolver can detect it
        assert_eq!(units[0].parent_code.as_deref(), Some("32.16"));
    }

    #[test]
    fn test_parent_code_falls_back_to_scope() {
        let json = r#"[{"code":"KB-01","name":"Bekasi Timur"}]"#;
        let payload: RegionListPayload = serde_json::from_str(json).unwrap();
        let units = payload
            .into_units(AdminLevel::District, Some("32.75"))
            .unwrap();

        assert_eq!(units[0].parent_code.as_deref(), Some("32.75"));
    }

    #[test]
    fn test_snake_case_parent_alias() {
        let json = r#"[{"code":"3275","name":"Kota Bekasi","province_code":"32"}]"#;
        let payload: RegionListPayload = serde_json::from_str(json).unwrap();
        let units = payload.into_units(AdminLevel::Regency, None).unwrap();

        assert_eq!(units[0].parent_code.as_deref(), Some("32"));
    }
}
