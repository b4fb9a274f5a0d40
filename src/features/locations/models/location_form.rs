use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::regions::models::AdminLevel;

/// Code and display name of one form field; always written together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    pub code: String,
    pub name: String,
}

impl FieldValue {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Location section of a report form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationForm {
    pub province: Option<FieldValue>,
    pub regency: Option<FieldValue>,
    pub district: Option<FieldValue>,
}

impl LocationForm {
    pub fn get(&self, level: AdminLevel) -> Option<&FieldValue> {
        match level {
            AdminLevel::Province => self.province.as_ref(),
            AdminLevel::Regency => self.regency.as_ref(),
            AdminLevel::District => self.district.as_ref(),
        }
    }

    pub fn set(&mut self, level: AdminLevel, value: Option<FieldValue>) {
        let slot = match level {
            AdminLevel::Province => &mut self.province,
            AdminLevel::Regency => &mut self.regency,
            AdminLevel::District => &mut self.district,
        };
        *slot = value;
    }

    pub fn code(&self, level: AdminLevel) -> Option<&str> {
        self.get(level).map(|v| v.code.as_str())
    }
}
