use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::regions::models::{AdminLevel, AdministrativeUnit};

/// How a free-text name was matched against the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Synonym,
    Fuzzy,
    None,
}

/// Outcome of matching one administrative level.
///
/// `code` and `name` are either both set or both absent. A `none` match
/// always carries confidence 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
    pub confidence: f64,
    pub match_type: MatchType,
}

impl MatchResult {
    pub fn none() -> Self {
        Self {
            code: None,
            name: None,
            parent_code: None,
            confidence: 0.0,
            match_type: MatchType::None,
        }
    }

    pub fn matched(unit: &AdministrativeUnit, confidence: f64, match_type: MatchType) -> Self {
        Self {
            code: Some(unit.code.clone()),
            name: Some(unit.name.clone()),
            parent_code: unit.parent_code.clone(),
            confidence: confidence.clamp(0.0, 1.0),
            match_type,
        }
    }

    pub fn is_match(&self) -> bool {
        self.match_type != MatchType::None && self.code.is_some()
    }

    /// The matched unit at `level`, if any
    pub fn to_unit(&self, level: AdminLevel) -> Option<AdministrativeUnit> {
        if !self.is_match() {
            return None;
        }
        Some(AdministrativeUnit {
            level,
            code: self.code.clone()?,
            name: self.name.clone()?,
            parent_code: self.parent_code.clone(),
        })
    }
}

impl Default for MatchResult {
    fn default() -> Self {
        Self::none()
    }
}
