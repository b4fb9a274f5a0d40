use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::MatchResult;
use crate::features::regions::models::AdminLevel;

/// Province, regency and district matches for one geocoding result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedHierarchy {
    pub province: MatchResult,
    pub regency: MatchResult,
    pub district: MatchResult,
    /// Mean confidence of the matched levels; 0 when nothing matched
    pub overall_confidence: f64,
    /// A child level contradicted its parent and was discarded
    pub hierarchy_violation: bool,
}

impl ResolvedHierarchy {
    pub fn new(
        province: MatchResult,
        regency: MatchResult,
        district: MatchResult,
        hierarchy_violation: bool,
    ) -> Self {
        let overall_confidence = mean_matched_confidence(&[&province, &regency, &district]);
        Self {
            province,
            regency,
            district,
            overall_confidence,
            hierarchy_violation,
        }
    }

    pub fn empty() -> Self {
        Self::new(MatchResult::none(), MatchResult::none(), MatchResult::none(), false)
    }

    pub fn level(&self, level: AdminLevel) -> &MatchResult {
        match level {
            AdminLevel::Province => &self.province,
            AdminLevel::Regency => &self.regency,
            AdminLevel::District => &self.district,
        }
    }

    pub fn has_any_match(&self) -> bool {
        AdminLevel::ALL.iter().any(|level| self.level(*level).is_match())
    }
}

impl Default for ResolvedHierarchy {
    fn default() -> Self {
        Self::empty()
    }
}

/// Arithmetic mean over matched levels only; unmatched levels are excluded, not counted as zero
fn mean_matched_confidence(levels: &[&MatchResult]) -> f64 {
    let matched: Vec<f64> = levels
        .iter()
        .filter(|m| m.is_match())
        .map(|m| m.confidence)
        .collect();

    if matched.is_empty() {
        return 0.0;
    }
    matched.iter().sum::<f64>() / matched.len() as f64
}
