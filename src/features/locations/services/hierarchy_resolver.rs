use std::sync::Arc;

use crate::core::error::Result;
use crate::features::geocoding::models::{AddressFragments, GeocodingResult};
use crate::features::locations::matching::FuzzyMatcher;
use crate::features::locations::models::{MatchResult, ResolvedHierarchy};
use crate::features::regions::models::{codes_equal, AdminLevel};
use crate::features::regions::services::RegionDirectory;

/// Outcome of matching a child level inside its parent's scope
struct ScopedMatch {
    result: MatchResult,
    violation: bool,
}

impl ScopedMatch {
    fn none() -> Self {
        Self {
            result: MatchResult::none(),
            violation: false,
        }
    }
}

/// Resolves address fragments to province, regency and district.
///
/// Levels are matched top-down and strictly in sequence: the regency list is
/// scoped by the matched province code and the district list by the matched
/// regency code. An unmatched parent leaves every level below it unmatched
/// without touching the directory.
pub struct HierarchyResolver {
    directory: Arc<dyn RegionDirectory>,
    matcher: FuzzyMatcher,
}

impl HierarchyResolver {
    pub fn new(directory: Arc<dyn RegionDirectory>, matcher: FuzzyMatcher) -> Self {
        Self { directory, matcher }
    }

    pub async fn resolve(&self, geocoding: &GeocodingResult) -> Result<ResolvedHierarchy> {
        self.resolve_fragments(&geocoding.address).await
    }

    /// Resolve free-text fragments. "No match" is data; only directory
    /// transport failures are errors.
    pub async fn resolve_fragments(&self, address: &AddressFragments) -> Result<ResolvedHierarchy> {
        let province = self.match_province(address.province.as_deref()).await?;

        let regency = self
            .match_within(AdminLevel::Regency, &province, address.city.as_deref())
            .await?;

        let district = self
            .match_within(AdminLevel::District, &regency.result, address.district.as_deref())
            .await?;

        let hierarchy = ResolvedHierarchy::new(
            province,
            regency.result,
            district.result,
            regency.violation || district.violation,
        );

        tracing::debug!(
            "Resolved hierarchy: province={:?} regency={:?} district={:?} overall={:.3}",
            hierarchy.province.code,
            hierarchy.regency.code,
            hierarchy.district.code,
            hierarchy.overall_confidence
        );

        Ok(hierarchy)
    }

    async fn match_province(&self, query: Option<&str>) -> Result<MatchResult> {
        if is_blank(query) {
            return Ok(MatchResult::none());
        }

        let provinces = self.directory.list_provinces().await?;
        let result = self.matcher.find_best(query, &provinces);
        log_level_match(AdminLevel::Province, query, &result);
        Ok(result)
    }

    async fn match_within(
        &self,
        level: AdminLevel,
        parent: &MatchResult,
        query: Option<&str>,
    ) -> Result<ScopedMatch> {
        let Some(parent_code) = parent.code.as_deref().filter(|_| parent.is_match()) else {
            return Ok(ScopedMatch::none());
        };

        if is_blank(query) {
            return Ok(ScopedMatch::none());
        }

        let candidates = self.directory.list_units(level, Some(parent_code)).await?;
        let result = self.matcher.find_best(query, &candidates);
        log_level_match(level, query, &result);

        if !result.is_match() {
            return Ok(ScopedMatch::none());
        }

        let consistent = result
            .parent_code
            .as_deref()
            .is_some_and(|p| codes_equal(p, parent_code));

        if !consistent {
            tracing::warn!(
                "Discarding {} match {:?}: parent {:?} does not match resolved parent {}",
                level,
                result.code,
                result.parent_code,
                parent_code
            );
            return Ok(ScopedMatch {
                result: MatchResult::none(),
                violation: true,
            });
        }

        Ok(ScopedMatch {
            result,
            violation: false,
        })
    }
}

fn is_blank(query: Option<&str>) -> bool {
    query.map_or(true, |q| q.trim().is_empty())
}

fn log_level_match(level: AdminLevel, query: Option<&str>, result: &MatchResult) {
    tracing::debug!(
        "{} {:?} -> {:?} ({:?}, {:.3})",
        level,
        query,
        result.code,
        result.match_type,
        result.confidence
    );
}
