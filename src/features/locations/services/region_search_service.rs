use std::sync::Arc;

use crate::core::error::Result;
use crate::features::locations::matching::FuzzyMatcher;
use crate::features::locations::models::MatchResult;
use crate::features::regions::models::{AdminLevel, AdministrativeUnit};
use crate::features::regions::services::RegionDirectory;

/// Single-level fuzzy lookups against the directory, scoped by parent code
pub struct RegionSearchService {
    directory: Arc<dyn RegionDirectory>,
    matcher: FuzzyMatcher,
}

impl RegionSearchService {
    pub fn new(directory: Arc<dyn RegionDirectory>, matcher: FuzzyMatcher) -> Self {
        Self { directory, matcher }
    }

    /// Best match for `query` at `level`. Levels below province without a
    /// parent code never match.
    pub async fn search(
        &self,
        level: AdminLevel,
        parent_code: Option<&str>,
        query: &str,
    ) -> Result<MatchResult> {
        if query.trim().is_empty() {
            return Ok(MatchResult::none());
        }
        if level != AdminLevel::Province && parent_code.is_none() {
            tracing::debug!("Refusing unscoped {} search for {:?}", level, query);
            return Ok(MatchResult::none());
        }

        let candidates = self.directory.list_units(level, parent_code).await?;
        Ok(self.matcher.find_best(Some(query), &candidates))
    }

    pub async fn search_province(&self, query: &str) -> Result<Option<AdministrativeUnit>> {
        let result = self.search(AdminLevel::Province, None, query).await?;
        Ok(result.to_unit(AdminLevel::Province))
    }

    pub async fn search_regency(
        &self,
        province_code: &str,
        query: &str,
    ) -> Result<Option<AdministrativeUnit>> {
        let result = self
            .search(AdminLevel::Regency, Some(province_code), query)
            .await?;
        Ok(result.to_unit(AdminLevel::Regency))
    }

    pub async fn search_district(
        &self,
        regency_code: &str,
        query: &str,
    ) -> Result<Option<AdministrativeUnit>> {
        let result = self
            .search(AdminLevel::District, Some(regency_code), query)
            .await?;
        Ok(result.to_unit(AdminLevel::District))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::locations::models::MatchType;
    use crate::shared::test_helpers::{test_matcher, InMemoryRegionDirectory};

    fn service() -> (RegionSearchService, Arc<InMemoryRegionDirectory>) {
        let directory = Arc::new(InMemoryRegionDirectory::with_fixtures());
        (
            RegionSearchService::new(directory.clone(), test_matcher()),
            directory,
        )
    }

    #[tokio::test]
    async fn test_search_province() {
        let (service, _) = service();
        let unit = service.search_province("DKI Jakarta").await.unwrap().unwrap();

        assert_eq!(unit.code, "31");
        assert_eq!(unit.level, AdminLevel::Province);
    }

    #[tokio::test]
    async fn test_search_regency_is_scoped() {
        let (service, _) = service();

        let unit = service.search_regency("36", "Tangsel").await.unwrap().unwrap();
        assert_eq!(unit.code, "36.74");
        assert_eq!(unit.parent_code.as_deref(), Some("36"));

        assert!(service.search_regency("32", "Tangsel").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_district() {
        let (service, _) = service();
        let unit = service
            .search_district("31.74", "Kec. Tebet")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(unit.code, "31.74.01");
        assert_eq!(unit.name, "Tebet");
    }

    #[tokio::test]
    async fn test_unscoped_child_search_is_none_without_lookup() {
        let (service, directory) = service();
        let result = service
            .search(AdminLevel::District, None, "Tebet")
            .await
            .unwrap();

        assert_eq!(result.match_type, MatchType::None);
        assert_eq!(directory.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_query_is_none() {
        let (service, directory) = service();
        assert!(service.search_province("  ").await.unwrap().is_none());
        assert_eq!(directory.call_count(), 0);
    }
}
