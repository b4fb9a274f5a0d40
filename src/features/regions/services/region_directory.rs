use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::regions::models::{AdminLevel, AdministrativeUnit};

/// Read-only access to the administrative hierarchy.
///
/// Lists are returned in a stable order (ascending code); the fuzzy matcher
/// breaks ties by input order, so implementations must not shuffle results.
#[async_trait]
pub trait RegionDirectory: Send + Sync {
    async fn list_provinces(&self) -> Result<Vec<AdministrativeUnit>>;

    async fn list_regencies(&self, province_code: &str) -> Result<Vec<AdministrativeUnit>>;

    async fn list_districts(&self, regency_code: &str) -> Result<Vec<AdministrativeUnit>>;

    /// List the units of `level` under `parent_code`.
    ///
    /// Returns an empty list when a regency or district listing is requested
    /// without a parent: the directory is never searched unscoped below the
    /// province level.
    async fn list_units(
        &self,
        level: AdminLevel,
        parent_code: Option<&str>,
    ) -> Result<Vec<AdministrativeUnit>> {
        match (level, parent_code) {
            (AdminLevel::Province, _) => self.list_provinces().await,
            (AdminLevel::Regency, Some(code)) => self.list_regencies(code).await,
            (AdminLevel::District, Some(code)) => self.list_districts(code).await,
            (_, None) => Ok(Vec::new()),
        }
    }
}
