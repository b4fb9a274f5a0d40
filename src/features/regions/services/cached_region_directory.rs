use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::core::error::Result;
use crate::features::regions::models::{AdminLevel, AdministrativeUnit};
use crate::features::regions::services::RegionDirectory;

type CacheKey = (AdminLevel, Option<String>);

/// Cached list with fetch time tracking
struct CachedList {
    units: Vec<AdministrativeUnit>,
    fetched_at: Instant,
}

/// Caches directory listings for a fixed TTL.
///
/// The hierarchy changes rarely, and a single resolution lists up to three
/// levels, so repeated lookups in the same area hit memory. Failed fetches
/// are never cached.
pub struct CachedRegionDirectory {
    inner: Arc<dyn RegionDirectory>,
    cache: Arc<RwLock<HashMap<CacheKey, CachedList>>>,
    ttl: Duration,
}

impl CachedRegionDirectory {
    pub fn new(inner: Arc<dyn RegionDirectory>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    async fn get_or_fetch(
        &self,
        level: AdminLevel,
        parent_code: Option<&str>,
    ) -> Result<Vec<AdministrativeUnit>> {
        if self.ttl.is_zero() {
            return self.inner.list_units(level, parent_code).await;
        }

        let key: CacheKey = (level, parent_code.map(str::to_string));

        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get(&key) {
                if cached.fetched_at.elapsed() < self.ttl {
                    tracing::debug!(
                        "Using cached {} list (parent: {:?}, {} units)",
                        level,
                        parent_code,
                        cached.units.len()
                    );
                    return Ok(cached.units.clone());
                }
            }
        }

        let units = self.inner.list_units(level, parent_code).await?;

        let mut cache = self.cache.write().await;
        cache.insert(
            key,
            CachedList {
                units: units.clone(),
                fetched_at: Instant::now(),
            },
        );

        Ok(units)
    }
}

#[async_trait]
impl RegionDirectory for CachedRegionDirectory {
    async fn list_provinces(&self) -> Result<Vec<AdministrativeUnit>> {
        self.get_or_fetch(AdminLevel::Province, None).await
    }

    async fn list_regencies(&self, province_code: &str) -> Result<Vec<AdministrativeUnit>> {
        self.get_or_fetch(AdminLevel::Regency, Some(province_code))
            .await
    }

    async fn list_districts(&self, regency_code: &str) -> Result<Vec<AdministrativeUnit>> {
        self.get_or_fetch(AdminLevel::District, Some(regency_code))
            .await
    }
}
