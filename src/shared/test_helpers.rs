use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use crate::core::error::{AppError, Result};
use crate::features::geocoding::models::{AddressFragments, GeocodingResult};
use crate::features::geocoding::services::Geocoder;
use crate::features::locations::matching::{FuzzyMatcher, SynonymTable};
use crate::features::regions::models::{codes_equal, AdminLevel, AdministrativeUnit};
use crate::features::regions::services::RegionDirectory;

pub fn test_matcher() -> FuzzyMatcher {
    FuzzyMatcher::new(Arc::new(
        SynonymTable::embedded().expect("embedded synonyms load"),
    ))
}

pub fn fixture_units() -> Vec<AdministrativeUnit> {
    vec![
        AdministrativeUnit::province("31", "DKI Jakarta"),
        AdministrativeUnit::province("32", "Jawa Barat"),
        AdministrativeUnit::province("33", "Jawa Tengah"),
        AdministrativeUnit::province("34", "DI Yogyakarta"),
        AdministrativeUnit::province("36", "Banten"),
        AdministrativeUnit::regency("31.71", "Kota Administrasi Jakarta Pusat", "31"),
        AdministrativeUnit::regency("31.74", "Kota Administrasi Jakarta Selatan", "31"),
        AdministrativeUnit::regency("32.01", "Kabupaten Bogor", "32"),
        AdministrativeUnit::regency("32.16", "Kabupaten Bekasi", "32"),
        AdministrativeUnit::regency("32.71", "Kota Bogor", "32"),
        AdministrativeUnit::regency("32.73", "Kota Bandung", "32"),
        AdministrativeUnit::regency("32.75", "Kota Bekasi", "32"),
        AdministrativeUnit::regency("33.72", "Kota Surakarta", "33"),
        AdministrativeUnit::regency("34.04", "Kabupaten Sleman", "34"),
        AdministrativeUnit::regency("34.71", "Kota Yogyakarta", "34"),
        AdministrativeUnit::regency("36.74", "Kota Tangerang Selatan", "36"),
        AdministrativeUnit::district("31.74.01", "Tebet", "31.74"),
        AdministrativeUnit::district("31.74.07", "Kebayoran Baru", "31.74"),
        AdministrativeUnit::district("32.73.02", "Coblong", "32.73"),
        AdministrativeUnit::district("32.73.05", "Sukajadi", "32.73"),
        AdministrativeUnit::district("32.75.01", "Bekasi Timur", "32.75"),
        AdministrativeUnit::district("32.75.03", "Bekasi Utara", "32.75"),
        AdministrativeUnit::district("32.75.04", "Bekasi Selatan", "32.75"),
        AdministrativeUnit::district("33.72.01", "Laweyan", "33.72"),
        AdministrativeUnit::district("33.72.04", "Banjarsari", "33.72"),
        AdministrativeUnit::district("34.04.07", "Depok", "34.04"),
        AdministrativeUnit::district("34.71.05", "Gondokusuman", "34.71"),
    ]
}

/// Region directory backed by a fixed list.
///
/// Each unit is listed under a scope code, normally its own parent code.
/// Every call is counted, failing ones included.
pub struct InMemoryRegionDirectory {
    units: Mutex<Vec<(Option<String>, AdministrativeUnit)>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryRegionDirectory {
    pub fn new(units: Vec<AdministrativeUnit>) -> Self {
        Self {
            units: Mutex::new(
                units
                    .into_iter()
                    .map(|unit| (unit.parent_code.clone(), unit))
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn with_fixtures() -> Self {
        Self::new(fixture_units())
    }

    /// List `unit` under `scope_code` whatever its own parent code says
    pub fn list_under(&self, scope_code: &str, unit: AdministrativeUnit) {
        self.units
            .lock()
            .unwrap()
            .push((Some(scope_code.to_string()), unit));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn list(&self, level: AdminLevel, scope: Option<&str>) -> Result<Vec<AdministrativeUnit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::ExternalServiceError(
                "Regions API request failed: connection refused".to_string(),
            ));
        }

        let units = self.units.lock().unwrap();
        let mut listed: Vec<AdministrativeUnit> = units
            .iter()
            .filter(|(listed_under, unit)| {
                unit.level == level
                    && match (scope, listed_under.as_deref()) {
                        (None, _) => true,
                        (Some(scope), Some(under)) => codes_equal(scope, under),
                        (Some(_), None) => false,
                    }
            })
            .map(|(_, unit)| unit.clone())
            .collect();
        listed.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(listed)
    }
}

#[async_trait]
impl RegionDirectory for InMemoryRegionDirectory {
    async fn list_provinces(&self) -> Result<Vec<AdministrativeUnit>> {
        self.list(AdminLevel::Province, None)
    }

    async fn list_regencies(&self, province_code: &str) -> Result<Vec<AdministrativeUnit>> {
        self.list(AdminLevel::Regency, Some(province_code))
    }

    async fn list_districts(&self, regency_code: &str) -> Result<Vec<AdministrativeUnit>> {
        self.list(AdminLevel::District, Some(regency_code))
    }
}

pub fn geocoding_result(
    province: Option<&str>,
    city: Option<&str>,
    district: Option<&str>,
) -> GeocodingResult {
    GeocodingResult {
        address: AddressFragments {
            street: None,
            district: district.map(str::to_string),
            city: city.map(str::to_string),
            province: province.map(str::to_string),
        },
        lat: -6.2383,
        lon: 106.9756,
        display_name: None,
    }
}

/// Jl. Ahmad Yani, Bekasi Selatan, as Nominatim reports it
pub fn bekasi_selatan_result() -> GeocodingResult {
    let mut result = geocoding_result(Some("Jawa Barat"), Some("Kota Bekasi"), Some("Bekasi Selatan"));
    result.address.street = Some("Jalan Ahmad Yani".to_string());
    result.display_name = Some(
        "Jalan Ahmad Yani, Bekasi Selatan, Kota Bekasi, Jawa Barat, Indonesia".to_string(),
    );
    result
}

/// Geocoder answering every lookup with the same result
pub struct StaticGeocoder {
    result: Option<GeocodingResult>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl StaticGeocoder {
    pub fn new(result: Option<GeocodingResult>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn answer(&self) -> Result<Option<GeocodingResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::ExternalServiceError(
                "Nominatim request failed: timeout".to_string(),
            ));
        }
        Ok(self.result.clone())
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn reverse_geocode(&self, _lat: f64, _lon: f64) -> Result<Option<GeocodingResult>> {
        self.answer()
    }

    async fn geocode(&self, _query: &str) -> Result<Option<GeocodingResult>> {
        self.answer()
    }
}

/// Geocoder whose answers are released by the test, one gate per call in call order
#[derive(Default)]
pub struct GatedGeocoder {
    gates: Mutex<VecDeque<oneshot::Receiver<Option<GeocodingResult>>>>,
    started: AtomicUsize,
}

impl GatedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a gate for the next call; sending on it releases that call
    pub fn push_gate(&self) -> oneshot::Sender<Option<GeocodingResult>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Yield until `count` calls are waiting on their gates
    pub async fn wait_for_calls(&self, count: usize) {
        while self.started() < count {
            tokio::task::yield_now().await;
        }
    }

    async fn wait(&self) -> Result<Option<GeocodingResult>> {
        let gate = self.gates.lock().unwrap().pop_front();
        self.started.fetch_add(1, Ordering::SeqCst);
        match gate {
            Some(gate) => gate
                .await
                .map_err(|_| AppError::ExternalServiceError("gate dropped".to_string())),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Geocoder for GatedGeocoder {
    async fn reverse_geocode(&self, _lat: f64, _lon: f64) -> Result<Option<GeocodingResult>> {
        self.wait().await
    }

    async fn geocode(&self, _query: &str) -> Result<Option<GeocodingResult>> {
        self.wait().await
    }
}
