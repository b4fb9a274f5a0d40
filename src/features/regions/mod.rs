//! Indonesian administrative regions (wilayah) directory.
//!
//! Read-only client for the backend regions API. The location matcher uses it
//! to list candidates one level at a time, always scoped by the parent code.
//!
//! ## Data Hierarchy
//!
//! - Level 1: Provinces (Provinsi), code `32`
//! - Level 2: Regencies/Cities (Kabupaten/Kota), code `32.75`
//! - Level 3: Districts (Kecamatan), code `32.75.01`
//!
//! ## Upstream Endpoints
//!
//! | Method | Endpoint | Used by |
//! |--------|----------|---------|
//! | GET | `/api/regions/provinces` | `list_provinces` |
//! | GET | `/api/regions/provinces/{code}/regencies` | `list_regencies` |
//! | GET | `/api/regions/regencies/{code}/districts` | `list_districts` |

pub mod clients;
pub mod dtos;
pub mod models;
pub mod services;

pub use clients::RegionApiClient;
pub use services::{CachedRegionDirectory, RegionDirectory};
