//! Geocoding through OpenStreetMap Nominatim.
//!
//! Turns coordinates (EXIF metadata, browser geolocation) or a free-form
//! address into free-text address fragments for the location matcher.

pub mod models;
pub mod services;

pub use services::{Geocoder, NominatimGeocodingService};
