pub mod geocoding;
pub mod locations;
pub mod regions;
