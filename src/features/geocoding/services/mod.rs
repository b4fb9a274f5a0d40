mod geocoder;
mod nominatim_geocoding_service;

pub use geocoder::Geocoder;
pub use nominatim_geocoding_service::NominatimGeocodingService;
