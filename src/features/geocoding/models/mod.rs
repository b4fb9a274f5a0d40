mod geocoding_result;

pub use geocoding_result::{is_valid_coordinate, AddressFragments, GeocodingResult};
