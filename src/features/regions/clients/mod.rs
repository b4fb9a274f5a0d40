mod region_api_client;

pub use region_api_client::RegionApiClient;
