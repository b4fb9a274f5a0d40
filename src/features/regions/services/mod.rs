mod cached_region_directory;
mod region_directory;

pub use cached_region_directory::CachedRegionDirectory;
pub use region_directory::RegionDirectory;
