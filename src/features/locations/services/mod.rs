pub mod form_binder;
pub mod form_session_service;
pub mod hierarchy_resolver;
pub mod location_service;
pub mod region_search_service;
pub mod sync_status;

pub use form_binder::FormBinder;
pub use form_session_service::{FormSession, FormSessionService};
pub use hierarchy_resolver::HierarchyResolver;
pub use location_service::{LocationQuery, LocationResolution, LocationService, ResolutionSource};
pub use region_search_service::RegionSearchService;
pub use sync_status::SyncStatusEvaluator;
