//! Administrative-location reconciliation.
//!
//! Turns coordinates or free-text address fragments into province, regency
//! and district codes, scores the result, and decides which report form
//! fields may be filled automatically.
//!
//! ## Pipeline
//!
//! 1. Geocode (reverse for coordinates, forward for a free-text query)
//! 2. [`services::HierarchyResolver`]: province, then regency within it, then district
//! 3. [`services::SyncStatusEvaluator`]: overall confidence to sync state
//! 4. [`services::FormBinder`]: fields allowed to be written
//! 5. [`services::FormSessionService`]: applies the binding unless a newer request exists
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/locations/resolve` | Resolve coordinates, fragments or text |
//! | GET | `/api/locations/reverse` | Raw reverse geocoding |
//! | GET | `/api/locations/search` | Single-level fuzzy search |
//! | POST | `/api/location-forms` | Create a form session |
//! | GET | `/api/location-forms/{id}` | Read a form session |
//! | POST | `/api/location-forms/{id}/resolve` | Resolve and apply to the session |
//! | PUT | `/api/location-forms/{id}/fields/{field}` | Manual edit or clear |
//! | DELETE | `/api/location-forms/{id}` | Drop a form session |

pub mod dtos;
pub mod handlers;
pub mod matching;
pub mod models;
pub mod routes;
pub mod services;

pub use matching::{FuzzyMatcher, SynonymTable};
pub use routes::routes;
pub use services::{
    FormSessionService, HierarchyResolver, LocationService, RegionSearchService,
    SyncStatusEvaluator,
};
