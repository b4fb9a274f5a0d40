pub mod form_binding;
pub mod location_form;
pub mod match_result;
pub mod resolved_hierarchy;
pub mod sync_status;

pub use form_binding::{FieldUpdate, FormBinding, SkipReason, SkippedField};
pub use location_form::{FieldValue, LocationForm};
pub use match_result::{MatchResult, MatchType};
pub use resolved_hierarchy::ResolvedHierarchy;
pub use sync_status::{SyncState, SyncStatus};
