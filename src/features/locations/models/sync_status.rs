use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// UI-facing synchronization state of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// Nothing matched
    None,
    AutoApply,
    ConfirmRequired,
    /// Low confidence; the user fills the form by hand
    ManualOnly,
}

/// Derived from a [`super::ResolvedHierarchy`], never stored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub state: SyncState,
    pub is_synced: bool,
    pub can_auto_select: bool,
    pub overall_confidence: f64,
}

impl SyncStatus {
    pub fn none() -> Self {
        Self {
            state: SyncState::None,
            is_synced: false,
            can_auto_select: false,
            overall_confidence: 0.0,
        }
    }

    /// The UI should ask the user to review before accepting
    pub fn needs_review(&self) -> bool {
        self.state == SyncState::ConfirmRequired
    }
}
