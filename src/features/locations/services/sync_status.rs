use crate::core::config::MatchingConfig;
use crate::features::locations::models::{ResolvedHierarchy, SyncState, SyncStatus};

/// Tolerance for threshold comparisons on averaged confidences
const EPSILON: f64 = 1e-9;

/// Maps a resolved hierarchy to its UI-facing sync status. Pure and stateless.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncStatusEvaluator {
    auto_apply_threshold: f64,
    confirm_threshold: f64,
    apply_on_confirm: bool,
}

impl SyncStatusEvaluator {
    pub fn new(auto_apply_threshold: f64, confirm_threshold: f64, apply_on_confirm: bool) -> Self {
        Self {
            auto_apply_threshold,
            confirm_threshold,
            apply_on_confirm,
        }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(
            config.auto_apply_threshold,
            config.confirm_threshold,
            config.apply_on_confirm,
        )
    }

    pub fn confirm_threshold(&self) -> f64 {
        self.confirm_threshold
    }

    pub fn evaluate(&self, hierarchy: &ResolvedHierarchy) -> SyncStatus {
        if !hierarchy.has_any_match() {
            return SyncStatus::none();
        }

        let overall = hierarchy.overall_confidence;
        let reaches = |threshold: f64| overall + EPSILON >= threshold;

        let (state, is_synced, can_auto_select) =
            if reaches(self.auto_apply_threshold) && !hierarchy.hierarchy_violation {
                (SyncState::AutoApply, true, true)
            } else if reaches(self.confirm_threshold) {
                (SyncState::ConfirmRequired, true, self.apply_on_confirm)
            } else {
                (SyncState::ManualOnly, false, false)
            };

        SyncStatus {
            state,
            is_synced,
            can_auto_select,
            overall_confidence: overall,
        }
    }
}

impl Default for SyncStatusEvaluator {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}
