use crate::core::config::MatchingConfig;
use crate::features::locations::models::{
    FieldUpdate, FieldValue, FormBinding, ResolvedHierarchy, SkipReason, SkippedField, SyncStatus,
};
use crate::features::regions::models::AdminLevel;

const EPSILON: f64 = 1e-9;

/// Decides which levels of a resolution may be written into the form.
///
/// The overall status gates the whole binding; each level must also clear
/// `min_field_confidence` on its own, and a level is never written below a
/// parent that was held back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormBinder {
    min_field_confidence: f64,
}

impl FormBinder {
    pub fn new(min_field_confidence: f64) -> Self {
        Self {
            min_field_confidence,
        }
    }

    pub fn bind(&self, hierarchy: &ResolvedHierarchy, status: &SyncStatus) -> FormBinding {
        let mut binding = FormBinding::default();

        for level in AdminLevel::ALL {
            let result = hierarchy.level(level);

            let value = match (result.is_match(), &result.code, &result.name) {
                (true, Some(code), Some(name)) => Some(FieldValue::new(code, name)),
                _ => None,
            };

            let parent_held_back = level
                .parent()
                .is_some_and(|parent| !binding.is_applied(parent));

            let reason = match &value {
                None => Some(SkipReason::NoMatch),
                Some(_) if !status.can_auto_select => Some(SkipReason::StatusBlocksAutoApply),
                Some(_) if parent_held_back => Some(SkipReason::ParentNotApplied),
                Some(_) if result.confidence + EPSILON < self.min_field_confidence => {
                    Some(SkipReason::LowConfidence)
                }
                Some(_) => None,
            };

            match (reason, value) {
                (Some(reason), _) => binding.skipped_fields.push(SkippedField {
                    field: level,
                    reason,
                }),
                (None, Some(value)) => {
                    binding.updates.push(FieldUpdate { field: level, value });
                    binding.applied_fields.push(level);
                }
                (None, None) => {}
            }
        }

        tracing::debug!(
            "Form binding: applied={:?} skipped={:?}",
            binding.applied_fields,
            binding.skipped_fields
        );

        binding
    }
}

impl Default for FormBinder {
    fn default() -> Self {
        Self::new(MatchingConfig::default().confirm_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::locations::models::{MatchResult, MatchType, SyncState};
    use crate::features::locations::services::SyncStatusEvaluator;
    use crate::features::regions::models::AdministrativeUnit;

    fn matched(unit: AdministrativeUnit, confidence: f64) -> MatchResult {
        MatchResult::matched(&unit, confidence, MatchType::Fuzzy)
    }

    fn assert_partition(binding: &FormBinding) {
        for level in AdminLevel::ALL {
            let applied = binding.is_applied(level);
            let skipped = binding.skip_reason(level).is_some();
            assert!(applied ^ skipped, "{} must be applied or skipped exactly once", level);
            assert_eq!(applied, binding.update_for(level).is_some());
        }
        assert_eq!(binding.applied_fields.len() + binding.skipped_fields.len(), 3);
    }

    #[test]
    fn test_auto_apply_writes_matched_levels_and_skips_district() {
        let hierarchy = ResolvedHierarchy::new(
            matched(AdministrativeUnit::province("32", "Jawa Barat"), 0.95),
            matched(AdministrativeUnit::regency("32.75", "Kota Bekasi", "32"), 0.85),
            MatchResult::none(),
            false,
        );
        let status = SyncStatusEvaluator::default().evaluate(&hierarchy);
        assert_eq!(status.state, SyncState::AutoApply);

        let binding = FormBinder::default().bind(&hierarchy, &status);

        assert_eq!(binding.applied_fields, vec![AdminLevel::Province, AdminLevel::Regency]);
        assert_eq!(binding.skip_reason(AdminLevel::District), Some(SkipReason::NoMatch));
        assert_eq!(
            binding.update_for(AdminLevel::Regency),
            Some(&FieldValue::new("32.75", "Kota Bekasi"))
        );
        assert_partition(&binding);
    }

    #[test]
    fn test_manual_only_applies_nothing() {
        let hierarchy = ResolvedHierarchy::new(
            matched(AdministrativeUnit::province("32", "Jawa Barat"), 0.5),
            MatchResult::none(),
            MatchResult::none(),
            false,
        );
        let status = SyncStatusEvaluator::default().evaluate(&hierarchy);
        let binding = FormBinder::default().bind(&hierarchy, &status);

        assert!(binding.updates.is_empty());
        assert_eq!(
            binding.skip_reason(AdminLevel::Province),
            Some(SkipReason::StatusBlocksAutoApply)
        );
        assert_eq!(binding.skip_reason(AdminLevel::Regency), Some(SkipReason::NoMatch));
        assert_partition(&binding);
    }

    #[test]
    fn test_empty_resolution_skips_everything() {
        let hierarchy = ResolvedHierarchy::empty();
        let status = SyncStatusEvaluator::default().evaluate(&hierarchy);
        let binding = FormBinder::default().bind(&hierarchy, &status);

        assert!(binding.applied_fields.is_empty());
        assert!(binding
            .skipped_fields
            .iter()
            .all(|s| s.reason == SkipReason::NoMatch));
        assert_partition(&binding);
    }

    #[test]
    fn test_low_confidence_level_is_held_back() {
        let hierarchy = ResolvedHierarchy::new(
            matched(AdministrativeUnit::province("32", "Jawa Barat"), 1.0),
            matched(AdministrativeUnit::regency("32.75", "Kota Bekasi", "32"), 1.0),
            matched(AdministrativeUnit::district("32.75.01", "Bekasi Timur", "32.75"), 0.3),
            false,
        );
        let status = SyncStatusEvaluator::default().evaluate(&hierarchy);
        assert_eq!(status.state, SyncState::ConfirmRequired);
        assert!(status.can_auto_select);

        let binding = FormBinder::default().bind(&hierarchy, &status);

        assert_eq!(binding.applied_fields, vec![AdminLevel::Province, AdminLevel::Regency]);
        assert_eq!(
            binding.skip_reason(AdminLevel::District),
            Some(SkipReason::LowConfidence)
        );
        assert!(binding.update_for(AdminLevel::District).is_none());
        assert_partition(&binding);
    }

    #[test]
    fn test_children_of_a_held_back_level_are_not_written() {
        let hierarchy = ResolvedHierarchy::new(
            matched(AdministrativeUnit::province("32", "Jawa Barat"), 1.0),
            matched(AdministrativeUnit::regency("32.75", "Kota Bekasi", "32"), 0.4),
            matched(AdministrativeUnit::district("32.75.04", "Bekasi Selatan", "32.75"), 1.0),
            false,
        );
        let status = SyncStatusEvaluator::default().evaluate(&hierarchy);
        let binding = FormBinder::default().bind(&hierarchy, &status);

        assert_eq!(binding.applied_fields, vec![AdminLevel::Province]);
        assert_eq!(
            binding.skip_reason(AdminLevel::Regency),
            Some(SkipReason::LowConfidence)
        );
        assert_eq!(
            binding.skip_reason(AdminLevel::District),
            Some(SkipReason::ParentNotApplied)
        );
        assert_partition(&binding);
    }

    #[test]
    fn test_field_floor_is_configurable() {
        let hierarchy = ResolvedHierarchy::new(
            matched(AdministrativeUnit::province("32", "Jawa Barat"), 1.0),
            matched(AdministrativeUnit::regency("32.75", "Kota Bekasi", "32"), 1.0),
            matched(AdministrativeUnit::district("32.75.01", "Bekasi Timur", "32.75"), 0.3),
            false,
        );
        let status = SyncStatusEvaluator::default().evaluate(&hierarchy);
        let binding = FormBinder::new(0.3).bind(&hierarchy, &status);

        assert_eq!(binding.applied_fields, AdminLevel::ALL.to_vec());
    }
}
