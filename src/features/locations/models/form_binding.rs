use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::FieldValue;
use crate::features::regions::models::AdminLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoMatch,
    StatusBlocksAutoApply,
    /// Matched, but below the per-field confidence floor
    LowConfidence,
    /// The level above was not written
    ParentNotApplied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpdate {
    pub field: AdminLevel,
    pub value: FieldValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkippedField {
    pub field: AdminLevel,
    pub reason: SkipReason,
}

/// Which form fields a resolution may write, and why the others were left alone.
///
/// Every level appears exactly once, in `applied_fields` or `skipped_fields`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormBinding {
    pub updates: Vec<FieldUpdate>,
    pub applied_fields: Vec<AdminLevel>,
    pub skipped_fields: Vec<SkippedField>,
}

impl FormBinding {
    pub fn update_for(&self, level: AdminLevel) -> Option<&FieldValue> {
        self.updates
            .iter()
            .find(|u| u.field == level)
            .map(|u| &u.value)
    }

    pub fn is_applied(&self, level: AdminLevel) -> bool {
        self.applied_fields.contains(&level)
    }

    pub fn skip_reason(&self, level: AdminLevel) -> Option<SkipReason> {
        self.skipped_fields
            .iter()
            .find(|s| s.field == level)
            .map(|s| s.reason)
    }
}
