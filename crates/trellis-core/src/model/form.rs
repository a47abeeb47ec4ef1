use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::question::Category;

/// The root of an assessment form tree.
///
/// The form exclusively owns its category/question/option tree; nodes are
/// never shared between forms. The derived field count is not stored —
/// see [`crate::tree::field_count`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AssessmentForm {
    /// Assigned by the repository on creation.
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: FormCategory,
    pub status: FormStatus,
    pub categories: Vec<Category>,
    /// Opaque user identifier supplied by the identity service.
    pub created_by: String,
    pub usage_count: u32,
    /// Soft-delete flag, distinct from `status`. An inactive form is
    /// indistinguishable from an absent one.
    pub is_active: bool,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

/// The fixed five-value taxonomy a form is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum FormCategory {
    Academic,
    Behavioral,
    Speech,
    Physical,
    Social,
}

impl FormCategory {
    /// The full taxonomy, in reporting order.
    pub const ALL: [FormCategory; 5] = [
        FormCategory::Academic,
        FormCategory::Behavioral,
        FormCategory::Speech,
        FormCategory::Physical,
        FormCategory::Social,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FormCategory::Academic => "Academic",
            FormCategory::Behavioral => "Behavioral",
            FormCategory::Speech => "Speech",
            FormCategory::Physical => "Physical",
            FormCategory::Social => "Social",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        FormCategory::ALL.into_iter().find(|c| c.name() == s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FormStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl FormStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(FormStatus::Draft),
            "active" => Some(FormStatus::Active),
            "archived" => Some(FormStatus::Archived),
            _ => None,
        }
    }
}
