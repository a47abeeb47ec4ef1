use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::form::{AssessmentForm, FormCategory, FormStatus};
use super::question::Category;

/// Everything a caller supplies to create a form. The repository assigns
/// the id, timestamps, usage count, and the active flag.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateFormInput {
    pub title: String,
    pub description: String,
    pub category: FormCategory,
    #[serde(default)]
    pub status: FormStatus,
    pub categories: Vec<Category>,
    pub created_by: String,
}

impl CreateFormInput {
    /// Build the stored form. Runs no validation; callers validate first
    /// via [`crate::validate::validate_create`].
    pub fn into_form(self, id: Uuid, now: jiff::Timestamp) -> AssessmentForm {
        AssessmentForm {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            status: self.status,
            categories: self.categories,
            created_by: self.created_by,
            usage_count: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. Absent fields are left untouched; a present
/// `categories` array replaces the stored tree whole — there is no
/// merge-by-key of nested arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct UpdateFormInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<FormCategory>,
    pub status: Option<FormStatus>,
    pub categories: Option<Vec<Category>>,
}

impl UpdateFormInput {
    /// Apply the present fields verbatim and refresh `updated_at`. Runs
    /// no validation; callers validate first via
    /// [`crate::validate::validate_update`].
    pub fn apply_to(self, form: &mut AssessmentForm, now: jiff::Timestamp) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(category) = self.category {
            form.category = category;
        }
        if let Some(status) = self.status {
            form.status = status;
        }
        if let Some(categories) = self.categories {
            form.categories = categories;
        }
        form.updated_at = now;
    }
}
