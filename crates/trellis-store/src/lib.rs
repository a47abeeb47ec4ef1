//! trellis-store
//!
//! The form repository contract and its backends: an in-memory store for
//! tests and local development, and an S3-backed document store keeping
//! one JSON object per form.

pub mod error;
pub mod keys;
pub mod memory;
pub mod s3;

use async_trait::async_trait;
use uuid::Uuid;

use trellis_core::model::{
    AssessmentForm, CategoryStats, CreateFormInput, FormCategory, FormStatus, UpdateFormInput,
};
use trellis_core::tree::{self, CloneOverrides};
use trellis_core::validate;

use crate::error::StoreError;

/// Query filter for listing forms. `None` on an axis means no filter
/// (the HTTP layer maps the `"all"` sentinel to `None`).
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub status: Option<FormStatus>,
    pub category: Option<FormCategory>,
    /// Case-insensitive substring match against title or description,
    /// applied after the status/category filters.
    pub search: Option<String>,
}

impl ListFilter {
    pub fn matches(&self, form: &AssessmentForm) -> bool {
        if !form.is_active {
            return false;
        }
        if let Some(status) = self.status
            && form.status != status
        {
            return false;
        }
        if let Some(category) = self.category
            && form.category != category
        {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !form.title.to_lowercase().contains(&needle)
                && !form.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// The repository contract the serving layer consumes.
///
/// Soft-deleted forms are indistinguishable from absent ones: every
/// operation that takes an id fails with [`StoreError::NotFound`] when
/// the form is missing or inactive. Validation failures persist nothing.
#[async_trait]
pub trait FormStore: Send + Sync {
    /// Validate and persist a new form. Assigns the id and timestamps;
    /// `usage_count` starts at 0 and `status` defaults to draft.
    async fn create(&self, input: CreateFormInput) -> Result<AssessmentForm, StoreError>;

    /// Fetch an active form by id.
    async fn get(&self, id: Uuid) -> Result<AssessmentForm, StoreError>;

    /// All active forms matching the filter, most recently updated first.
    async fn list(&self, filter: ListFilter) -> Result<Vec<AssessmentForm>, StoreError>;

    /// Apply a partial update to an active form. Present array fields
    /// replace the stored ones whole.
    async fn update(&self, id: Uuid, input: UpdateFormInput)
    -> Result<AssessmentForm, StoreError>;

    /// Mark a form inactive. Never removes the document and never
    /// touches `status`.
    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Flip `status`: archived becomes active, anything else becomes
    /// archived.
    async fn toggle_archive(&self, id: Uuid) -> Result<AssessmentForm, StoreError>;

    /// Persist a fresh-identity copy of a form: new ids at every depth,
    /// title suffixed with " (Copy)", draft status, zero usage, new
    /// timestamps. The clone is re-validated before being persisted so a
    /// malformed original cannot propagate.
    async fn duplicate(&self, id: Uuid, created_by: String)
    -> Result<AssessmentForm, StoreError>;

    /// Atomically add 1 to `usage_count` and return the new value.
    /// Concurrent callers must never lose an update.
    async fn increment_usage(&self, id: Uuid) -> Result<u32, StoreError>;

    /// Active-form counts for all five taxonomy categories, in fixed
    /// order, zero counts included.
    async fn category_stats(&self) -> Result<Vec<CategoryStats>, StoreError>;
}

/// Validate creation input and build the stored document. Shared by
/// every backend so the rules cannot drift between them.
pub(crate) fn build_form(
    input: CreateFormInput,
    now: jiff::Timestamp,
) -> Result<AssessmentForm, StoreError> {
    let errors = validate::validate_create(&input);
    if !errors.is_empty() {
        return Err(StoreError::Validation(errors));
    }
    Ok(input.into_form(Uuid::new_v4(), now))
}

/// Validate a partial update and apply it in place.
pub(crate) fn apply_update(
    form: &mut AssessmentForm,
    input: UpdateFormInput,
    now: jiff::Timestamp,
) -> Result<(), StoreError> {
    let errors = validate::validate_update(&input);
    if !errors.is_empty() {
        return Err(StoreError::Validation(errors));
    }
    input.apply_to(form, now);
    Ok(())
}

pub(crate) fn toggled_status(status: FormStatus) -> FormStatus {
    match status {
        FormStatus::Archived => FormStatus::Active,
        _ => FormStatus::Archived,
    }
}

/// Build (and re-validate) the duplicate of a source form.
pub(crate) fn duplicate_of(
    source: &AssessmentForm,
    created_by: String,
    now: jiff::Timestamp,
) -> Result<AssessmentForm, StoreError> {
    let mut clone = tree::clone_with_fresh_ids(
        source,
        CloneOverrides {
            title: format!("{} (Copy)", source.title),
            created_by,
            status: FormStatus::Draft,
            usage_count: 0,
        },
    );
    clone.is_active = true;
    clone.created_at = now;
    clone.updated_at = now;

    let errors = validate::validate_form(&clone);
    if !errors.is_empty() {
        return Err(StoreError::Validation(errors));
    }
    Ok(clone)
}

pub(crate) fn sort_recent_first(forms: &mut [AssessmentForm]) {
    forms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

pub(crate) fn tally_stats<'a, I>(forms: I) -> Vec<CategoryStats>
where
    I: IntoIterator<Item = &'a AssessmentForm>,
{
    let mut counts = [0u64; 5];
    for form in forms {
        if !form.is_active {
            continue;
        }
        if let Some(slot) = FormCategory::ALL.iter().position(|c| *c == form.category) {
            counts[slot] += 1;
        }
    }
    FormCategory::ALL
        .into_iter()
        .zip(counts)
        .map(|(name, count)| CategoryStats { name, count })
        .collect()
}
