//! In-memory form store for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;
use uuid::Uuid;

use trellis_core::model::{AssessmentForm, CategoryStats, CreateFormInput, UpdateFormInput};

use crate::error::StoreError;
use crate::{FormStore, ListFilter, apply_update, build_form, duplicate_of, sort_recent_first, tally_stats, toggled_status};

#[derive(Default)]
pub struct MemoryFormStore {
    forms: RwLock<HashMap<Uuid, AssessmentForm>>,
}

impl MemoryFormStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormStore for MemoryFormStore {
    async fn create(&self, input: CreateFormInput) -> Result<AssessmentForm, StoreError> {
        let form = build_form(input, Timestamp::now())?;
        self.forms.write().await.insert(form.id, form.clone());
        Ok(form)
    }

    async fn get(&self, id: Uuid) -> Result<AssessmentForm, StoreError> {
        self.forms
            .read()
            .await
            .get(&id)
            .filter(|form| form.is_active)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self, filter: ListFilter) -> Result<Vec<AssessmentForm>, StoreError> {
        let forms = self.forms.read().await;
        let mut matching: Vec<AssessmentForm> = forms
            .values()
            .filter(|form| filter.matches(form))
            .cloned()
            .collect();
        sort_recent_first(&mut matching);
        Ok(matching)
    }

    async fn update(
        &self,
        id: Uuid,
        input: UpdateFormInput,
    ) -> Result<AssessmentForm, StoreError> {
        let mut forms = self.forms.write().await;
        let form = forms
            .get_mut(&id)
            .filter(|form| form.is_active)
            .ok_or(StoreError::NotFound(id))?;
        apply_update(form, input, Timestamp::now())?;
        Ok(form.clone())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut forms = self.forms.write().await;
        let form = forms
            .get_mut(&id)
            .filter(|form| form.is_active)
            .ok_or(StoreError::NotFound(id))?;
        form.is_active = false;
        form.updated_at = Timestamp::now();
        Ok(())
    }

    async fn toggle_archive(&self, id: Uuid) -> Result<AssessmentForm, StoreError> {
        let mut forms = self.forms.write().await;
        let form = forms
            .get_mut(&id)
            .filter(|form| form.is_active)
            .ok_or(StoreError::NotFound(id))?;
        form.status = toggled_status(form.status);
        form.updated_at = Timestamp::now();
        Ok(form.clone())
    }

    async fn duplicate(
        &self,
        id: Uuid,
        created_by: String,
    ) -> Result<AssessmentForm, StoreError> {
        let mut forms = self.forms.write().await;
        let source = forms
            .get(&id)
            .filter(|form| form.is_active)
            .ok_or(StoreError::NotFound(id))?;
        let clone = duplicate_of(source, created_by, Timestamp::now())?;
        forms.insert(clone.id, clone.clone());
        Ok(clone)
    }

    async fn increment_usage(&self, id: Uuid) -> Result<u32, StoreError> {
        let mut forms = self.forms.write().await;
        let form = forms
            .get_mut(&id)
            .filter(|form| form.is_active)
            .ok_or(StoreError::NotFound(id))?;
        form.usage_count += 1;
        form.updated_at = Timestamp::now();
        Ok(form.usage_count)
    }

    async fn category_stats(&self) -> Result<Vec<CategoryStats>, StoreError> {
        let forms = self.forms.read().await;
        Ok(tally_stats(forms.values()))
    }
}
