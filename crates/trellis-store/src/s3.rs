//! S3-backed form store: one JSON document per form.
//!
//! Reads and unconditional writes map directly onto GetObject/PutObject.
//! The usage counter uses ETag optimistic locking (If-Match) so two
//! racing increments serialize instead of losing an update.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use jiff::Timestamp;
use tracing::debug;
use uuid::Uuid;

use trellis_core::model::{AssessmentForm, CategoryStats, CreateFormInput, UpdateFormInput};

use crate::error::StoreError;
use crate::keys;
use crate::{FormStore, ListFilter, apply_update, build_form, duplicate_of, sort_recent_first, tally_stats, toggled_status};

pub struct S3FormStore {
    client: Client,
    bucket: String,
}

/// A loaded form document together with the ETag it was read at.
struct LoadedForm {
    form: AssessmentForm,
    etag: String,
}

impl S3FormStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a store from the ambient AWS configuration.
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), bucket)
    }

    async fn load(&self, id: Uuid) -> Result<LoadedForm, StoreError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(keys::form(id))
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_no_such_key() {
                    StoreError::NotFound(id)
                } else {
                    StoreError::Unavailable(err.to_string())
                }
            })?;

        let etag = resp.e_tag().unwrap_or_default().to_string();
        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .into_bytes();
        let form: AssessmentForm = serde_json::from_slice(&body)?;
        Ok(LoadedForm { form, etag })
    }

    /// Load a form, treating a soft-deleted document as absent.
    async fn load_active(&self, id: Uuid) -> Result<LoadedForm, StoreError> {
        let loaded = self.load(id).await?;
        if !loaded.form.is_active {
            return Err(StoreError::NotFound(id));
        }
        Ok(loaded)
    }

    async fn save(&self, form: &AssessmentForm) -> Result<(), StoreError> {
        let body = serde_json::to_vec(form)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(keys::form(form.id))
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.into_service_error().to_string()))?;
        Ok(())
    }

    /// Conditional write. Returns `Ok(false)` when the document changed
    /// underneath us (S3 answers 412 to a stale If-Match).
    async fn save_if_match(
        &self,
        form: &AssessmentForm,
        expected_etag: &str,
    ) -> Result<bool, StoreError> {
        let body = serde_json::to_vec(form)?;
        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(keys::form(form.id))
            .body(ByteStream::from(body))
            .content_type("application/json")
            .if_match(expected_etag)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let message = e.into_service_error().to_string();
                if message.contains("PreconditionFailed") {
                    Ok(false)
                } else {
                    Err(StoreError::Unavailable(message))
                }
            }
        }
    }

    /// Fetch every form document under the forms prefix.
    async fn load_all(&self) -> Result<Vec<AssessmentForm>, StoreError> {
        let mut forms = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut req = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(keys::FORMS_PREFIX);
            if let Some(token) = &continuation_token {
                req = req.continuation_token(token);
            }

            let resp = req
                .send()
                .await
                .map_err(|e| StoreError::Unavailable(e.into_service_error().to_string()))?;

            for object in resp.contents() {
                let Some(key) = object.key() else { continue };
                match self.fetch_document(key).await? {
                    Some(form) => forms.push(form),
                    // Deleted between list and get; skip.
                    None => continue,
                }
            }

            if resp.is_truncated() == Some(true) {
                continuation_token = resp.next_continuation_token().map(|s| s.to_string());
            } else {
                break;
            }
        }

        Ok(forms)
    }

    async fn fetch_document(&self, key: &str) -> Result<Option<AssessmentForm>, StoreError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;
        let resp = match resp {
            Ok(resp) => resp,
            Err(e) => {
                let err = e.into_service_error();
                if err.is_no_such_key() {
                    return Ok(None);
                }
                return Err(StoreError::Unavailable(err.to_string()));
            }
        };
        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .into_bytes();
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

#[async_trait]
impl FormStore for S3FormStore {
    async fn create(&self, input: CreateFormInput) -> Result<AssessmentForm, StoreError> {
        let form = build_form(input, Timestamp::now())?;
        self.save(&form).await?;
        Ok(form)
    }

    async fn get(&self, id: Uuid) -> Result<AssessmentForm, StoreError> {
        Ok(self.load_active(id).await?.form)
    }

    async fn list(&self, filter: ListFilter) -> Result<Vec<AssessmentForm>, StoreError> {
        let mut forms = self.load_all().await?;
        forms.retain(|form| filter.matches(form));
        sort_recent_first(&mut forms);
        Ok(forms)
    }

    async fn update(
        &self,
        id: Uuid,
        input: UpdateFormInput,
    ) -> Result<AssessmentForm, StoreError> {
        let mut loaded = self.load_active(id).await?;
        apply_update(&mut loaded.form, input, Timestamp::now())?;
        self.save(&loaded.form).await?;
        Ok(loaded.form)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut loaded = self.load_active(id).await?;
        loaded.form.is_active = false;
        loaded.form.updated_at = Timestamp::now();
        self.save(&loaded.form).await
    }

    async fn toggle_archive(&self, id: Uuid) -> Result<AssessmentForm, StoreError> {
        let mut loaded = self.load_active(id).await?;
        loaded.form.status = toggled_status(loaded.form.status);
        loaded.form.updated_at = Timestamp::now();
        self.save(&loaded.form).await?;
        Ok(loaded.form)
    }

    async fn duplicate(
        &self,
        id: Uuid,
        created_by: String,
    ) -> Result<AssessmentForm, StoreError> {
        let source = self.load_active(id).await?.form;
        let clone = duplicate_of(&source, created_by, Timestamp::now())?;
        self.save(&clone).await?;
        Ok(clone)
    }

    async fn increment_usage(&self, id: Uuid) -> Result<u32, StoreError> {
        loop {
            let LoadedForm { mut form, etag } = self.load_active(id).await?;
            form.usage_count += 1;
            form.updated_at = Timestamp::now();
            if self.save_if_match(&form, &etag).await? {
                return Ok(form.usage_count);
            }
            debug!(form_id = %id, "usage increment raced a concurrent write, retrying");
        }
    }

    async fn category_stats(&self) -> Result<Vec<CategoryStats>, StoreError> {
        let forms = self.load_all().await?;
        Ok(tally_stats(forms.iter()))
    }
}
