use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trellis_core::model::{AssessmentForm, CategoryStats, CreateFormInput, FormCategory, FormStatus, UpdateFormInput};
use trellis_core::tree;
use trellis_store::ListFilter;

use crate::error::ApiError;
use crate::state::AppState;

/// Wire shape for a form: the stored document plus the derived field
/// count, computed at serialization time rather than persisted.
#[derive(Serialize)]
pub struct FormBody {
    #[serde(flatten)]
    form: AssessmentForm,
    fields: usize,
}

impl From<AssessmentForm> for FormBody {
    fn from(form: AssessmentForm) -> Self {
        let fields = tree::field_count(&form);
        Self { form, fields }
    }
}

#[derive(Serialize)]
pub struct Ack {
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageBody {
    usage_count: u32,
}

#[derive(Deserialize, Default)]
pub struct ListQuery {
    status: Option<String>,
    category: Option<String>,
    search: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateBody {
    created_by: String,
}

/// Map query strings onto the store filter. The `"all"` sentinel (and an
/// absent parameter) means no filter on that axis.
fn parse_filter(query: ListQuery) -> Result<ListFilter, ApiError> {
    let mut filter = ListFilter::default();
    if let Some(status) = query.status.filter(|s| s != "all") {
        filter.status = Some(
            FormStatus::parse(&status)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown status: {status}")))?,
        );
    }
    if let Some(category) = query.category.filter(|c| c != "all") {
        filter.category = Some(
            FormCategory::parse(&category)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown category: {category}")))?,
        );
    }
    filter.search = query.search.filter(|s| !s.is_empty());
    Ok(filter)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn list_forms(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<FormBody>>, ApiError> {
    let filter = parse_filter(query)?;
    let forms = state.store.list(filter).await?;
    Ok(Json(forms.into_iter().map(FormBody::from).collect()))
}

pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FormBody>, ApiError> {
    let form = state.store.get(id).await?;
    Ok(Json(form.into()))
}

pub async fn create_form(
    State(state): State<AppState>,
    Json(input): Json<CreateFormInput>,
) -> Result<(StatusCode, Json<FormBody>), ApiError> {
    let form = state.store.create(input).await?;
    tracing::info!(form_id = %form.id, created_by = %form.created_by, "assessment form created");
    Ok((StatusCode::CREATED, Json(form.into())))
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateFormInput>,
) -> Result<Json<FormBody>, ApiError> {
    let form = state.store.update(id, input).await?;
    tracing::info!(form_id = %id, "assessment form updated");
    Ok(Json(form.into()))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ack>, ApiError> {
    state.store.soft_delete(id).await?;
    tracing::info!(form_id = %id, "assessment form deleted");
    Ok(Json(Ack {
        message: "Assessment form deleted successfully".to_string(),
    }))
}

pub async fn toggle_archive(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FormBody>, ApiError> {
    let form = state.store.toggle_archive(id).await?;
    tracing::info!(form_id = %id, status = ?form.status, "assessment form archive toggled");
    Ok(Json(form.into()))
}

pub async fn duplicate_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<DuplicateBody>,
) -> Result<(StatusCode, Json<FormBody>), ApiError> {
    if body.created_by.trim().is_empty() {
        return Err(ApiError::BadRequest("Creator ID is required".to_string()));
    }
    let form = state.store.duplicate(id, body.created_by).await?;
    tracing::info!(source_id = %id, form_id = %form.id, "assessment form duplicated");
    Ok((StatusCode::CREATED, Json(form.into())))
}

pub async fn increment_usage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UsageBody>, ApiError> {
    let usage_count = state.store.increment_usage(id).await?;
    Ok(Json(UsageBody { usage_count }))
}

pub async fn category_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryStats>>, ApiError> {
    Ok(Json(state.store.category_stats().await?))
}
