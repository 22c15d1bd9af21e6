//! Template catalogue endpoints.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::server::AppState;
use crate::template::{
    CreateTemplateRequest, NotificationTemplate, PreviewResult, TemplateFilter,
    TemplateListResponse, UpdateTemplateRequest,
};

#[derive(Debug, Default, Deserialize)]
pub struct PreviewDataRequest {
    #[serde(default)]
    pub data: Option<Value>,
}

/// POST /api/v1/templates - Create a new template
#[tracing::instrument(
    name = "http.create_template",
    skip(state, request),
    fields(channel = %request.channel)
)]
pub async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<NotificationTemplate>)> {
    let created = state.template_store.create(request)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/templates - List templates, optionally filtered
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(
    State(state): State<AppState>,
    Query(filter): Query<TemplateFilter>,
) -> Json<TemplateListResponse> {
    let templates = state.template_store.list(&filter);
    let total = templates.len();

    Json(TemplateListResponse { templates, total })
}

/// GET /api/v1/templates/{id} - Get a specific template
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NotificationTemplate>> {
    Ok(Json(state.template_store.get(&id)?))
}

/// PUT /api/v1/templates/{id} - Update an existing template
#[tracing::instrument(name = "http.update_template", skip(state, request))]
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<NotificationTemplate>> {
    Ok(Json(state.template_store.update(&id, request)?))
}

/// DELETE /api/v1/templates/{id} - Delete a template
#[tracing::instrument(name = "http.delete_template", skip(state))]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.template_store.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/templates/{id}/duplicate - Copy a template (inactive)
#[tracing::instrument(name = "http.duplicate_template", skip(state))]
pub async fn duplicate_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<NotificationTemplate>)> {
    let copy = state.template_store.duplicate(&id)?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// PUT /api/v1/templates/{id}/toggle-active - Flip the active flag
#[tracing::instrument(name = "http.toggle_template", skip(state))]
pub async fn toggle_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NotificationTemplate>> {
    Ok(Json(state.template_store.toggle_active(&id)?))
}

/// POST /api/v1/templates/{id}/preview - Preview a stored template
///
/// The body is optional; without `data` the channel's example data is used.
#[tracing::instrument(name = "http.preview_stored_template", skip(state, body))]
pub async fn preview_stored_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<PreviewResult>> {
    let request: PreviewDataRequest = if body.is_empty() {
        PreviewDataRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::Validation(e.to_string()))?
    };

    let template = state.template_store.get(&id)?;
    let preview = state
        .processor
        .generate_preview(&template.preview_source(), request.data)?;

    Ok(Json(preview))
}
