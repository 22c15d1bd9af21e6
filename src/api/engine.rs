//! Template engine endpoints: validation, rendering, previews and introspection.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::server::AppState;
use crate::template::{
    example_data_for, Channel, PreviewResult, PreviewTemplate, RenderOptions, ValidationOptions,
    ValidationResult,
};

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub content: String,
    pub channel: String,
    #[serde(default)]
    pub options: ValidationOptions,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub content: String,
    #[serde(default)]
    pub data: Value,
    /// Falls back to `templates.strict_rendering` when absent
    #[serde(default)]
    pub strict_mode: Option<bool>,
    #[serde(default)]
    pub allow_undefined: bool,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    #[serde(flatten)]
    pub template: PreviewTemplate,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct VariablesRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct VariablesResponse {
    pub variables: Vec<String>,
    pub helpers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HelpersResponse {
    pub helpers: Vec<String>,
    pub total: usize,
}

/// POST /api/v1/engine/validate - Static template checks
#[tracing::instrument(
    name = "http.validate_template",
    skip(state, request),
    fields(channel = %request.channel)
)]
pub async fn validate_template(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidationResult>> {
    let channel: Channel = request.channel.parse()?;
    let result = state
        .processor
        .validate(&request.content, channel, &request.options);

    Ok(Json(result))
}

/// POST /api/v1/engine/render - Render content against data
#[tracing::instrument(name = "http.render_template", skip(state, request))]
pub async fn render_template(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>> {
    let options = RenderOptions {
        strict_mode: request
            .strict_mode
            .unwrap_or(state.settings.templates.strict_rendering),
        allow_undefined: request.allow_undefined,
    };

    let content = state
        .processor
        .render(&request.content, &request.data, options)?;

    Ok(Json(RenderResponse { content }))
}

/// POST /api/v1/engine/preview - Preview ad-hoc content
#[tracing::instrument(
    name = "http.preview_template",
    skip(state, request),
    fields(channel = %request.template.channel)
)]
pub async fn preview_template(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResult>> {
    let preview = state
        .processor
        .generate_preview(&request.template, request.data)?;

    Ok(Json(preview))
}

/// POST /api/v1/engine/variables - Variables and block helpers used by content
#[tracing::instrument(name = "http.extract_variables", skip(state, request))]
pub async fn extract_variables(
    State(state): State<AppState>,
    Json(request): Json<VariablesRequest>,
) -> Json<VariablesResponse> {
    Json(VariablesResponse {
        variables: state.processor.extract_variables(&request.content),
        helpers: state.processor.extract_block_helpers(&request.content),
    })
}

/// GET /api/v1/engine/example-data/{channel} - Sample context for a channel
///
/// Unknown channel names get the shared base context.
#[tracing::instrument(name = "http.example_data")]
pub async fn example_data(Path(channel): Path<String>) -> Json<Value> {
    Json(example_data_for(&channel))
}

/// GET /api/v1/engine/helpers - Registered helper names
#[tracing::instrument(name = "http.list_helpers", skip(state))]
pub async fn list_helpers(State(state): State<AppState>) -> Json<HelpersResponse> {
    let helpers = state.registry.names();
    let total = helpers.len();

    Json(HelpersResponse { helpers, total })
}
