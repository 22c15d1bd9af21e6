//! Health check endpoint.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub helpers: usize,
    pub templates: TemplateHealthResponse,
}

#[derive(Debug, Serialize)]
pub struct TemplateHealthResponse {
    pub total: usize,
    pub by_channel: BTreeMap<String, usize>,
}

#[tracing::instrument(name = "http.health", skip(state))]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let by_channel = state
        .template_store
        .count_by_channel()
        .into_iter()
        .map(|(channel, count)| (channel.to_string(), count))
        .collect();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        helpers: state.registry.len(),
        templates: TemplateHealthResponse {
            total: state.template_store.count(),
            by_channel,
        },
    })
}
