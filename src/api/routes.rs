use axum::{
    routing::{get, post, put},
    Router,
};

use crate::server::AppState;

use super::engine::{
    example_data, extract_variables, list_helpers, preview_template, render_template,
    validate_template,
};
use super::health::health;
use super::metrics::prometheus_metrics;
use super::template::{
    create_template, delete_template, duplicate_template, get_template, list_templates,
    preview_stored_template, toggle_template, update_template,
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .nest(
            "/api/v1",
            Router::new()
                // Engine
                .route("/engine/validate", post(validate_template))
                .route("/engine/render", post(render_template))
                .route("/engine/preview", post(preview_template))
                .route("/engine/variables", post(extract_variables))
                .route("/engine/example-data/{channel}", get(example_data))
                .route("/engine/helpers", get(list_helpers))
                // Catalogue
                .route("/templates", post(create_template).get(list_templates))
                .route(
                    "/templates/{id}",
                    get(get_template).put(update_template).delete(delete_template),
                )
                .route("/templates/{id}/duplicate", post(duplicate_template))
                .route("/templates/{id}/toggle-active", put(toggle_template))
                .route("/templates/{id}/preview", post(preview_stored_template)),
        )
}
