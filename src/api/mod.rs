//! API layer - HTTP endpoint handlers organized by domain.

mod engine;
mod health;
mod metrics;
mod routes;
mod template;

// Re-export all handlers for use in server/app.rs
pub use engine::{
    example_data, extract_variables, list_helpers, preview_template, render_template,
    validate_template,
};
pub use health::health;
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use template::{
    create_template, delete_template, duplicate_template, get_template, list_templates,
    preview_stored_template, toggle_template, update_template,
};
