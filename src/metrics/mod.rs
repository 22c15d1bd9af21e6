//! Prometheus metrics for the template service.
//!
//! This module provides metrics for monitoring template processing:
//! - Validation outcomes per channel
//! - Render outcomes and latency
//! - Preview outcomes per channel
//! - Catalogue size

mod helpers;

pub use helpers::{encode_metrics, TemplateMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter_vec, register_int_gauge, Histogram, IntCounterVec,
    IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "tako";

lazy_static! {
    // ============================================================================
    // Engine Metrics
    // ============================================================================

    /// Validations by channel and outcome
    pub static ref TEMPLATE_VALIDATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_template_validations_total", METRIC_PREFIX),
        "Total template validations",
        &["channel", "outcome"]
    ).unwrap();

    /// Renders by outcome
    pub static ref TEMPLATE_RENDERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_template_renders_total", METRIC_PREFIX),
        "Total template renders",
        &["outcome"]
    ).unwrap();

    /// Render latency (compile + evaluate)
    pub static ref TEMPLATE_RENDER_DURATION: Histogram = register_histogram!(
        format!("{}_template_render_duration_seconds", METRIC_PREFIX),
        "Template render duration in seconds",
        vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]
    ).unwrap();

    /// Previews by channel and outcome
    pub static ref TEMPLATE_PREVIEWS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_template_previews_total", METRIC_PREFIX),
        "Total template previews generated",
        &["channel", "outcome"]
    ).unwrap();

    // ============================================================================
    // Catalogue Metrics
    // ============================================================================

    /// Templates currently stored
    pub static ref TEMPLATES_STORED: IntGauge = register_int_gauge!(
        format!("{}_templates_stored", METRIC_PREFIX),
        "Number of notification templates in the catalogue"
    ).unwrap();
}
