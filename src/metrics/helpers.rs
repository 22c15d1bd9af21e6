//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    TEMPLATES_STORED, TEMPLATE_PREVIEWS_TOTAL, TEMPLATE_RENDERS_TOTAL, TEMPLATE_RENDER_DURATION,
    TEMPLATE_VALIDATIONS_TOTAL,
};
use crate::template::Channel;

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

fn outcome(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "error"
    }
}

/// Helper struct for recording template engine metrics
pub struct TemplateMetrics;

impl TemplateMetrics {
    /// Record a validation outcome
    pub fn record_validation(channel: Channel, is_valid: bool) {
        TEMPLATE_VALIDATIONS_TOTAL
            .with_label_values(&[channel.as_str(), if is_valid { "valid" } else { "invalid" }])
            .inc();
    }

    /// Record a render and its duration
    pub fn observe_render(elapsed: Duration, ok: bool) {
        TEMPLATE_RENDERS_TOTAL.with_label_values(&[outcome(ok)]).inc();
        TEMPLATE_RENDER_DURATION.observe(elapsed.as_secs_f64());
    }

    /// Record a preview
    pub fn record_preview(channel: Channel, ok: bool) {
        TEMPLATE_PREVIEWS_TOTAL
            .with_label_values(&[channel.as_str(), outcome(ok)])
            .inc();
    }

    /// Update the catalogue size gauge
    pub fn set_stored(count: usize) {
        TEMPLATES_STORED.set(count as i64);
    }
}
