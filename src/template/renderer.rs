//! Template rendering against a JSON data context

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use super::helpers::HelperRegistry;
use super::types::{RenderOptions, TemplateError, TemplateResult};
use crate::metrics::TemplateMetrics;

/// Compiles and renders templates with the helpers of a shared registry.
///
/// Output is HTML-escaped; escaping is never switched off implicitly.
#[derive(Clone)]
pub struct Renderer {
    registry: Arc<HelperRegistry>,
}

impl Renderer {
    pub fn new(registry: Arc<HelperRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<HelperRegistry> {
        &self.registry
    }

    /// Render `content` with `data`.
    ///
    /// Syntax errors, unknown helpers and (in strict mode) undefined variables
    /// fail with [`TemplateError::Render`].
    pub fn render(
        &self,
        content: &str,
        data: &Value,
        options: RenderOptions,
    ) -> TemplateResult<String> {
        let start = Instant::now();
        let result = self
            .registry
            .render_template(content, data, options.effective_strict());
        TemplateMetrics::observe_render(start.elapsed(), result.is_ok());

        result.map_err(|e| {
            tracing::warn!(error = %e, strict = options.effective_strict(), "Template render failed");
            TemplateError::Render(e.to_string())
        })
    }
}
