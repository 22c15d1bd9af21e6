//! Template processing facade: validation, rendering, introspection and previews

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::channel::Channel;
use super::helpers::HelperRegistry;
use super::introspect;
use super::renderer::Renderer;
use super::types::{
    PreviewResult, PreviewTemplate, PreviewTemplateInfo, ProcessedContent, RenderOptions,
    TemplateError, TemplateResult, ValidationOptions, ValidationResult,
};
use super::validator;
use crate::metrics::TemplateMetrics;

/// Subjects longer than this are not taken from the first line
const MAX_SUBJECT_LENGTH: usize = 100;

lazy_static! {
    static ref TITLE_TAG: Regex = Regex::new(r"(?i)<title[^>]*>(.*?)</title>").unwrap();
}

/// Entry point for every template operation.
///
/// Holds the shared helper registry; cheap to clone.
#[derive(Clone)]
pub struct TemplateProcessor {
    renderer: Renderer,
}

impl TemplateProcessor {
    pub fn new(registry: Arc<HelperRegistry>) -> Self {
        Self {
            renderer: Renderer::new(registry),
        }
    }

    pub fn registry(&self) -> &Arc<HelperRegistry> {
        self.renderer.registry()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Validate `content` for `channel`. Never fails; see [`ValidationResult`].
    pub fn validate(
        &self,
        content: &str,
        channel: Channel,
        options: &ValidationOptions,
    ) -> ValidationResult {
        let result = validator::validate(content, channel, options);
        TemplateMetrics::record_validation(channel, result.is_valid);
        result
    }

    pub fn render(
        &self,
        content: &str,
        data: &Value,
        options: RenderOptions,
    ) -> TemplateResult<String> {
        self.renderer.render(content, data, options)
    }

    pub fn extract_variables(&self, content: &str) -> Vec<String> {
        introspect::extract_variables(content)
    }

    pub fn extract_block_helpers(&self, content: &str) -> Vec<String> {
        introspect::extract_block_helpers(content)
    }

    pub fn example_data(&self, channel: Channel) -> Value {
        introspect::example_data(channel)
    }

    /// Render a preview of `template`.
    ///
    /// Without data (or with an empty object) the channel's example data is
    /// used. E-mail previews also carry a subject when one can be found.
    pub fn generate_preview(
        &self,
        template: &PreviewTemplate,
        data: Option<Value>,
    ) -> TemplateResult<PreviewResult> {
        let data = match data {
            Some(Value::Object(map)) if !map.is_empty() => Value::Object(map),
            _ => introspect::example_data(template.channel),
        };

        let content = match self
            .renderer
            .render(&template.content, &data, RenderOptions::default())
        {
            Ok(content) => content,
            Err(e) => {
                TemplateMetrics::record_preview(template.channel, false);
                return Err(TemplateError::Preview(Box::new(e)));
            }
        };
        TemplateMetrics::record_preview(template.channel, true);

        let subject = match template.channel {
            Channel::Email => extract_subject(&content),
            _ => None,
        };

        Ok(PreviewResult {
            template: PreviewTemplateInfo {
                name: template.name.clone(),
                channel: template.channel,
                language: template.language.clone(),
            },
            processed: ProcessedContent { content, subject },
            original_data: data,
        })
    }
}

/// `<title>` text, or else a short first line
fn extract_subject(content: &str) -> Option<String> {
    if let Some(caps) = TITLE_TAG.captures(content) {
        return Some(caps[1].to_string());
    }

    let first_line = content.split('\n').next()?.trim();
    if !first_line.is_empty() && first_line.chars().count() < MAX_SUBJECT_LENGTH {
        Some(first_line.to_string())
    } else {
        None
    }
}
