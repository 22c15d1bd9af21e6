//! Template types and error definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::channel::Channel;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template cannot be empty")]
    Empty,

    #[error("Template syntax error: {0}")]
    Syntax(String),

    #[error("Template exceeds the limit of {limit} characters ({actual})")]
    LengthExceeded { limit: usize, actual: usize },

    #[error("Failed to render template: {0}")]
    Render(String),

    #[error("Failed to generate preview: {0}")]
    Preview(#[source] Box<TemplateError>),

    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Unknown channel: {0}")]
    UnknownChannel(String),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Options accepted by the validator
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationOptions {
    /// Overrides the channel's character limit
    #[serde(default)]
    pub max_length: Option<usize>,

    /// Accepted for compatibility; does not change the outcome
    #[serde(default)]
    pub strict_mode: bool,
}

/// Outcome of a static template inspection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub variables: Vec<String>,
    pub helpers: Vec<String>,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            is_valid: true,
            ..Default::default()
        }
    }

    /// Record a fatal diagnostic
    pub(crate) fn fail(&mut self, error: TemplateError) {
        self.errors.push(error.to_string());
        self.is_valid = false;
    }

    pub(crate) fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

/// Options accepted by the renderer
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RenderOptions {
    /// Referencing an undefined variable fails the render
    #[serde(default)]
    pub strict_mode: bool,

    /// Lets undefined variables render empty even in strict mode
    #[serde(default)]
    pub allow_undefined: bool,
}

impl RenderOptions {
    pub fn strict() -> Self {
        Self {
            strict_mode: true,
            allow_undefined: false,
        }
    }

    /// Whether the compiler should run in strict mode
    pub fn effective_strict(&self) -> bool {
        self.strict_mode && !self.allow_undefined
    }
}

/// Template fields needed to build a preview
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewTemplate {
    pub name: String,
    pub channel: Channel,
    #[serde(default = "default_language")]
    pub language: String,
    pub content: String,
}

/// Identity echo of the previewed template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewTemplateInfo {
    pub name: String,
    pub channel: Channel,
    pub language: String,
}

/// Rendered preview content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedContent {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// Result of a preview generation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewResult {
    pub template: PreviewTemplateInfo,
    pub processed: ProcessedContent,
    pub original_data: serde_json::Value,
}

pub(crate) fn default_language() -> String {
    "pt-BR".to_string()
}

fn default_active() -> bool {
    true
}

/// A stored notification template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationTemplate {
    /// Unique template identifier (UUID v4)
    pub id: String,

    /// Human-readable template name
    pub name: String,

    /// Optional title shown alongside the content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Handlebars source
    pub content: String,

    pub channel: Channel,

    /// Locale tag
    #[serde(default = "default_language")]
    pub language: String,

    /// Variables referenced by `content`, derived on every write
    #[serde(default)]
    pub variables: Vec<String>,

    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl NotificationTemplate {
    /// Fields used to preview this template
    pub fn preview_source(&self) -> PreviewTemplate {
        PreviewTemplate {
            name: self.name.clone(),
            channel: self.channel,
            language: self.language.clone(),
            content: self.content.clone(),
        }
    }
}

/// Request to create a new template
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,

    #[serde(default)]
    pub title: Option<String>,

    pub content: String,

    pub channel: Channel,

    /// Locale tag (optional, defaults to pt-BR)
    #[serde(default = "default_language")]
    pub language: String,

    /// Whether the template starts active (optional, defaults to true)
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Request to update an existing template
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,

    /// Title (optional, use null to clear)
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub title: Option<Option<String>>,

    pub content: Option<String>,

    pub channel: Option<Channel>,

    pub language: Option<String>,

    pub is_active: Option<bool>,
}

/// Distinguishes an explicit `null` from an absent field
fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Filter for listing templates
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateFilter {
    pub channel: Option<Channel>,
    pub active: Option<bool>,
    /// Case-insensitive match against name, title and content
    pub search: Option<String>,
}

/// Response for listing templates
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    /// List of templates
    pub templates: Vec<NotificationTemplate>,

    /// Total count
    pub total: usize,
}
