//! Notification template engine.
//!
//! This module provides:
//! - A helper registry with formatting, comparison, arithmetic and array helpers
//! - Static validation with per-channel length limits and advisories
//! - Handlebars rendering against JSON data
//! - Variable extraction, example data and previews
//! - In-memory template catalogue with CRUD operations
//!
//! # Example
//!
//! ```ignore
//! let processor = TemplateProcessor::new(Arc::new(HelperRegistry::new()));
//!
//! let result = processor.validate(
//!     "Olá {{user.name}}, você gastou {{formatCurrency amount}}",
//!     Channel::Whatsapp,
//!     &ValidationOptions::default(),
//! );
//! assert!(result.is_valid);
//!
//! let text = processor.render(
//!     "{{capitalize category}}",
//!     &json!({ "category": "ALIMENTAÇÃO" }),
//!     RenderOptions::default(),
//! )?;
//! assert_eq!(text, "Alimentação");
//! ```

mod channel;
mod format;
mod helpers;
mod introspect;
mod processor;
mod renderer;
mod store;
mod types;
mod validator;

pub use channel::Channel;
pub use format::{format_currency, format_decimal, Currency};
pub use helpers::{HelperFn, HelperRegistry};
pub use introspect::{example_data, example_data_for, extract_block_helpers, extract_variables};
pub use processor::TemplateProcessor;
pub use renderer::Renderer;
pub use store::{create_template_store, TemplateStore};
pub use types::{
    CreateTemplateRequest, NotificationTemplate, PreviewResult, PreviewTemplate,
    PreviewTemplateInfo, ProcessedContent, RenderOptions, TemplateError, TemplateFilter,
    TemplateListResponse, TemplateResult, UpdateTemplateRequest, ValidationOptions,
    ValidationResult,
};
pub use validator::validate;
