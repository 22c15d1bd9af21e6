//! Static template inspection.
//!
//! Only empty content, length overruns and syntax errors are fatal. Channel
//! and best-practice checks add warnings and never change `is_valid`.

use lazy_static::lazy_static;
use regex::Regex;

use super::channel::Channel;
use super::introspect::{extract_block_helpers, extract_variables};
use super::types::{TemplateError, ValidationOptions, ValidationResult};

const EACH_MARKER: &str = "{{#each";
const IF_MARKER: &str = "{{#if";
const MAX_CONDITIONALS: usize = 5;

lazy_static! {
    static ref EXPRESSION: Regex = Regex::new(r"\{\{([^}]+)\}\}").unwrap();
}

/// Validate template `content` for delivery over `channel`
pub fn validate(content: &str, channel: Channel, options: &ValidationOptions) -> ValidationResult {
    let mut result = ValidationResult::new();

    if content.trim().is_empty() {
        result.fail(TemplateError::Empty);
        return result;
    }

    let limit = options.max_length.unwrap_or_else(|| channel.max_length());
    let actual = content.chars().count();
    if actual > limit {
        result.fail(TemplateError::LengthExceeded { limit, actual });
    }

    match handlebars::Template::compile(content) {
        Ok(_) => {
            result.variables = extract_variables(content);
            result.helpers = extract_block_helpers(content);
        }
        Err(e) => result.fail(TemplateError::Syntax(e.to_string())),
    }

    check_channel(content, channel, &mut result);
    check_best_practices(content, &mut result);

    tracing::debug!(
        channel = %channel,
        is_valid = result.is_valid,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "Template validated"
    );

    result
}

fn check_channel(content: &str, channel: Channel, result: &mut ValidationResult) {
    match channel {
        Channel::Whatsapp => {
            if content.contains('<') && content.contains('>') {
                result.warn("WhatsApp does not support HTML. Use plain text.");
            }
        }
        Channel::Email => {
            if content.contains('<') && !content.contains("<html>") {
                result.warn(
                    "For e-mails, consider complete HTML with <html>, <body> and related tags.",
                );
            }
        }
        Channel::Push => {
            if content.chars().count() > Channel::PUSH_ADVISORY_LENGTH {
                result.warn(format!(
                    "Push notifications should be concise (at most {} characters recommended).",
                    Channel::PUSH_ADVISORY_LENGTH
                ));
            }
        }
    }
}

fn check_best_practices(content: &str, result: &mut ValidationResult) {
    for caps in EXPRESSION.captures_iter(content) {
        let expression = caps[1].trim();
        if expression.contains("undefined") || expression.contains("null") {
            result.warn(format!("Possibly undefined variable: {}", expression));
        }
    }

    // Raw-text heuristic: any two iteration markers count as nesting
    if content.matches(EACH_MARKER).count() >= 2 {
        result.warn("Multiple nested loops can cause performance problems.");
    }

    if content.matches(IF_MARKER).count() > MAX_CONDITIONALS {
        result.warn("Too many conditionals make the template hard to maintain.");
    }
}
