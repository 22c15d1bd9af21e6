//! Variable and block-helper extraction, plus example datasets for previews.
//!
//! Extraction scans the raw template text with regular expressions rather than
//! walking a parsed syntax tree. It is best-effort: a name inside a string
//! literal argument is indistinguishable from a real reference, and helper
//! calls with arguments are skipped entirely.

use chrono::{SecondsFormat, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};

use super::channel::Channel;

/// Control constructs that are not reported as block helpers
const CONTROL_HELPERS: [&str; 4] = ["if", "unless", "each", "with"];

lazy_static! {
    static ref INTERPOLATION: Regex = Regex::new(r"\{\{([^#/][^}]*)\}\}").unwrap();
    static ref BLOCK_OPEN: Regex = Regex::new(r"\{\{#([^}]+)\}\}").unwrap();
}

/// Simple variable references in first-seen order, without duplicates.
///
/// `{{user.name}} and {{amount}}` yields `user.name` and `amount`. Helper
/// calls, block markers, partials, comments and `else` are not variables.
pub fn extract_variables(content: &str) -> Vec<String> {
    let mut variables: Vec<String> = Vec::new();

    for caps in INTERPOLATION.captures_iter(content) {
        let raw = caps[1].trim();
        let name = raw.trim_start_matches(['{', '&']).trim();

        if name.is_empty()
            || name.contains(char::is_whitespace)
            || name.contains('(')
            || name.starts_with(['>', '!'])
            || name == "else"
        {
            continue;
        }

        if !variables.iter().any(|v| v == name) {
            variables.push(name.to_string());
        }
    }

    variables
}

/// Names following a block-opening marker, excluding `if/unless/each/with`
pub fn extract_block_helpers(content: &str) -> Vec<String> {
    let mut helpers: Vec<String> = Vec::new();

    for caps in BLOCK_OPEN.captures_iter(content) {
        let Some(name) = caps[1].split_whitespace().next() else {
            continue;
        };

        if CONTROL_HELPERS.contains(&name) || helpers.iter().any(|h| h == name) {
            continue;
        }
        helpers.push(name.to_string());
    }

    helpers
}

/// Example context used when a preview is requested without data
pub fn example_data(channel: Channel) -> Value {
    let mut data = base_example_data();
    let extra = match channel {
        Channel::Whatsapp => json!({
            "message": "Olá! Você tem uma nova transação.",
            "link": "https://app.exemplo.com/transacao/123",
        }),
        Channel::Email => json!({
            "subject": "Nova transação registrada",
            "company": "Meu Tako",
            "supportEmail": "suporte@exemplo.com",
        }),
        Channel::Push => json!({
            "title": "Nova transação",
            "action": "Ver detalhes",
        }),
    };

    if let (Value::Object(base), Value::Object(extra)) = (&mut data, extra) {
        base.extend(extra);
    }
    data
}

/// Example context by channel name. Unknown names get the base context only.
pub fn example_data_for(channel: &str) -> Value {
    match channel.parse::<Channel>() {
        Ok(channel) => example_data(channel),
        Err(_) => base_example_data(),
    }
}

fn base_example_data() -> Value {
    json!({
        "user": {
            "name": "João Silva",
            "email": "joao@exemplo.com",
            "phone": "+55 11 99999-9999",
        },
        "amount": 150.75,
        "date": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "description": "Pagamento de conta",
        "category": "Alimentação",
        "wallet": "Carteira Principal",
        "balance": 1250.5,
    })
}
