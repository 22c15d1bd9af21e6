//! Helper registry and the built-in helper set.
//!
//! Every helper is a pure function over its positional arguments. Helpers are
//! wired into handlebars through `call_inner`, so they work both as plain
//! interpolations (`{{add a b}}`) and as sub-expressions
//! (`{{#if (gt amount 100)}}`).

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, ScopedJson,
};
use serde_json::Value;

use super::format::{format_currency, format_date_tokens, format_decimal, parse_date, Currency};

/// Signature shared by built-in and custom helpers
pub type HelperFn = dyn Fn(&[Value]) -> Value + Send + Sync;

const DEFAULT_DATE_FORMAT: &str = "DD/MM/YYYY";
const DEFAULT_TRUNCATE_LENGTH: usize = 50;
const DEFAULT_TRUNCATE_SUFFIX: &str = "...";
const DEFAULT_DECIMALS: usize = 2;

static NULL: Value = Value::Null;

/// Adapter exposing a [`HelperFn`] to handlebars
struct FnHelper(Arc<HelperFn>);

impl HelperDef for FnHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let args: Vec<Value> = h.params().iter().map(|p| p.value().clone()).collect();
        Ok(ScopedJson::Derived((self.0)(&args)))
    }
}

struct Engines {
    helpers: BTreeMap<String, Arc<HelperFn>>,
    lenient: Handlebars<'static>,
    strict: Handlebars<'static>,
}

impl Engines {
    fn build(helpers: BTreeMap<String, Arc<HelperFn>>) -> Self {
        let mut lenient = Handlebars::new();
        let mut strict = Handlebars::new();
        strict.set_strict_mode(true);

        for (name, helper) in &helpers {
            lenient.register_helper(name, Box::new(FnHelper(helper.clone())));
            strict.register_helper(name, Box::new(FnHelper(helper.clone())));
        }

        Self {
            helpers,
            lenient,
            strict,
        }
    }
}

/// Process-wide helper registry.
///
/// Built once at startup and shared by reference. Rendering takes a read lock;
/// registering or removing helpers is an administrative write.
pub struct HelperRegistry {
    engines: RwLock<Engines>,
}

impl Default for HelperRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HelperRegistry {
    /// Create a registry holding the built-in helpers
    pub fn new() -> Self {
        let helpers = builtin_helpers()
            .into_iter()
            .map(|(name, f)| (name.to_string(), Arc::new(f) as Arc<HelperFn>))
            .collect();

        Self {
            engines: RwLock::new(Engines::build(helpers)),
        }
    }

    /// Create a registry with no helpers at all
    pub fn empty() -> Self {
        Self {
            engines: RwLock::new(Engines::build(BTreeMap::new())),
        }
    }

    /// Register a helper, replacing any helper with the same name
    pub fn register<F>(&self, name: &str, helper: F)
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        let helper: Arc<HelperFn> = Arc::new(helper);
        let mut engines = self.engines.write().unwrap_or_else(PoisonError::into_inner);

        engines
            .lenient
            .register_helper(name, Box::new(FnHelper(helper.clone())));
        engines
            .strict
            .register_helper(name, Box::new(FnHelper(helper.clone())));

        if engines.helpers.insert(name.to_string(), helper).is_some() {
            tracing::debug!(helper = %name, "Replaced template helper");
        } else {
            tracing::debug!(helper = %name, "Registered template helper");
        }
    }

    /// Remove a helper. Unknown names are ignored.
    pub fn unregister(&self, name: &str) {
        let mut engines = self.engines.write().unwrap_or_else(PoisonError::into_inner);

        if engines.helpers.contains_key(name) {
            let mut helpers = std::mem::take(&mut engines.helpers);
            helpers.remove(name);
            *engines = Engines::build(helpers);
            tracing::debug!(helper = %name, "Removed template helper");
        }
    }

    /// Names of all registered helpers, sorted
    pub fn names(&self) -> Vec<String> {
        let engines = self.engines.read().unwrap_or_else(PoisonError::into_inner);
        engines.helpers.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        let engines = self.engines.read().unwrap_or_else(PoisonError::into_inner);
        engines.helpers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        let engines = self.engines.read().unwrap_or_else(PoisonError::into_inner);
        engines.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke a helper directly, outside of any template
    pub fn call(&self, name: &str, args: &[Value]) -> Option<Value> {
        let helper = {
            let engines = self.engines.read().unwrap_or_else(PoisonError::into_inner);
            engines.helpers.get(name).cloned()
        };
        helper.map(|f| f(args))
    }

    /// Compile and render `content` against `data`
    pub(crate) fn render_template(
        &self,
        content: &str,
        data: &Value,
        strict: bool,
    ) -> Result<String, RenderError> {
        let engines = self.engines.read().unwrap_or_else(PoisonError::into_inner);
        let engine = if strict {
            &engines.strict
        } else {
            &engines.lenient
        };
        engine.render_template(content, data)
    }
}

fn builtin_helpers() -> Vec<(&'static str, fn(&[Value]) -> Value)> {
    vec![
        ("formatDate", format_date),
        ("formatCurrency", format_currency_helper),
        ("formatNumber", format_number),
        ("capitalize", capitalize),
        ("uppercase", uppercase),
        ("lowercase", lowercase),
        ("truncate", truncate),
        ("eq", eq),
        ("ne", ne),
        ("gt", gt),
        ("lt", lt),
        ("gte", gte),
        ("lte", lte),
        ("add", add),
        ("subtract", subtract),
        ("multiply", multiply),
        ("divide", divide),
        ("length", length),
        ("first", first),
        ("last", last),
        ("contains", contains),
        ("url", url),
    ]
}

// ============================================================================
// Argument coercion
// ============================================================================

fn arg(args: &[Value], index: usize) -> &Value {
    args.get(index).unwrap_or(&NULL)
}

fn number_or_zero(value: &Value) -> f64 {
    value.as_f64().unwrap_or(0.0)
}

fn non_negative(value: &Value) -> Option<usize> {
    value
        .as_u64()
        .map(|n| n as usize)
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as usize))
}

/// Integral results become JSON integers so `{{add 1 2}}` renders `3`
fn number_value(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or_else(|| Value::from(0))
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Loose numeric view used by the ordering helpers
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => coerce_number(a)?.partial_cmp(&coerce_number(b)?),
    }
}

fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

// ============================================================================
// Formatting helpers
// ============================================================================

fn format_date(args: &[Value]) -> Value {
    let value = arg(args, 0);
    if is_falsy(value) {
        return Value::from("");
    }

    let format = arg(args, 1).as_str().unwrap_or(DEFAULT_DATE_FORMAT);
    match parse_date(value) {
        Some(date) => Value::from(format_date_tokens(&date, format)),
        None => Value::from(""),
    }
}

fn format_currency_helper(args: &[Value]) -> Value {
    let Some(amount) = arg(args, 0).as_f64() else {
        return Value::from(format_currency(0.0, Currency::Brl));
    };

    let currency = Currency::from_code(arg(args, 1).as_str().unwrap_or("BRL"));
    Value::from(format_currency(amount, currency))
}

fn format_number(args: &[Value]) -> Value {
    let Some(value) = arg(args, 0).as_f64() else {
        return Value::from("0");
    };

    let decimals = non_negative(arg(args, 1)).unwrap_or(DEFAULT_DECIMALS);
    Value::from(format_decimal(value, decimals))
}

// ============================================================================
// String helpers
// ============================================================================

fn capitalize(args: &[Value]) -> Value {
    let Some(text) = arg(args, 0).as_str() else {
        return Value::from("");
    };

    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return Value::from("");
    };

    let mut capitalized: String = first.to_uppercase().collect();
    capitalized.push_str(&chars.as_str().to_lowercase());
    Value::from(capitalized)
}

fn uppercase(args: &[Value]) -> Value {
    Value::from(arg(args, 0).as_str().map(str::to_uppercase).unwrap_or_default())
}

fn lowercase(args: &[Value]) -> Value {
    Value::from(arg(args, 0).as_str().map(str::to_lowercase).unwrap_or_default())
}

fn truncate(args: &[Value]) -> Value {
    let Some(text) = arg(args, 0).as_str() else {
        return Value::from("");
    };

    let length = non_negative(arg(args, 1)).unwrap_or(DEFAULT_TRUNCATE_LENGTH);
    if text.chars().count() <= length {
        return Value::from(text);
    }

    let suffix = arg(args, 2).as_str().unwrap_or(DEFAULT_TRUNCATE_SUFFIX);
    let mut truncated: String = text.chars().take(length).collect();
    truncated.push_str(suffix);
    Value::from(truncated)
}

fn contains(args: &[Value]) -> Value {
    match (arg(args, 0).as_str(), arg(args, 1).as_str()) {
        (Some(text), Some(needle)) => {
            Value::Bool(text.to_lowercase().contains(&needle.to_lowercase()))
        }
        _ => Value::Bool(false),
    }
}

fn url(args: &[Value]) -> Value {
    let Some(path) = arg(args, 0).as_str() else {
        return Value::from("");
    };

    if path.starts_with("http") {
        return Value::from(path);
    }

    let base = arg(args, 1).as_str().unwrap_or("");
    Value::from(format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))
}

// ============================================================================
// Comparison helpers
// ============================================================================

fn eq(args: &[Value]) -> Value {
    Value::Bool(strict_equals(arg(args, 0), arg(args, 1)))
}

fn ne(args: &[Value]) -> Value {
    Value::Bool(!strict_equals(arg(args, 0), arg(args, 1)))
}

fn gt(args: &[Value]) -> Value {
    Value::Bool(compare(arg(args, 0), arg(args, 1)) == Some(Ordering::Greater))
}

fn lt(args: &[Value]) -> Value {
    Value::Bool(compare(arg(args, 0), arg(args, 1)) == Some(Ordering::Less))
}

fn gte(args: &[Value]) -> Value {
    Value::Bool(matches!(
        compare(arg(args, 0), arg(args, 1)),
        Some(Ordering::Greater | Ordering::Equal)
    ))
}

fn lte(args: &[Value]) -> Value {
    Value::Bool(matches!(
        compare(arg(args, 0), arg(args, 1)),
        Some(Ordering::Less | Ordering::Equal)
    ))
}

// ============================================================================
// Arithmetic helpers
// ============================================================================

fn add(args: &[Value]) -> Value {
    number_value(number_or_zero(arg(args, 0)) + number_or_zero(arg(args, 1)))
}

fn subtract(args: &[Value]) -> Value {
    number_value(number_or_zero(arg(args, 0)) - number_or_zero(arg(args, 1)))
}

fn multiply(args: &[Value]) -> Value {
    number_value(number_or_zero(arg(args, 0)) * number_or_zero(arg(args, 1)))
}

fn divide(args: &[Value]) -> Value {
    let divisor = number_or_zero(arg(args, 1));
    if divisor == 0.0 {
        return Value::from(0);
    }
    number_value(number_or_zero(arg(args, 0)) / divisor)
}

// ============================================================================
// Array helpers
// ============================================================================

fn length(args: &[Value]) -> Value {
    Value::from(arg(args, 0).as_array().map(Vec::len).unwrap_or(0))
}

fn first(args: &[Value]) -> Value {
    arg(args, 0)
        .as_array()
        .and_then(|items| items.first())
        .cloned()
        .unwrap_or(Value::Null)
}

fn last(args: &[Value]) -> Value {
    arg(args, 0)
        .as_array()
        .and_then(|items| items.last())
        .cloned()
        .unwrap_or(Value::Null)
}
