//! pt-BR number, currency and date formatting used by the built-in helpers

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

/// Currencies understood by `formatCurrency`. Anything other than BRL is USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Brl,
    Usd,
}

impl Currency {
    pub fn from_code(code: &str) -> Self {
        if code == "BRL" {
            Currency::Brl
        } else {
            Currency::Usd
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Currency::Brl => "R$",
            Currency::Usd => "US$",
        }
    }
}

const MAX_FRACTION_DIGITS: usize = 20;

/// Format `value` with `.` grouping and a decimal comma, fixed `decimals` places
pub fn format_decimal(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".to_string()
        } else if value > 0.0 {
            "∞".to_string()
        } else {
            "-∞".to_string()
        };
    }

    let decimals = decimals.min(MAX_FRACTION_DIGITS);
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value.is_sign_negative() && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// Format an amount as pt-BR currency, e.g. `R$ 1.250,50`
pub fn format_currency(amount: f64, currency: Currency) -> String {
    let number = format_decimal(amount.abs(), 2);
    let sign = if amount < 0.0 && number.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    // Intl separates symbol and amount with a no-break space
    format!("{}{}\u{a0}{}", sign, currency.symbol(), number)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Parse a date value the way the `formatDate` helper accepts it.
///
/// Strings may be RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` date-time or a
/// plain `YYYY-MM-DD` date; numbers are epoch milliseconds. Offsets carried by
/// the input are kept so the rendered wall-clock time matches the source.
pub fn parse_date(value: &serde_json::Value) -> Option<DateTime<FixedOffset>> {
    let utc = FixedOffset::east_opt(0)?;
    match value {
        serde_json::Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt);
            }
            for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                    return utc.from_local_datetime(&naive).single();
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .and_then(|naive| utc.from_local_datetime(&naive).single())
        }
        serde_json::Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis)
                .single()
                .map(|dt| dt.with_timezone(&utc))
        }
        _ => None,
    }
}

/// Substitute `DD`, `MM`, `YYYY`, `HH` and `mm` in `format`.
///
/// Each token is replaced once, in that order, by plain substring replacement.
/// A token hiding inside another word is replaced as well.
pub fn format_date_tokens(date: &DateTime<FixedOffset>, format: &str) -> String {
    format
        .replacen("DD", &format!("{:02}", date.day()), 1)
        .replacen("MM", &format!("{:02}", date.month()), 1)
        .replacen("YYYY", &date.year().to_string(), 1)
        .replacen("HH", &format!("{:02}", date.hour()), 1)
        .replacen("mm", &format!("{:02}", date.minute()), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_decimal_grouping() {
        assert_eq!(format_decimal(1234567.891, 2), "1.234.567,89");
        assert_eq!(format_decimal(150.75, 2), "150,75");
        assert_eq!(format_decimal(0.4, 0), "0");
        assert_eq!(format_decimal(999.0, 1), "999,0");
        assert_eq!(format_decimal(-1000.0, 2), "-1.000,00");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(150.75, Currency::Brl), "R$\u{a0}150,75");
        assert_eq!(format_currency(1250.5, Currency::Brl), "R$\u{a0}1.250,50");
        assert_eq!(format_currency(10.0, Currency::Usd), "US$\u{a0}10,00");
        assert_eq!(format_currency(-3.2, Currency::Brl), "-R$\u{a0}3,20");
    }

    #[test]
    fn test_currency_from_code_is_binary() {
        assert_eq!(Currency::from_code("BRL"), Currency::Brl);
        assert_eq!(Currency::from_code("EUR"), Currency::Usd);
        assert_eq!(Currency::from_code("brl"), Currency::Usd);
    }

    #[test]
    fn test_parse_date_variants() {
        let dt = parse_date(&json!("2024-03-05T14:07:00-03:00")).unwrap();
        assert_eq!((dt.day(), dt.hour(), dt.minute()), (5, 14, 7));

        let dt = parse_date(&json!("2024-03-05")).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 5));

        let dt = parse_date(&json!(0)).unwrap();
        assert_eq!(dt.year(), 1970);

        assert!(parse_date(&json!("not a date")).is_none());
        assert!(parse_date(&json!(true)).is_none());
    }

    #[test]
    fn test_format_date_tokens() {
        let dt = parse_date(&json!("2024-01-09T08:05:00Z")).unwrap();
        assert_eq!(format_date_tokens(&dt, "DD/MM/YYYY"), "09/01/2024");
        assert_eq!(format_date_tokens(&dt, "DD/MM/YYYY HH:mm"), "09/01/2024 08:05");
    }

    #[test]
    fn test_format_date_tokens_are_literal() {
        let dt = parse_date(&json!("2024-01-09T08:05:00Z")).unwrap();
        // "ADDRESS" contains DD, which is replaced like any other occurrence
        assert_eq!(format_date_tokens(&dt, "ADDRESS"), "A09RESS");
    }
}
