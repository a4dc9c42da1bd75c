//! Number normalization for upstream payloads that mix string and numeric
//! encodings (`"0.97%"`, `"123.4500"`, `-1.2`).

use serde_json::Value;

/// Reads a decimal from a JSON string or number. Non-finite and
/// unparseable values yield `None`.
pub fn normalize_decimal(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Reads a percent change. A trailing `%` is stripped from strings; numbers
/// are used as-is; anything missing or unparseable becomes `0.0`.
pub fn normalize_percent(value: Option<&Value>) -> f64 {
    let stripped = match value {
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            let without_sign = trimmed.strip_suffix('%').unwrap_or(trimmed);
            Value::String(without_sign.to_owned())
        }
        Some(other) => other.clone(),
        None => return 0.0,
    };
    normalize_decimal(Some(&stripped)).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn percent_string_drops_sign() {
        assert_eq!(normalize_percent(Some(&json!("47.39%"))), 47.39);
        assert_eq!(normalize_percent(Some(&json!(" -0.8120% "))), -0.812);
    }

    #[test]
    fn percent_number_is_used_directly() {
        assert_eq!(normalize_percent(Some(&json!(-1.2))), -1.2);
        assert_eq!(normalize_percent(Some(&json!(3))), 3.0);
    }

    #[test]
    fn unparseable_or_missing_percent_is_zero() {
        assert_eq!(normalize_percent(Some(&json!("abc%"))), 0.0);
        assert_eq!(normalize_percent(Some(&json!("%"))), 0.0);
        assert_eq!(normalize_percent(Some(&Value::Null)), 0.0);
        assert_eq!(normalize_percent(Some(&json!(true))), 0.0);
        assert_eq!(normalize_percent(None), 0.0);
    }

    #[test]
    fn non_finite_strings_are_rejected() {
        assert_eq!(normalize_percent(Some(&json!("NaN%"))), 0.0);
        assert_eq!(normalize_decimal(Some(&json!("inf"))), None);
    }

    #[test]
    fn decimal_accepts_strings_and_numbers() {
        assert_eq!(normalize_decimal(Some(&json!("512.3400"))), Some(512.34));
        assert_eq!(normalize_decimal(Some(&json!(7.5))), Some(7.5));
        assert_eq!(normalize_decimal(Some(&json!(""))), None);
        assert_eq!(normalize_decimal(None), None);
    }
}
