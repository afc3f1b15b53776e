//! Helpers for the loosely typed values stored in a ficha's `datos` map.

use serde_json::{Map, Value};

/// Flat record data: field name -> scalar, or array of row objects for
/// repeatable sections.
pub type FichaData = Map<String, Value>;

/// Whether a stored value counts as answered.
///
/// Numbers (zero included) and booleans always count. Strings count when they
/// contain something other than whitespace, arrays and objects when non-empty.
pub fn is_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Number(_)) | Some(Value::Bool(_)) => true,
    }
}

/// String form of a stored value, the way inputs display it.
///
/// `null` renders as an empty string. Containers render as compact JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Same as [`value_to_string`] for an optional lookup.
pub fn opt_value_to_string(value: Option<&Value>) -> String {
    value.map(value_to_string).unwrap_or_default()
}

/// Numeric reading of a stored value: numbers as-is, strings parsed after trimming.
pub fn numeric_value(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Leading-integer parse: optional sign followed by digits, trailing garbage ignored.
///
/// `"12 puntos"` reads as 12, `"abc"` as `None`.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Integer reading of a stored value used by score sums. Anything unreadable is 0.
pub fn int_value(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => parse_int_prefix(s).unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filled_predicate_follows_value_kind() {
        assert!(!is_filled(None));
        assert!(!is_filled(Some(&Value::Null)));
        assert!(!is_filled(Some(&json!("   "))));
        assert!(is_filled(Some(&json!(" x "))));
        assert!(is_filled(Some(&json!(0))));
        assert!(is_filled(Some(&json!(false))));
        assert!(!is_filled(Some(&json!([]))));
        assert!(is_filled(Some(&json!([{}]))));
        assert!(!is_filled(Some(&json!({}))));
        assert!(is_filled(Some(&json!({"lat": 1}))));
    }

    #[test]
    fn int_prefix_ignores_trailing_text() {
        assert_eq!(parse_int_prefix("12 puntos"), Some(12));
        assert_eq!(parse_int_prefix(" -3"), Some(-3));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(int_value(Some(&json!("7"))), 7);
        assert_eq!(int_value(Some(&json!(2.9))), 2);
        assert_eq!(int_value(Some(&json!(null))), 0);
    }

    #[test]
    fn numeric_value_reads_numeric_strings() {
        assert_eq!(numeric_value(Some(&json!(" 2 "))), Some(2.0));
        assert_eq!(numeric_value(Some(&json!(3))), Some(3.0));
        assert_eq!(numeric_value(Some(&json!("dos"))), None);
    }
}
