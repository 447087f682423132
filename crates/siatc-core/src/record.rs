//! # Records and Value Semantics
//!
//! A record is a JSON object mapping field keys to values. The renderers
//! never inspect values beyond the two operations defined here, so the
//! behavior of search and sort is fixed in one place.
//!
//! ## Display String
//!
//! | Value | Display |
//! |-------|---------|
//! | null / absent | `""` |
//! | boolean | `true` / `false` |
//! | number | JSON number text (`3`, `2.5`) |
//! | string | the string itself |
//! | array / object | compact JSON text |
//!
//! ## Total Ordering
//!
//! Values of different kinds compare by kind rank:
//!
//! ```text
//! absent = null < boolean < number < string < array < object
//! ```
//!
//! Within a kind: `false < true`; numbers by `f64::total_cmp`; strings
//! lexicographically by Unicode scalar value; arrays and objects by their
//! compact JSON text.

use std::cmp::Ordering;

use serde_json::{Map, Value};

/// A data record: field key to value.
pub type Record = Map<String, Value>;

fn kind_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Compare two (possibly absent) field values under the total ordering.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x @ Value::Array(_)), Some(y @ Value::Array(_)))
        | (Some(x @ Value::Object(_)), Some(y @ Value::Object(_))) => {
            x.to_string().cmp(&y.to_string())
        }
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

/// String form of a value, used for search matching and default formatting.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Whether any field value of `record` contains `query`, ignoring case.
///
/// An empty query matches every record.
pub fn matches_query(record: &Record, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    record
        .values()
        .any(|v| display_string(v).to_lowercase().contains(&needle))
}

/// Whether a value counts as "no value" for required-field checks.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(v: Value) -> Record {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(
            compare_values(Some(&json!(9)), Some(&json!(10))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!(2.5)), Some(&json!(2))),
            Ordering::Greater
        );
    }

    #[test]
    fn test_strings_compare_lexicographically() {
        assert_eq!(
            compare_values(Some(&json!("9")), Some(&json!("10"))),
            Ordering::Greater
        );
    }

    #[test]
    fn test_mixed_kinds_use_rank() {
        let order = [
            None,
            Some(json!(true)),
            Some(json!(-100)),
            Some(json!("")),
            Some(json!([])),
            Some(json!({})),
        ];
        for pair in order.windows(2) {
            assert_eq!(
                compare_values(pair[0].as_ref(), pair[1].as_ref()),
                Ordering::Less,
                "{:?} should sort before {:?}",
                pair[0],
                pair[1]
            );
        }
        assert_eq!(
            compare_values(None, Some(&Value::Null)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_display_string() {
        assert_eq!(display_string(&Value::Null), "");
        assert_eq!(display_string(&json!(false)), "false");
        assert_eq!(display_string(&json!(42)), "42");
        assert_eq!(display_string(&json!("Abierto")), "Abierto");
        assert_eq!(display_string(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_matches_query_any_field_any_case() {
        let r = rec(json!({"id": 7, "asunto": "Impresora sin tóner", "cerrado": false}));
        assert!(matches_query(&r, "IMPRESORA"));
        assert!(matches_query(&r, "tóner"));
        assert!(matches_query(&r, "7"));
        assert!(matches_query(&r, "fals"));
        assert!(!matches_query(&r, "monitor"));
        assert!(matches_query(&r, ""));
    }

    #[test]
    fn test_null_never_matches_literal_null() {
        let r = rec(json!({"nota": null}));
        assert!(!matches_query(&r, "null"));
    }

    #[test]
    fn test_is_empty_value() {
        assert!(is_empty_value(None));
        assert!(is_empty_value(Some(&Value::Null)));
        assert!(is_empty_value(Some(&json!(""))));
        assert!(is_empty_value(Some(&json!([]))));
        assert!(!is_empty_value(Some(&json!(" "))));
        assert!(!is_empty_value(Some(&json!(false))));
        assert!(!is_empty_value(Some(&json!(0))));
    }
}
