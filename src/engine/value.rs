//! Value semantics for rendering: truthiness, comparison and output.

use serde_json::Value;
use std::cmp::Ordering;

/// Whether a value counts as true in a condition.
///
/// `null`, `false`, `0`, `""`, `"0"` and empty arrays/objects are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Append the printed form of a value to `out`.
pub fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null | Value::Bool(false) => {}
        Value::Bool(true) => out.push('1'),
        Value::Number(n) => out.push_str(&format_number(n)),
        Value::String(s) => out.push_str(s),
        Value::Array(_) | Value::Object(_) => out.push_str(&value.to_string()),
    }
}

/// The printed form of a value.
pub fn to_output(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn format_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Numeric view of a value, if it has one.
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Build a JSON number, preferring an integer representation.
pub fn number(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < 9.0e15 {
        Value::from(f as i64)
    } else {
        serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number)
    }
}

/// Equality that compares numbers and numeric strings by value.
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), _) | (_, Value::Number(_)) => {
            match (to_number(left), to_number(right)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        (Value::Null, other) | (other, Value::Null) => !is_truthy(other),
        _ => left == right,
    }
}

/// Ordering for `<`, `<=`, `>`, `>=`: numeric when both sides are numeric,
/// otherwise by printed text.
pub fn compare(left: &Value, right: &Value) -> Ordering {
    match (to_number(left), to_number(right)) {
        (Some(a), Some(b)) if !(left.is_string() && right.is_string()) => {
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        _ => to_output(left).cmp(&to_output(right)),
    }
}

/// Number of elements, characters or entries.
pub fn count(value: &Value) -> usize {
    match value {
        Value::Null => 0,
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::String(s) => s.chars().count(),
        _ => 1,
    }
}

/// Elements of a value viewed as a collection, with their keys.
///
/// Arrays yield `(index, element)`, objects `(key, value)`, `null` nothing,
/// and any scalar yields itself once at index 0.
pub fn entries(value: &Value) -> Vec<(Value, Value)> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (Value::from(i), v.clone()))
            .collect(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (Value::String(k.clone()), v.clone()))
            .collect(),
        scalar => vec![(Value::from(0), scalar.clone())],
    }
}

/// Look up `key` below `value`: object keys, or array indices.
pub fn child<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Key text for a computed lookup value.
pub fn key_text(value: &Value) -> String {
    to_output(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!("0"), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{} should be falsy", falsy);
        }
        for truthy in [json!(true), json!(1), json!("a"), json!([0]), json!({"a": 1}), json!("false")] {
            assert!(is_truthy(&truthy), "{} should be truthy", truthy);
        }
    }

    #[test]
    fn output_formatting() {
        assert_eq!(to_output(&json!("Ada")), "Ada");
        assert_eq!(to_output(&json!(3)), "3");
        assert_eq!(to_output(&json!(2.5)), "2.5");
        assert_eq!(to_output(&json!(4.0)), "4");
        assert_eq!(to_output(&json!(true)), "1");
        assert_eq!(to_output(&json!(false)), "");
        assert_eq!(to_output(&json!(null)), "");
        assert_eq!(to_output(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn loose_equality() {
        assert!(loose_eq(&json!(1), &json!("1")));
        assert!(loose_eq(&json!(1), &json!(1.0)));
        assert!(loose_eq(&json!(null), &json!("")));
        assert!(loose_eq(&json!("a"), &json!("a")));
        assert!(!loose_eq(&json!("a"), &json!("b")));
        assert!(!loose_eq(&json!(1), &json!("x")));
    }

    #[test]
    fn comparison() {
        assert_eq!(compare(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(compare(&json!("2"), &json!(10)), Ordering::Less);
        assert_eq!(compare(&json!("b"), &json!("a")), Ordering::Greater);
        assert_eq!(compare(&json!("10"), &json!("9")), Ordering::Less);
    }

    #[test]
    fn entries_cast_to_list() {
        assert!(entries(&json!(null)).is_empty());
        assert_eq!(entries(&json!("x")), vec![(json!(0), json!("x"))]);
        assert_eq!(
            entries(&json!(["a", "b"])),
            vec![(json!(0), json!("a")), (json!(1), json!("b"))]
        );
        assert_eq!(entries(&json!({"k": 1})), vec![(json!("k"), json!(1))]);
    }

    #[test]
    fn child_lookup() {
        let value = json!({"list": [10, 20], "name": "x"});
        assert_eq!(child(&value, "name"), Some(&json!("x")));
        let list = child(&value, "list").unwrap();
        assert_eq!(child(list, "1"), Some(&json!(20)));
        assert_eq!(child(list, "5"), None);
        assert_eq!(child(&json!(3), "a"), None);
    }

    #[test]
    fn number_prefers_integers() {
        assert_eq!(number(3.0), json!(3));
        assert_eq!(number(0.5), json!(0.5));
    }

    #[test]
    fn count_values() {
        assert_eq!(count(&json!([1, 2, 3])), 3);
        assert_eq!(count(&json!("héllo")), 5);
        assert_eq!(count(&json!(null)), 0);
    }
}
