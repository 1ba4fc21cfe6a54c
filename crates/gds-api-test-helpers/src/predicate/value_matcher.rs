//! Structural comparison of JSON values.

use serde_json::{Number, Value};

/// How strictly mappings are compared.
///
/// Sequences are compared the same way in both modes: same length,
/// element by element in order. Only mappings differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// Mapping key sets must be identical at every level.
    Exact,
    /// Pattern keys must be present at every level; extra observed keys are ignored.
    Including,
}

/// Check `observed` against `pattern` under `mode`.
///
/// Scalars must be the same JSON type with the same value. Numbers compare
/// by value, so `1` equals `1.0`. There is no coercion between numbers and
/// strings.
pub fn value_matches(mode: MatchMode, pattern: &Value, observed: &Value) -> bool {
    match (pattern, observed) {
        (Value::Object(expected), Value::Object(actual)) => {
            if mode == MatchMode::Exact && expected.len() != actual.len() {
                return false;
            }
            expected.iter().all(|(key, expected_val)| {
                actual
                    .get(key)
                    .is_some_and(|actual_val| value_matches(mode, expected_val, actual_val))
            })
        }
        (Value::Array(expected), Value::Array(actual)) => {
            expected.len() == actual.len()
                && expected
                    .iter()
                    .zip(actual.iter())
                    .all(|(e, a)| value_matches(mode, e, a))
        }
        (Value::Object(_) | Value::Array(_), _) => false,
        (Value::Number(expected), Value::Number(actual)) => numbers_equal(expected, actual),
        (scalar, observed) => scalar == observed,
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
