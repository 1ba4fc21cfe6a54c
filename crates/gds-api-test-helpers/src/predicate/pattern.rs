//! Expected-body patterns with string-normalized keys.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::value_matcher::{value_matches, MatchMode};

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("pattern cannot be represented as JSON: {0}")]
    NotJson(#[from] serde_json::Error),
}

/// A JSON value describing an expected request body.
///
/// Keys are always strings. Patterns built from typed values go through
/// `serde_json`, so struct fields, unit enum variants and integer map keys
/// all end up as the same string keys a decoded body would carry.
///
/// Request bodies are normally mappings, but any JSON value is accepted as a
/// pattern. A sequence or scalar pattern is compared against the whole
/// decoded body with the same rules as a nested value, so `[1]` matches a
/// body of `[1]` and nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern(Value);

impl Pattern {
    /// Build a pattern from any serializable value.
    pub fn from_serialize<T: Serialize + ?Sized>(pattern: &T) -> Result<Self, PatternError> {
        Ok(Self(serde_json::to_value(pattern)?))
    }

    /// The normalized pattern.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the normalized pattern out.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Check an already-decoded value against this pattern.
    pub fn matches(&self, mode: MatchMode, observed: &Value) -> bool {
        value_matches(mode, &self.0, observed)
    }
}

impl From<Value> for Pattern {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Map<String, Value>> for Pattern {
    fn from(map: Map<String, Value>) -> Self {
        Self(Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Serialize, PartialEq, Eq, PartialOrd, Ord)]
    #[serde(rename_all = "snake_case")]
    enum Field {
        ContentId,
        Locale,
    }

    #[test]
    fn test_enum_keys_become_strings() {
        let mut typed = BTreeMap::new();
        typed.insert(Field::ContentId, "abc");
        typed.insert(Field::Locale, "en");

        let pattern = Pattern::from_serialize(&typed).unwrap();
        assert_eq!(
            pattern.as_value(),
            &json!({"content_id": "abc", "locale": "en"})
        );
    }

    #[test]
    fn test_struct_fields_become_strings() {
        #[derive(Serialize)]
        struct Inner {
            b: u32,
        }
        #[derive(Serialize)]
        struct Outer {
            a: Vec<Inner>,
        }

        let pattern = Pattern::from_serialize(&Outer {
            a: vec![Inner { b: 1 }],
        })
        .unwrap();
        assert_eq!(pattern, Pattern::from(json!({"a": [{"b": 1}]})));
    }

    #[test]
    fn test_integer_keys_become_strings() {
        let mut typed = BTreeMap::new();
        typed.insert(1u32, true);
        let pattern = Pattern::from_serialize(&typed).unwrap();
        assert_eq!(pattern.into_value(), json!({"1": true}));
    }

    #[test]
    fn test_non_string_keys_rejected() {
        let mut typed = BTreeMap::new();
        typed.insert((1, 2), "pair");
        assert!(Pattern::from_serialize(&typed).is_err());
    }
}
