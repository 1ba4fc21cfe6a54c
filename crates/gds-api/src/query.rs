//! Search query parameters and their query-string form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Reserved parameter carrying the zero-based record offset of a page.
pub const START_PARAM: &str = "start";
/// Reserved parameter carrying the page size.
pub const COUNT_PARAM: &str = "count";

/// Caller-supplied query parameters, passed through to the service untouched
/// apart from the reserved paging parameters.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SearchQuery(Map<String, Value>);

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a query from any serializable mapping (struct, map, `json!` object).
    ///
    /// `null` is accepted as the empty query; any other non-object is rejected.
    pub fn from_serialize<T: Serialize + ?Sized>(params: &T) -> Result<Self, ApiError> {
        match serde_json::to_value(params) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(Value::Null) => Ok(Self::default()),
            Ok(other) => Err(ApiError::InvalidArgument(format!(
                "query parameters must be a mapping, got {other}"
            ))),
            Err(e) => Err(ApiError::InvalidArgument(format!(
                "query parameters are not serializable: {e}"
            ))),
        }
    }

    /// Set a parameter, replacing any existing value.
    pub fn insert(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A copy of this query addressing one page: `start` and `count` are set as
    /// decimal strings, overriding any caller value.
    pub fn with_page(&self, start: usize, count: usize) -> Self {
        let mut paged = self.clone();
        paged
            .0
            .insert(START_PARAM.to_string(), Value::String(start.to_string()));
        paged
            .0
            .insert(COUNT_PARAM.to_string(), Value::String(count.to_string()));
        paged
    }

    /// Flatten into `(name, value)` pairs using nested-bracket notation:
    /// `topics[]=1&topics[]=2`, `order[public_timestamp]=desc`.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.0 {
            flatten_into(key.clone(), value, &mut pairs);
        }
        pairs
    }
}

impl From<Map<String, Value>> for SearchQuery {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn flatten_into(name: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => pairs.push((name, String::new())),
        Value::Bool(b) => pairs.push((name, b.to_string())),
        Value::Number(n) => pairs.push((name, n.to_string())),
        Value::String(s) => pairs.push((name, s.clone())),
        Value::Array(items) => {
            let item_name = format!("{name}[]");
            for item in items {
                flatten_into(item_name.clone(), item, pairs);
            }
        }
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(format!("{name}[{key}]"), nested, pairs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn test_scalar_pairs() {
        let query = SearchQuery::new()
            .insert("q", "query & stuff")
            .insert("debug", true)
            .insert("limit", 5);
        let pairs = query.to_pairs();
        assert!(pairs.contains(&pair("q", "query & stuff")));
        assert!(pairs.contains(&pair("debug", "true")));
        assert!(pairs.contains(&pair("limit", "5")));
    }

    #[test]
    fn test_array_and_nested_pairs() {
        let query = SearchQuery::from_serialize(&json!({
            "filter_topics": ["1", "2"],
            "order": {"public_timestamp": "desc"},
        }))
        .unwrap();
        assert_eq!(
            query.to_pairs(),
            vec![
                pair("filter_topics[]", "1"),
                pair("filter_topics[]", "2"),
                pair("order[public_timestamp]", "desc"),
            ]
        );
    }

    #[test]
    fn test_with_page_overrides_reserved_params() {
        let query = SearchQuery::new()
            .insert("q", "tax")
            .insert("start", 99)
            .insert("count", "7");
        let paged = query.with_page(4, 2);

        assert_eq!(paged.get("start"), Some(&json!("4")));
        assert_eq!(paged.get("count"), Some(&json!("2")));
        assert_eq!(paged.get("q"), Some(&json!("tax")));
        // the base query is left alone
        assert_eq!(query.get("start"), Some(&json!(99)));
    }

    #[test]
    fn test_from_serialize_struct() {
        #[derive(Serialize)]
        struct Params {
            q: &'static str,
            filter_format: Vec<&'static str>,
        }

        let query = SearchQuery::from_serialize(&Params {
            q: "benefits",
            filter_format: vec!["guide"],
        })
        .unwrap();
        assert_eq!(query.len(), 2);
        assert_eq!(query.get("filter_format"), Some(&json!(["guide"])));
    }

    #[test]
    fn test_from_serialize_rejects_non_mapping() {
        assert!(SearchQuery::from_serialize(&json!(null)).unwrap().is_empty());
        assert!(matches!(
            SearchQuery::from_serialize(&json!(["a"])),
            Err(ApiError::InvalidArgument(_))
        ));
    }
}
