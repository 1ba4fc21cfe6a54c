//! Request predicates over JSON bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

use super::pattern::{Pattern, PatternError};
use super::value_matcher::MatchMode;

/// Anything that carries a raw request body.
pub trait RequestBody {
    fn body(&self) -> Option<&str>;
}

impl RequestBody for str {
    fn body(&self) -> Option<&str> {
        Some(self)
    }
}

impl RequestBody for String {
    fn body(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: RequestBody + ?Sized> RequestBody for &T {
    fn body(&self) -> Option<&str> {
        (**self).body()
    }
}

/// A request as captured by a mock HTTP layer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl RecordedRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

impl RequestBody for RecordedRequest {
    fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Matches requests whose body decodes to JSON satisfying a pattern.
///
/// Never fails: undecodable bodies simply don't match. An absent or blank
/// body is read as `{}`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBodyPredicate {
    pattern: Pattern,
    mode: MatchMode,
}

impl JsonBodyPredicate {
    /// Predicate comparing bodies against `pattern` under `mode`.
    pub fn new(pattern: impl Into<Pattern>, mode: MatchMode) -> Self {
        Self {
            pattern: pattern.into(),
            mode,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Decode the request body and compare it with the pattern.
    pub fn matches<R: RequestBody + ?Sized>(&self, request: &R) -> bool {
        let Some(observed) = decode_body(request.body()) else {
            return false;
        };
        let matched = self.pattern.matches(self.mode, &observed);
        if !matched {
            trace!(mode = ?self.mode, pattern = %self.pattern.as_value(), %observed, "request body did not match");
        }
        matched
    }

    /// The predicate as a plain closure, for layers that take `Fn(&R) -> bool`.
    pub fn into_fn<R: RequestBody + ?Sized>(self) -> impl Fn(&R) -> bool + Clone + Send + Sync {
        move |request: &R| self.matches(request)
    }
}

fn decode_body(body: Option<&str>) -> Option<Value> {
    let body = body.unwrap_or_default().trim();
    if body.is_empty() {
        return Some(Value::Object(Map::new()));
    }
    match serde_json::from_str(body) {
        Ok(value) => Some(value),
        Err(e) => {
            trace!(error = %e, "request body is not JSON");
            None
        }
    }
}

/// Body must have exactly the pattern's shape: same keys at every level.
pub fn request_json_matching(pattern: impl Into<Pattern>) -> JsonBodyPredicate {
    JsonBodyPredicate::new(pattern, MatchMode::Exact)
}

/// Body must contain the pattern's keys at every level; extra keys are fine.
/// Arrays still have to match element for element.
pub fn request_json_including(pattern: impl Into<Pattern>) -> JsonBodyPredicate {
    JsonBodyPredicate::new(pattern, MatchMode::Including)
}

/// [`request_json_matching`] for typed patterns, normalized through `serde_json`.
pub fn try_request_json_matching<T: Serialize + ?Sized>(
    pattern: &T,
) -> Result<JsonBodyPredicate, PatternError> {
    Ok(request_json_matching(Pattern::from_serialize(pattern)?))
}

/// [`request_json_including`] for typed patterns, normalized through `serde_json`.
pub fn try_request_json_including<T: Serialize + ?Sized>(
    pattern: &T,
) -> Result<JsonBodyPredicate, PatternError> {
    Ok(request_json_including(Pattern::from_serialize(pattern)?))
}
