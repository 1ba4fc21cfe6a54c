//! Test support for consumers of `gds-api`.
//!
//! - [`predicate`] - JSON request-body predicates (`request_json_matching`,
//!   `request_json_including`) for stub registration and request assertions
//! - [`search_stubs`] - an in-memory search backend and `mockito` stubs for
//!   the search endpoint
//!
//! # Example
//!
//! ```
//! use gds_api_test_helpers::predicate::request_json_including;
//! use serde_json::json;
//!
//! let matcher = request_json_including(json!({"title": "Tax"}));
//! assert!(matcher.matches(r#"{"title": "Tax", "locale": "en"}"#));
//! ```

pub mod predicate;
pub mod search_stubs;

pub use predicate::{
    request_json_including, request_json_matching, JsonBodyPredicate, MatchMode, Pattern,
    RecordedRequest, RequestBody,
};
pub use search_stubs::{records, FakeSearchBackend, PageRequest, SearchStubs};
