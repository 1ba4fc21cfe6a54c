//! Request body predicates for stubbing and asserting on JSON requests.
//!
//! Two named constructors build a [`JsonBodyPredicate`] from a pattern:
//!
//! - [`request_json_matching`] - exact shape: identical keys at every level
//! - [`request_json_including`] - partial: pattern keys must be present, extra keys ignored
//!
//! In both modes arrays compare by length and position. Including never
//! treats an array as "contains these elements".
//!
//! # Module Structure
//!
//! - `value_matcher` - recursive comparison of two JSON values under a [`MatchMode`]
//! - `pattern` - string-keyed expected values, built from JSON or any `Serialize`
//! - `request` - body-decoding predicates over anything implementing [`RequestBody`]

mod pattern;
mod request;
mod value_matcher;

pub use pattern::{Pattern, PatternError};
pub use request::{
    request_json_including, request_json_matching, try_request_json_including,
    try_request_json_matching, JsonBodyPredicate, RecordedRequest, RequestBody,
};
pub use value_matcher::{value_matches, MatchMode};
