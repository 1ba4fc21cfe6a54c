//! Thin JSON HTTP client wrappers for GOV.UK services.
//!
//! The interesting part is [`pagination`]: a lazy enumerator that turns a
//! page-oriented search endpoint into one sequence of records. Everything else
//! is glue around a blocking `reqwest` client that maps HTTP statuses onto
//! typed [`ApiError`]s.
//!
//! # Example
//!
//! ```no_run
//! use gds_api::{ClientConfig, SearchApi, SearchQuery};
//!
//! let api = SearchApi::new(&ClientConfig::new("http://search.example.com"))?;
//! let query = SearchQuery::new().insert("filter_format", "guide");
//! for record in api.search_enum(query, 100)? {
//!     println!("{}", record?["title"]);
//! }
//! # Ok::<(), gds_api::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod pagination;
pub mod query;
pub mod search;

pub use client::JsonClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use pagination::{enumerate, PageFetcher, Record, SearchEnumerator};
pub use query::{SearchQuery, COUNT_PARAM, START_PARAM};
pub use search::SearchApi;
