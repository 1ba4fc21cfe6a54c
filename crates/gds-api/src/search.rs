//! Client for the site search service.

use std::num::NonZeroUsize;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::JsonClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::pagination::{enumerate, PageFetcher, Record, SearchEnumerator};
use crate::query::SearchQuery;

pub const SEARCH_PATH: &str = "/search.json";
pub const ADVANCED_SEARCH_PATH: &str = "/advanced_search";
pub const CONTENT_PATH: &str = "/content";

/// Page-shaped response body: `{"results": [...]}`.
#[derive(Debug, Deserialize)]
struct ResultPage {
    results: Option<Vec<Record>>,
}

#[derive(Debug, Clone)]
pub struct SearchApi {
    client: JsonClient,
}

impl SearchApi {
    /// Build a client for the search service described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: JsonClient::new(config)?,
        })
    }

    /// Wrap an existing JSON client.
    pub fn with_client(client: JsonClient) -> Self {
        Self { client }
    }

    /// The underlying JSON client.
    pub fn client(&self) -> &JsonClient {
        &self.client
    }

    /// Run a search, returning the decoded response as-is.
    pub fn search(
        &self,
        query: &SearchQuery,
        extra_headers: &[(String, String)],
    ) -> Result<Value, ApiError> {
        self.client
            .get_json_with_headers(SEARCH_PATH, &query.to_pairs(), extra_headers)
    }

    /// Run an advanced search. An empty query is rejected without a request.
    pub fn advanced_search(&self, query: &SearchQuery) -> Result<Value, ApiError> {
        if query.is_empty() {
            return Err(ApiError::InvalidArgument(
                "advanced search requires at least one parameter".to_string(),
            ));
        }
        self.client
            .get_json(ADVANCED_SEARCH_PATH, &query.to_pairs())
    }

    /// Every record matching `query`, fetched `page_size` at a time as the
    /// returned iterator is pulled.
    pub fn search_enum(
        &self,
        query: SearchQuery,
        page_size: usize,
    ) -> Result<SearchEnumerator<&Self>, ApiError> {
        let page_size = NonZeroUsize::new(page_size).ok_or_else(|| {
            ApiError::InvalidArgument("page size must be greater than zero".to_string())
        })?;
        Ok(enumerate(self, query, page_size))
    }

    /// Fetch the indexed content item for `link`.
    pub fn get_content(&self, link: &str) -> Result<Value, ApiError> {
        self.client
            .get_json(CONTENT_PATH, &[("link".to_string(), link.to_string())])
    }

    /// Remove the content item for `link` from the index.
    pub fn delete_content(&self, link: &str) -> Result<Value, ApiError> {
        self.client
            .delete(CONTENT_PATH, &[("link".to_string(), link.to_string())])
    }
}

impl PageFetcher for SearchApi {
    type Error = ApiError;

    fn fetch_page(
        &self,
        query: &SearchQuery,
        start: usize,
        count: usize,
    ) -> Result<Vec<Record>, ApiError> {
        let paged = query.with_page(start, count);
        let body = self.client.get_json(SEARCH_PATH, &paged.to_pairs())?;
        let records = decode_page(body)?;
        debug!(start, count, returned = records.len(), "decoded search page");
        Ok(records)
    }
}

/// Extract the `results` records; a missing key is an empty page.
fn decode_page(body: Value) -> Result<Vec<Record>, ApiError> {
    if !body.is_object() {
        return Err(ApiError::Decode(format!(
            "expected a JSON object with 'results', got {body}"
        )));
    }
    let page: ResultPage = serde_json::from_value(body)?;
    match page.results {
        Some(records) => Ok(records),
        None => {
            warn!("search response has no 'results' key, treating as empty page");
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_page_results() {
        let records = decode_page(json!({
            "results": [{"title": "t1"}, {"title": "t2"}],
            "total": 2,
        }))
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["title"], json!("t2"));
    }

    #[test]
    fn test_decode_page_missing_results_is_empty() {
        assert!(decode_page(json!({"total": 0})).unwrap().is_empty());
        assert!(decode_page(json!({"results": null})).unwrap().is_empty());
    }

    #[test]
    fn test_decode_page_rejects_bad_shapes() {
        assert!(matches!(decode_page(json!([])), Err(ApiError::Decode(_))));
        assert!(matches!(
            decode_page(json!({"results": "nope"})),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(
            decode_page(json!({"results": [1, 2]})),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn test_search_enum_rejects_zero_page_size() {
        let api = SearchApi::new(&ClientConfig::new("http://example.com")).unwrap();
        assert!(matches!(
            api.search_enum(SearchQuery::new(), 0),
            Err(ApiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_advanced_search_rejects_empty_query() {
        let api = SearchApi::new(&ClientConfig::new("http://example.com")).unwrap();
        assert!(matches!(
            api.advanced_search(&SearchQuery::new()),
            Err(ApiError::InvalidArgument(_))
        ));
    }
}
