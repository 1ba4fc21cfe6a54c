//! Stand-ins for the search service: an in-memory page fetcher and mock-server stubs.

use std::collections::VecDeque;

use gds_api::search::{CONTENT_PATH, SEARCH_PATH};
use gds_api::{ApiError, PageFetcher, Record, SearchQuery, COUNT_PARAM, START_PARAM};
use mockito::{Matcher, Mock, ServerGuard};
use parking_lot::Mutex;
use serde_json::{json, Value};

/// One `fetch_page` call as seen by [`FakeSearchBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub query: SearchQuery,
    pub start: usize,
    pub count: usize,
}

enum Pages {
    /// Slice a fixed record set by start/count
    Records(Vec<Record>),
    /// Hand out scripted responses in order, then empty pages
    Scripted(Mutex<VecDeque<Result<Vec<Record>, ApiError>>>),
}

/// In-memory [`PageFetcher`] that records every page request.
pub struct FakeSearchBackend {
    pages: Pages,
    calls: Mutex<Vec<PageRequest>>,
}

impl FakeSearchBackend {
    /// Serve `records`, sliced by each request's `start` and `count`.
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            pages: Pages::Records(records),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer successive fetches with `pages` in order, regardless of offset.
    /// Once exhausted every fetch returns an empty page.
    pub fn scripted(pages: Vec<Result<Vec<Record>, ApiError>>) -> Self {
        Self {
            pages: Pages::Scripted(Mutex::new(pages.into())),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<PageRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// `start` of every fetch so far, in order.
    pub fn fetched_offsets(&self) -> Vec<usize> {
        self.calls.lock().iter().map(|c| c.start).collect()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }
}

impl PageFetcher for FakeSearchBackend {
    type Error = ApiError;

    fn fetch_page(
        &self,
        query: &SearchQuery,
        start: usize,
        count: usize,
    ) -> Result<Vec<Record>, ApiError> {
        self.calls.lock().push(PageRequest {
            query: query.clone(),
            start,
            count,
        });
        match &self.pages {
            Pages::Records(records) => Ok(records.iter().skip(start).take(count).cloned().collect()),
            Pages::Scripted(queue) => queue.lock().pop_front().unwrap_or_else(|| Ok(Vec::new())),
        }
    }
}

/// Convert JSON objects into records.
///
/// # Panics
///
/// Panics if any value is not a JSON object; fixtures are expected to be well formed.
pub fn records<I: IntoIterator<Item = Value>>(values: I) -> Vec<Record> {
    values
        .into_iter()
        .map(|value| match value {
            Value::Object(map) => map,
            other => panic!("search fixture records must be JSON objects, got {other}"),
        })
        .collect()
}

/// Registers search-service responses on a `mockito` server.
pub struct SearchStubs<'a> {
    server: &'a mut ServerGuard,
}

impl<'a> SearchStubs<'a> {
    pub fn new(server: &'a mut ServerGuard) -> Self {
        Self { server }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Stub the page at `start`/`count`, answering `{"results": records}`.
    /// Other query parameters are not constrained.
    pub fn page(&mut self, start: usize, count: usize, records: &[Value]) -> Mock {
        self.page_mock(start, count, records).create()
    }

    /// Like [`SearchStubs::page`] but not yet registered, so expectations can
    /// be set before calling `create()`.
    pub fn page_mock(&mut self, start: usize, count: usize, records: &[Value]) -> Mock {
        self.server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded(START_PARAM.to_string(), start.to_string()),
                Matcher::UrlEncoded(COUNT_PARAM.to_string(), count.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "results": records }).to_string())
    }

    /// Stub a whole result set split into `page_size` pages, plus the empty
    /// page that ends enumeration. Each mock expects exactly one hit.
    ///
    /// # Panics
    ///
    /// Panics if `page_size` is zero.
    pub fn paginated(&mut self, records: &[Value], page_size: usize) -> Vec<Mock> {
        assert!(page_size > 0, "page_size must be greater than zero");
        let mut mocks = Vec::new();
        let mut start = 0;
        for chunk in records.chunks(page_size) {
            mocks.push(self.page_mock(start, page_size, chunk).expect(1).create());
            start += page_size;
        }
        mocks.push(self.page_mock(start, page_size, &[]).expect(1).create());
        mocks
    }

    /// Any search request fails with `status`.
    pub fn search_fails(&mut self, status: usize) -> Mock {
        self.server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body(format!("search failed with status {status}"))
            .create()
    }

    /// `GET /content?link=...` returns `body`.
    pub fn has_content(&mut self, link: &str, body: &Value) -> Mock {
        self.server
            .mock("GET", CONTENT_PATH)
            .match_query(Matcher::UrlEncoded("link".to_string(), link.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create()
    }

    /// `DELETE /content?link=...` succeeds with an empty body.
    pub fn deletes_content(&mut self, link: &str) -> Mock {
        self.server
            .mock("DELETE", CONTENT_PATH)
            .match_query(Matcher::UrlEncoded("link".to_string(), link.to_string()))
            .with_status(204)
            .create()
    }
}
