//! Cursor-based enumeration over a paged search endpoint.
//!
//! [`SearchEnumerator`] pulls one page per demand from a [`PageFetcher`],
//! starting at offset 0 and advancing by the requested page size until a page
//! comes back empty. A short final page therefore costs one extra fetch that
//! confirms the end; callers asserting on stubbed call counts rely on that.

use std::iter::FusedIterator;
use std::num::NonZeroUsize;

use serde_json::{Map, Value};
use tracing::debug;

use crate::query::SearchQuery;

/// One decoded result record.
pub type Record = Map<String, Value>;

/// Performs a single page request.
pub trait PageFetcher {
    type Error;

    /// Fetch the records at `start..start + count` for `query`.
    ///
    /// An empty vector means there are no more records.
    fn fetch_page(
        &self,
        query: &SearchQuery,
        start: usize,
        count: usize,
    ) -> Result<Vec<Record>, Self::Error>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    type Error = T::Error;

    fn fetch_page(
        &self,
        query: &SearchQuery,
        start: usize,
        count: usize,
    ) -> Result<Vec<Record>, Self::Error> {
        (**self).fetch_page(query, start, count)
    }
}

/// Start a fresh traversal of `query` at offset 0.
pub fn enumerate<F: PageFetcher>(
    fetcher: F,
    query: SearchQuery,
    page_size: NonZeroUsize,
) -> SearchEnumerator<F> {
    SearchEnumerator {
        fetcher,
        query,
        page_size: page_size.get(),
        offset: 0,
        page: Vec::new().into_iter(),
        finished: false,
    }
}

/// Lazy, forward-only sequence of search records.
///
/// Yields `Err` at most once: a fetch error ends the sequence at the current
/// position. So does an empty page.
pub struct SearchEnumerator<F: PageFetcher> {
    fetcher: F,
    query: SearchQuery,
    page_size: usize,
    /// Offset of the next page to request
    offset: usize,
    page: std::vec::IntoIter<Record>,
    finished: bool,
}

impl<F: PageFetcher> SearchEnumerator<F> {
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Offset the next fetch will request.
    pub fn next_offset(&self) -> usize {
        self.offset
    }

    pub fn is_finished(&self) -> bool {
        self.finished && self.page.len() == 0
    }
}

impl<F: PageFetcher> Iterator for SearchEnumerator<F> {
    type Item = Result<Record, F::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.page.next() {
                return Some(Ok(record));
            }
            if self.finished {
                return None;
            }

            debug!(
                start = self.offset,
                count = self.page_size,
                "fetching search page"
            );
            match self
                .fetcher
                .fetch_page(&self.query, self.offset, self.page_size)
            {
                Ok(records) if records.is_empty() => {
                    debug!(start = self.offset, "empty page, enumeration complete");
                    self.finished = true;
                    return None;
                }
                Ok(records) => {
                    // Advance by the requested size, not by what came back.
                    self.offset = self.offset.saturating_add(self.page_size);
                    self.page = records.into_iter();
                }
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<F: PageFetcher> FusedIterator for SearchEnumerator<F> {}
