//! Trace fetcher.
//!
//! Drains every page of a scroll cursor over the trace store for spans
//! tagged with a given experiment identifier.

use crate::client::TraceStoreClient;
use crate::error::FetchError;
use crate::span::Span;
use std::sync::Arc;
use std::time::Duration;

/// Scroll keep-alive per page: two minutes.
pub const SCROLL_KEEPALIVE: Duration = Duration::from_secs(120);

/// Page size per scroll request: 5,000.
pub const SCROLL_PAGE_SIZE: usize = 5_000;

pub struct TraceFetcher {
    client: Arc<dyn TraceStoreClient>,
}

impl TraceFetcher {
    pub fn new(client: Arc<dyn TraceStoreClient>) -> Self {
        Self { client }
    }

    /// Fetch every span tagged with `identifier`, draining the scroll
    /// cursor. Retries the whole fetch once on `TraceStoreUnavailable`
    /// before surfacing the error.
    pub async fn fetch_spans(&self, identifier: &str) -> Result<Vec<Span>, FetchError> {
        match self.fetch_spans_once(identifier).await {
            Ok(spans) => Ok(spans),
            Err(first_err) => {
                tracing::warn!(
                    identifier,
                    error = %first_err,
                    "trace fetch failed, retrying once"
                );
                self.fetch_spans_once(identifier).await.map_err(|e| {
                    tracing::error!(identifier, error = %e, "trace fetch failed twice, aborting");
                    e
                })
            }
        }
    }

    async fn fetch_spans_once(&self, identifier: &str) -> Result<Vec<Span>, FetchError> {
        let mut spans = Vec::new();
        let mut cursor = None;
        loop {
            let (page, next_cursor) = self.client.scroll(identifier, cursor).await?;
            let had_spans = !page.is_empty();
            for span in page {
                if span.trace_id.is_some() {
                    spans.push(span);
                }
                // spans missing a trace id are dropped silently
            }
            match next_cursor {
                Some(c) => cursor = Some(c),
                None => break,
            }
            if !had_spans {
                break;
            }
        }
        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeStore {
        pages: Mutex<Vec<Vec<Span>>>,
    }

    fn span(trace_id: Option<&str>, id: &str) -> Span {
        Span {
            trace_id: trace_id.map(String::from),
            span_id: id.to_string(),
            parent_refs: vec![],
            start_unix_nanos: 0,
            service: "svc".into(),
            operation: "op".into(),
            tags: Default::default(),
        }
    }

    #[async_trait]
    impl TraceStoreClient for FakeStore {
        async fn scroll(
            &self,
            _identifier: &str,
            _cursor: Option<String>,
        ) -> Result<(Vec<Span>, Option<String>), FetchError> {
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                return Ok((vec![], None));
            }
            let page = pages.remove(0);
            let more = !pages.is_empty();
            Ok((page, more.then(|| "cursor".to_string())))
        }
    }

    #[tokio::test]
    async fn empty_identifier_returns_empty_list() {
        let store = Arc::new(FakeStore {
            pages: Mutex::new(vec![]),
        });
        let fetcher = TraceFetcher::new(store);
        let spans = fetcher.fetch_spans("init").await.unwrap();
        assert!(spans.is_empty());
    }

    #[tokio::test]
    async fn drains_all_pages() {
        let store = Arc::new(FakeStore {
            pages: Mutex::new(vec![
                vec![span(Some("t1"), "s1")],
                vec![span(Some("t1"), "s2"), span(Some("t2"), "s3")],
            ]),
        });
        let fetcher = TraceFetcher::new(store);
        let spans = fetcher.fetch_spans("h1").await.unwrap();
        assert_eq!(spans.len(), 3);
    }

    #[tokio::test]
    async fn drops_spans_without_trace_id() {
        let store = Arc::new(FakeStore {
            pages: Mutex::new(vec![vec![span(None, "orphan"), span(Some("t1"), "s1")]]),
        });
        let fetcher = TraceFetcher::new(store);
        let spans = fetcher.fetch_spans("h1").await.unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].span_id, "s1");
    }
}
