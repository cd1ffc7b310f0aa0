//! Mock page fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::fetcher::{DetailPage, FetchError, FetchRequest, PageFetcher};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    pub url: String,
    pub cookie: String,
    pub user_agent: String,
    pub timeout: std::time::Duration,
    pub timestamp: Instant,
}

/// Mock implementation of the PageFetcher trait.
///
/// Pages are served by exact URL. Unknown URLs answer HTTP 404. Clones share
/// state, so a test can keep one handle and give another to the detector.
///
/// # Example
///
/// ```rust,ignore
/// use promogate_core::testing::{MockPageFetcher, fixtures};
///
/// let fetcher = MockPageFetcher::new();
/// fetcher.set_page(link, fixtures::nexusphp_page(fixtures::USERNAME, Some("free"))).await;
///
/// // ... run the filter ...
///
/// assert_eq!(fetcher.fetch_count().await, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockPageFetcher {
    /// Page bodies by URL.
    pages: Arc<RwLock<HashMap<String, String>>>,
    /// Permanent failures by URL.
    errors: Arc<RwLock<HashMap<String, FetchError>>>,
    /// If set, the next fetch fails with this error.
    next_error: Arc<RwLock<Option<FetchError>>>,
    /// Recorded requests, in order.
    requests: Arc<RwLock<Vec<RecordedFetch>>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub async fn set_page(&self, url: &str, body: impl Into<String>) {
        self.pages.write().await.insert(url.to_string(), body.into());
    }

    /// Fail every fetch of `url` with `error`.
    pub async fn set_error(&self, url: &str, error: FetchError) {
        self.errors.write().await.insert(url.to_string(), error);
    }

    /// Make the next fetch fail, whatever its URL.
    pub async fn set_next_error(&self, error: FetchError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn recorded_requests(&self) -> Vec<RecordedFetch> {
        self.requests.read().await.clone()
    }

    pub async fn fetch_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// URLs fetched, in order.
    pub async fn fetched_urls(&self) -> Vec<String> {
        self.requests
            .read()
            .await
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<DetailPage, FetchError> {
        self.requests.write().await.push(RecordedFetch {
            url: request.url.clone(),
            cookie: request.cookie.clone(),
            user_agent: request.user_agent.clone(),
            timeout: request.timeout,
            timestamp: Instant::now(),
        });

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        if let Some(error) = self.errors.read().await.get(&request.url) {
            return Err(error.clone());
        }

        match self.pages.read().await.get(&request.url) {
            Some(body) => Ok(DetailPage {
                link: request.url.clone(),
                status: 200,
                body: body.clone(),
                encoding: "UTF-8".to_string(),
            }),
            None => Err(FetchError::HttpStatus {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}
