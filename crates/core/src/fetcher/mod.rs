//! Detail page retrieval.
//!
//! [`PageFetcher`] is the boundary between the promotion detector and the
//! network. [`HttpPageFetcher`] is the reqwest implementation; tests use
//! [`MockPageFetcher`](crate::testing::MockPageFetcher).

mod charset;
mod http;

pub use charset::{decode_body, detect_encoding};
pub use http::HttpPageFetcher;

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::FetcherConfig;

/// A single authenticated detail page request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    /// Raw `Cookie` header value.
    pub cookie: String,
    pub user_agent: String,
    pub accept_encoding: String,
    pub timeout: Duration,
}

impl FetchRequest {
    pub fn new(url: &str, cookie: &str, settings: &FetcherConfig) -> Self {
        Self {
            url: url.to_string(),
            cookie: cookie.to_string(),
            user_agent: settings.user_agent.clone(),
            accept_encoding: settings.accept_encoding.clone(),
            timeout: settings.timeout(),
        }
    }
}

/// A fetched and decoded detail page.
#[derive(Debug, Clone, Serialize)]
pub struct DetailPage {
    /// The link the page was requested from.
    pub link: String,
    pub status: u16,
    pub body: String,
    /// Label of the encoding the body was decoded with.
    pub encoding: String,
}

/// Errors that can occur while fetching a detail page.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}

impl FetchError {
    /// HTTP status code, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Trait for detail page transports.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Transport name for logging.
    fn name(&self) -> &str;

    /// Fetch one page. Non-2xx responses and timeouts are errors.
    async fn fetch(&self, request: &FetchRequest) -> Result<DetailPage, FetchError>;
}

/// Keep error bodies short enough to log.
pub(crate) fn excerpt(body: &str) -> String {
    body.chars().take(200).collect()
}
