//! reqwest-based detail page fetcher.

use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT_ENCODING, CONTENT_TYPE, COOKIE, USER_AGENT,
};
use reqwest::Client;
use tracing::debug;

use super::{decode_body, excerpt, DetailPage, FetchError, FetchRequest, PageFetcher};

/// Fetches detail pages over HTTP(S).
///
/// The timeout is applied per request from [`FetchRequest::timeout`]. No
/// retries are made.
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(|e| FetchError::ClientSetup(e.to_string()))?;

        Ok(Self { client })
    }

    fn build_headers(request: &FetchRequest) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        insert_header(&mut headers, COOKIE, &request.cookie)?;
        insert_header(&mut headers, USER_AGENT, &request.user_agent)?;
        insert_header(&mut headers, ACCEPT_ENCODING, &request.accept_encoding)?;
        Ok(headers)
    }
}

fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: &str) -> Result<(), FetchError> {
    let value = HeaderValue::from_str(value)
        .map_err(|e| FetchError::InvalidRequest(format!("bad {} header: {}", name, e)))?;
    headers.insert(name, value);
    Ok(())
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<DetailPage, FetchError> {
        let headers = Self::build_headers(request)?;

        debug!(url = %request.url, "Fetching detail page");

        let response = self
            .client
            .get(&request.url)
            .headers(headers)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(request.timeout)
                } else if e.is_connect() {
                    FetchError::ConnectionFailed(e.to_string())
                } else if e.is_builder() {
                    FetchError::InvalidRequest(e.to_string())
                } else {
                    FetchError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(request.timeout)
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        let (body, encoding) = decode_body(&bytes, content_type.as_deref());

        debug!(
            url = %request.url,
            status = status.as_u16(),
            encoding = encoding.name(),
            bytes = bytes.len(),
            "Detail page fetched"
        );

        Ok(DetailPage {
            link: request.url.clone(),
            status: status.as_u16(),
            body,
            encoding: encoding.name().to_string(),
        })
    }
}
