//! HTTP fetcher tests against a local one-shot server.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use promogate_core::{FetchError, FetchRequest, FetcherConfig, HttpPageFetcher, PageFetcher};

/// Serve a single response. Returns the base URL and the raw request head.
async fn serve_once(
    status_line: &'static str,
    content_type: &'static str,
    body: Vec<u8>,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        let _ = tx.send(String::from_utf8_lossy(&head).into_owned());

        let mut response = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status_line,
            content_type,
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(&body);
        socket.write_all(&response).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    (format!("http://{}/details.php?id=1", addr), rx)
}

fn request(url: &str, timeout_secs: u64) -> FetchRequest {
    let settings = FetcherConfig {
        timeout_secs,
        ..FetcherConfig::default()
    };
    FetchRequest::new(url, "c_secure_uid=1; c_secure_pass=abc", &settings)
}

#[tokio::test]
async fn test_fetch_sends_session_headers() {
    let body = b"<html>ok</html>".to_vec();
    let (url, head) = serve_once("200 OK", "text/html; charset=utf-8", body).await;
    let fetcher = HttpPageFetcher::new().unwrap();

    let page = fetcher.fetch(&request(&url, 30)).await.unwrap();
    assert_eq!(page.status, 200);
    assert_eq!(page.body, "<html>ok</html>");
    assert_eq!(page.encoding, "UTF-8");

    let head = head.await.unwrap().to_lowercase();
    assert!(head.contains("cookie: c_secure_uid=1; c_secure_pass=abc"));
    assert!(head.contains("user-agent: mozilla/5.0"));
}

#[tokio::test]
async fn test_fetch_decodes_gbk_body() {
    let (body, _, _) = encoding_rs::GBK.encode("<html><b>免费</b></html>");
    let (url, _) = serve_once("200 OK", "text/html; charset=gbk", body.into_owned()).await;
    let fetcher = HttpPageFetcher::new().unwrap();

    let page = fetcher.fetch(&request(&url, 30)).await.unwrap();
    assert_eq!(page.body, "<html><b>免费</b></html>");
    assert_eq!(page.encoding, "GBK");
}

#[tokio::test]
async fn test_fetch_non_success_is_error() {
    let (url, _) = serve_once("503 Service Unavailable", "text/plain", b"busy".to_vec()).await;
    let fetcher = HttpPageFetcher::new().unwrap();

    let err = fetcher.fetch(&request(&url, 30)).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(matches!(err, FetchError::HttpStatus { ref body, .. } if body == "busy"));
}

#[tokio::test]
async fn test_fetch_times_out() {
    // Accept the connection but never answer.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let fetcher = HttpPageFetcher::new().unwrap();
    let err = fetcher
        .fetch(&request(&format!("http://{}/details.php?id=1", addr), 1))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Timeout(d) if d == Duration::from_secs(1)));
}

#[tokio::test]
async fn test_fetch_ignores_wrong_declared_charset() {
    let (body, _, _) = encoding_rs::GBK.encode("<html><b>免费</b></html>");
    let (url, _) = serve_once("200 OK", "text/html; charset=utf-8", body.into_owned()).await;
    let fetcher = HttpPageFetcher::new().unwrap();

    let page = fetcher.fetch(&request(&url, 30)).await.unwrap();
    assert_eq!(page.body, "<html><b>免费</b></html>");
    assert_eq!(page.encoding, "gb18030");
}
