//! Integration tests for `HttpFetcher`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no
//! real network traffic is made.

use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use snowdash_scraper::{FetchFailure, FetchRequest, HttpFetcher, MarkupFetcher};

fn test_fetcher() -> HttpFetcher {
    HttpFetcher::new("snowdash-test/0.1").expect("failed to build test HttpFetcher")
}

fn request(server: &MockServer, timeout: Duration) -> FetchRequest {
    FetchRequest {
        url: format!("{}/info-live", server.uri()),
        headers: vec![("Accept-Language".to_string(), "en-GB,en;q=0.9".to_string())],
        timeout,
    }
}

// ---------------------------------------------------------------------------
// Success
// ---------------------------------------------------------------------------

#[tokio::test]
async fn returns_body_and_sends_configured_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/info-live"))
        .and(header("user-agent", "snowdash-test/0.1"))
        .and(header("accept-language", "en-GB,en;q=0.9"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Brévent - 2525m</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let body = test_fetcher()
        .fetch_markup(&request(&server, Duration::from_secs(5)))
        .await;

    assert_eq!(body, Ok("<html>Brévent - 2525m</html>".to_string()));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_success_status_is_http_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/info-live"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let result = test_fetcher()
        .fetch_markup(&request(&server, Duration::from_secs(5)))
        .await;

    assert_eq!(result, Err(FetchFailure::HttpStatus(503)));
}

#[tokio::test]
async fn slow_response_is_timeout_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/info-live"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html>late</html>")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let result = test_fetcher()
        .fetch_markup(&request(&server, Duration::from_millis(200)))
        .await;

    assert_eq!(result, Err(FetchFailure::Timeout));
}

#[tokio::test]
async fn unreachable_host_is_network_failure() {
    let server = MockServer::start().await;
    let url = format!("{}/info-live", server.uri());
    drop(server);

    let result = test_fetcher()
        .fetch_markup(&FetchRequest {
            url,
            headers: Vec::new(),
            timeout: Duration::from_secs(5),
        })
        .await;

    assert!(
        matches!(result, Err(FetchFailure::Network(_))),
        "expected network failure, got: {result:?}"
    );
}
