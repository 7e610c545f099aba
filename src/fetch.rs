use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::info;

const TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("today_notam/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to retrieve the page: {0}")]
    Status(u16),
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// One blocking GET. Anything but 200 is terminal; there are no retries.
pub fn fetch_page(url: &str) -> Result<String, FetchError> {
    let transport = |source| FetchError::Transport {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .map_err(transport)?;

    info!("Fetching NOTAM summary: {}", url);
    let response = client.get(url).send().map_err(transport)?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = response.text().map_err(transport)?;
    info!("Received {} bytes", body.len());
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SUMMARY_PATH: &str = "/Strani/Summary-C.aspx";

    async fn serve(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SUMMARY_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        server
    }

    // The blocking client must not run on the async runtime's worker.
    async fn fetch_blocking(url: String) -> Result<String, FetchError> {
        tokio::task::spawn_blocking(move || fetch_page(&url))
            .await
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn ok_response_returns_body() {
        let server = serve(200, "<html><body>Summary C</body></html>").await;
        let body = fetch_blocking(format!("{}{}", server.uri(), SUMMARY_PATH))
            .await
            .unwrap();
        assert_eq!(body, "<html><body>Summary C</body></html>");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn non_200_is_a_status_error() {
        let server = serve(503, "maintenance").await;
        let err = fetch_blocking(format!("{}{}", server.uri(), SUMMARY_PATH))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status(503)));
        assert_eq!(err.to_string(), "Failed to retrieve the page: 503");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unknown_path_is_a_status_error() {
        let server = serve(200, "ok").await;
        let err = fetch_blocking(format!("{}/Strani/Other.aspx", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status(404)));
    }
}
