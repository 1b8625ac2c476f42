//! Page fetcher for the monitored download page

use std::time::Duration;

#[cfg(test)]
use mockall::automock;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::monitor::error::FetchError;

/// Trait for retrieving the raw text of the monitored page
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the page once
    ///
    /// # Returns
    /// * `Ok(String)` - Response body of a 2xx response
    /// * `Err(FetchError)` - Network error, timeout, or non-2xx status
    async fn fetch_page(&self) -> Result<String, FetchError>;
}

/// Fetches a single URL over HTTP with a fixed user agent and timeout
pub struct HttpPageFetcher {
    client: Client,
    url: String,
}

impl HttpPageFetcher {
    pub fn new(url: &str, user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self) -> Result<String, FetchError> {
        info!("Fetching version page: {}", self.url);

        let network_error = |source| FetchError::Network {
            url: self.url.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Version page returned status {}: {}", status, self.url);
            return Err(FetchError::Status {
                url: self.url.clone(),
                status,
            });
        }

        let body = response.text().await.map_err(network_error)?;
        debug!("Fetched {} bytes (status {})", body.len(), status);

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    const TEST_USER_AGENT: &str = "pgsharp-monitor-test/1.0";

    fn fetcher_for(url: &str) -> HttpPageFetcher {
        HttpPageFetcher::new(url, TEST_USER_AGENT, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn fetch_page_returns_body_and_sends_user_agent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("user-agent", TEST_USER_AGENT)
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<p>Latest Version: 1.2.3 (Android Only)</p>")
            .create_async()
            .await;

        let fetcher = fetcher_for(&format!("{}/", server.url()));
        let body = fetcher.fetch_page().await.unwrap();

        mock.assert_async().await;
        assert_eq!(body, "<p>Latest Version: 1.2.3 (Android Only)</p>");
    }

    #[tokio::test]
    async fn fetch_page_returns_status_error_for_non_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let fetcher = fetcher_for(&format!("{}/", server.url()));
        let result = fetcher.fetch_page().await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(FetchError::Status { status, .. }) if status.as_u16() == 503
        ));
    }

    #[tokio::test]
    async fn fetch_page_times_out_when_server_never_responds() {
        // Connections queue in the backlog but are never answered
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());

        let fetcher = HttpPageFetcher::new(&url, TEST_USER_AGENT, Duration::from_secs(1)).unwrap();
        let started = std::time::Instant::now();
        let result = fetcher.fetch_page().await;

        assert!(matches!(
            result,
            Err(FetchError::Network { ref source, .. }) if source.is_timeout()
        ));
        assert!(started.elapsed() < Duration::from_secs(10));
        drop(listener);
    }

    #[tokio::test]
    async fn fetch_page_handles_network_error() {
        let fetcher = fetcher_for("http://invalid.localhost.test:99999/");
        let result = fetcher.fetch_page().await;

        assert!(matches!(result, Err(FetchError::Network { .. })));
    }
}
