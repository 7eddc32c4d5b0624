//! Retrieve a remote calendar feed.

use std::time::Duration;

use async_trait::async_trait;

use super::error::SyncResult;

const WEBCAL_SCHEME: &str = "webcal://";

/// Anything that can turn a feed URL into the raw document bytes.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> SyncResult<Vec<u8>>;
}

/// Rewrite a `webcal://` URL to `https://`. Anything else is returned
/// as is.
pub fn normalize_feed_url(url: &str) -> String {
    match url.strip_prefix(WEBCAL_SCHEME) {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

pub fn is_webcal_url(url: &str) -> bool {
    url.starts_with(WEBCAL_SCHEME)
}

/// Fetches feeds over HTTP with a per request timeout.
pub struct HttpFeedFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFeedFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> SyncResult<Vec<u8>> {
        let url = normalize_feed_url(url);
        tracing::debug!("Fetching calendar feed {}", url);

        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        let bytes = resp.bytes().await?;

        tracing::debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::SyncError;

    #[test]
    fn it_rewrites_webcal_scheme() {
        assert_eq!(
            normalize_feed_url("webcal://example.com/cal.ics"),
            "https://example.com/cal.ics"
        );
    }

    #[test]
    fn it_leaves_other_schemes_alone() {
        assert_eq!(
            normalize_feed_url("https://example.com/cal.ics"),
            "https://example.com/cal.ics"
        );
        // Prefix only and case sensitive
        assert_eq!(
            normalize_feed_url("WEBCAL://example.com/webcal://x"),
            "WEBCAL://example.com/webcal://x"
        );
    }

    #[tokio::test]
    async fn it_fetches_feed_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/cal.ics")
            .with_status(200)
            .with_header("content-type", "text/calendar")
            .with_body("BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n")
            .create();

        let fetcher = HttpFeedFetcher::new(Duration::from_secs(5));
        let bytes = fetcher
            .fetch(&format!("{}/cal.ics", server.url()))
            .await
            .unwrap();

        mock.assert();
        assert!(String::from_utf8(bytes).unwrap().starts_with("BEGIN:VCALENDAR"));
    }

    #[tokio::test]
    async fn it_returns_fetch_error_for_server_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/cal.ics")
            .with_status(500)
            .create();

        let fetcher = HttpFeedFetcher::new(Duration::from_secs(5));
        let result = fetcher.fetch(&format!("{}/cal.ics", server.url())).await;

        assert!(matches!(result, Err(SyncError::Fetch(_))));
    }
}
