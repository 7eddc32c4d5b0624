use std::sync::Arc;
use std::time::Duration;

use tokio_rusqlite::Connection;

use crate::calendar::{FeedFetcher, HttpFeedFetcher};
use crate::core::AppConfig;

pub struct AppState {
    pub db: Connection,
    pub config: AppConfig,
    // Swappable so calendar syncs can run against a fixed feed
    pub feed_fetcher: Arc<dyn FeedFetcher>,
}

impl AppState {
    pub fn new(db: Connection, config: AppConfig) -> Self {
        let feed_fetcher = Arc::new(HttpFeedFetcher::new(Duration::from_secs(
            config.calendar_fetch_timeout_secs,
        )));
        Self {
            db,
            config,
            feed_fetcher,
        }
    }

    pub fn with_feed_fetcher(mut self, feed_fetcher: Arc<dyn FeedFetcher>) -> Self {
        self.feed_fetcher = feed_fetcher;
        self
    }
}
