//! Sync a user's webcal subscription into stored calendar events.

use chrono::{DateTime, Utc};
use tokio_rusqlite::Connection;

use super::db::{upsert_event, upsert_subscription};
use super::error::{SyncError, SyncResult};
use super::extract::extract_event;
use super::fetch::{FeedFetcher, is_webcal_url};
use super::parse::parse_calendar;
use super::window::SyncWindow;

/// Check the request before doing any I/O.
pub fn validate_sync_request(user_id: &str, webcal_url: &str) -> SyncResult<()> {
    if user_id.is_empty() || webcal_url.is_empty() {
        return Err(SyncError::Validation(
            "user_id and webcal_url are required".to_string(),
        ));
    }
    if !is_webcal_url(webcal_url) {
        return Err(SyncError::Validation(
            "webcal_url must start with webcal://".to_string(),
        ));
    }
    Ok(())
}

/// Sync the feed at `webcal_url` for `user_id` and return the number
/// of newly created events.
pub async fn sync_calendar(
    db: &Connection,
    fetcher: &dyn FeedFetcher,
    user_id: &str,
    webcal_url: &str,
) -> SyncResult<usize> {
    sync_calendar_at(db, fetcher, user_id, webcal_url, Utc::now()).await
}

/// Same as [`sync_calendar`] with the window anchored at `now`.
///
/// The subscription row is written before the feed is fetched and is
/// kept even if the rest of the sync fails.
pub async fn sync_calendar_at(
    db: &Connection,
    fetcher: &dyn FeedFetcher,
    user_id: &str,
    webcal_url: &str,
    now: DateTime<Utc>,
) -> SyncResult<usize> {
    validate_sync_request(user_id, webcal_url)?;

    upsert_subscription(db, user_id, webcal_url).await?;

    let bytes = fetcher.fetch(webcal_url).await?;
    let components = parse_calendar(&bytes)?;
    let window = SyncWindow::trailing(now);

    let mut events_added = 0;
    let mut events_seen = 0;
    for component in &components {
        let record = extract_event(component)?;
        if !window.contains(record.start_time) {
            continue;
        }
        events_seen += 1;
        if upsert_event(db, user_id, &record).await? {
            events_added += 1;
        }
    }

    tracing::info!(
        "Synced calendar for {}: {} events in feed, {} in window, {} added",
        user_id,
        components.len(),
        events_seen,
        events_added
    );

    Ok(events_added)
}
