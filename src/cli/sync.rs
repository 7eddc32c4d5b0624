use std::time::Duration;

use anyhow::Result;

use crate::calendar::{HttpFeedFetcher, sync_calendar};
use crate::core::AppConfig;
use crate::core::db::{async_db, migrate_db};

/// Run a single sync against the configured db and report how many
/// events were new.
pub async fn run(user_id: &str, url: &str, config: &AppConfig) -> Result<()> {
    let db = async_db(&config.db_path).await?;
    db.call(|conn| {
        migrate_db(conn)?;
        Ok(())
    })
    .await?;

    let fetcher = HttpFeedFetcher::new(Duration::from_secs(config.calendar_fetch_timeout_secs));
    let events_added = sync_calendar(&db, &fetcher, user_id, url).await?;
    println!("Synced calendar for {}: {} new events", user_id, events_added);

    Ok(())
}
