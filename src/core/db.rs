//! SQLite connection setup and schema
use std::fs;

use anyhow::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection as SyncConnection;
use rusqlite::types::Type;
use tokio_rusqlite::Connection;

const DB_FILE_NAME: &str = "notekeeper.sqlite3";

/// Open (or create) the database living inside the `db_path`
/// directory.
pub async fn async_db(db_path: &str) -> Result<Connection, Error> {
    fs::create_dir_all(db_path)?;
    let db = Connection::open(format!("{}/{}", db_path.trim_end_matches('/'), DB_FILE_NAME))
        .await?;
    Ok(db)
}

/// Create all tables. Safe to run more than once.
pub fn initialize_db(conn: &SyncConnection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        r"
        BEGIN;

        CREATE TABLE IF NOT EXISTS note (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS note_user_idx ON note(user_id);

        CREATE TABLE IF NOT EXISTS conversation (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS conversation_user_idx ON conversation(user_id);

        CREATE TABLE IF NOT EXISTS cv_analysis (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            summary TEXT NOT NULL,
            text TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS cv_analysis_user_idx ON cv_analysis(user_id);

        CREATE TABLE IF NOT EXISTS calendar_subscription (
            user_id TEXT PRIMARY KEY,
            webcal_url TEXT NOT NULL,
            last_sync TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        -- (user_id, event_id) is the upsert key for syncing
        CREATE TABLE IF NOT EXISTS calendar_event (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            event_id TEXT NOT NULL,
            summary TEXT NOT NULL,
            description TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            location TEXT NOT NULL,
            organizer TEXT NOT NULL,
            attendees TEXT NOT NULL DEFAULT '[]',
            notes TEXT NOT NULL,
            status TEXT NOT NULL,
            meeting_link TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE(user_id, event_id)
        );

        COMMIT;
        ",
    )
}

/// Timestamps are stored as fixed width RFC 3339 strings in UTC so
/// they sort correctly as text.
pub fn to_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Read a timestamp column written by [`to_timestamp`].
pub fn timestamp_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Apply schema changes to an existing database.
pub fn migrate_db(conn: &SyncConnection) -> Result<(), rusqlite::Error> {
    // Every table is created with IF NOT EXISTS so a migration is
    // the same as initializing until columns start changing
    initialize_db(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn it_initializes_db_twice() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let db = async_db(dir.path().to_str().unwrap()).await?;
        db.call(|conn| {
            initialize_db(conn)?;
            migrate_db(conn)?;
            Ok(())
        })
        .await?;

        let tables: i64 = db
            .call(|conn| {
                let count = conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('note', 'conversation', 'cv_analysis', 'calendar_subscription', 'calendar_event')",
                    [],
                    |row| row.get(0),
                )?;
                Ok(count)
            })
            .await?;
        assert_eq!(tables, 5);
        Ok(())
    }

    #[test]
    fn it_sorts_timestamps_as_text() {
        use chrono::TimeZone;

        let earlier = to_timestamp(&Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());
        let later = to_timestamp(&Utc.with_ymd_and_hms(2025, 11, 2, 3, 4, 5).unwrap());
        assert!(earlier < later);
        assert_eq!(earlier, "2025-01-02T03:04:05.000000Z");
    }
}
