//! Storage for calendar subscriptions and synced events
use anyhow::{Error, Result};
use chrono::Utc;
use rusqlite::{OptionalExtension, params, types::Type};
use tokio_rusqlite::Connection;

use super::models::{Attendee, CalendarEvent, CalendarSubscription, EventRecord};
use crate::core::db::{timestamp_column, to_timestamp};

const EVENT_COLUMNS: &str = r"
    user_id,
    event_id,
    summary,
    description,
    start_time,
    end_time,
    location,
    organizer,
    attendees,
    notes,
    status,
    meeting_link,
    created_at
";

fn event_from_row(row: &rusqlite::Row) -> rusqlite::Result<CalendarEvent> {
    let attendees_json: String = row.get(8)?;
    let attendees: Vec<Attendee> = serde_json::from_str(&attendees_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;

    Ok(CalendarEvent {
        user_id: row.get(0)?,
        record: EventRecord {
            event_id: row.get(1)?,
            summary: row.get(2)?,
            description: row.get(3)?,
            start_time: timestamp_column(row, 4)?,
            end_time: timestamp_column(row, 5)?,
            location: row.get(6)?,
            organizer: row.get(7)?,
            attendees,
            notes: row.get(9)?,
            status: row.get(10)?,
            meeting_link: row.get(11)?,
        },
        created_at: timestamp_column(row, 12)?,
    })
}

/// Create the subscription for a user or point the existing one at
/// a new URL.
pub async fn upsert_subscription(db: &Connection, user_id: &str, webcal_url: &str) -> Result<()> {
    let user_id = user_id.to_owned();
    let webcal_url = webcal_url.to_owned();
    let now = to_timestamp(&Utc::now());

    db.call(move |conn| {
        conn.execute(
            r"
            INSERT INTO calendar_subscription (user_id, webcal_url, last_sync, created_at)
            VALUES (?1, ?2, ?3, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                webcal_url = excluded.webcal_url,
                last_sync = excluded.last_sync
            ",
            params![user_id, webcal_url, now],
        )?;
        Ok(())
    })
    .await?;

    Ok(())
}

pub async fn find_subscription(
    db: &Connection,
    user_id: &str,
) -> Result<Option<CalendarSubscription>, Error> {
    let user_id = user_id.to_owned();
    let subscription = db
        .call(move |conn| {
            let result = conn
                .query_row(
                    r"
                    SELECT user_id, webcal_url, last_sync, created_at
                    FROM calendar_subscription
                    WHERE user_id = ?1
                    ",
                    [user_id],
                    |row| {
                        Ok(CalendarSubscription {
                            user_id: row.get(0)?,
                            webcal_url: row.get(1)?,
                            last_sync: timestamp_column(row, 2)?,
                            created_at: timestamp_column(row, 3)?,
                        })
                    },
                )
                .optional()?;
            Ok(result)
        })
        .await?;

    Ok(subscription)
}

/// Insert the event or replace every field of the existing one with
/// the same `(user_id, event_id)`. `created_at` is only set on
/// insert.
///
/// Returns `true` when a new row was created.
pub async fn upsert_event(db: &Connection, user_id: &str, record: &EventRecord) -> Result<bool> {
    let user_id = user_id.to_owned();
    let record = record.clone();
    let attendees = serde_json::to_string(&record.attendees)?;
    let now = to_timestamp(&Utc::now());

    let created = db
        .call(move |conn| {
            // Existence check and write share one transaction
            let tx = conn.transaction()?;
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM calendar_event WHERE user_id = ?1 AND event_id = ?2)",
                params![user_id, record.event_id],
                |row| row.get(0),
            )?;
            tx.execute(
                r"
                INSERT INTO calendar_event (
                    user_id, event_id, summary, description, start_time, end_time,
                    location, organizer, attendees, notes, status, meeting_link, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                ON CONFLICT(user_id, event_id) DO UPDATE SET
                    summary = excluded.summary,
                    description = excluded.description,
                    start_time = excluded.start_time,
                    end_time = excluded.end_time,
                    location = excluded.location,
                    organizer = excluded.organizer,
                    attendees = excluded.attendees,
                    notes = excluded.notes,
                    status = excluded.status,
                    meeting_link = excluded.meeting_link
                ",
                params![
                    user_id,
                    record.event_id,
                    record.summary,
                    record.description,
                    to_timestamp(&record.start_time),
                    to_timestamp(&record.end_time),
                    record.location,
                    record.organizer,
                    attendees,
                    record.notes,
                    record.status,
                    record.meeting_link,
                    now,
                ],
            )?;
            tx.commit()?;
            Ok(!exists)
        })
        .await?;

    Ok(created)
}

pub async fn find_event(
    db: &Connection,
    user_id: &str,
    event_id: &str,
) -> Result<Option<CalendarEvent>, Error> {
    let user_id = user_id.to_owned();
    let event_id = event_id.to_owned();
    let event = db
        .call(move |conn| {
            let sql = format!(
                "SELECT {} FROM calendar_event WHERE user_id = ?1 AND event_id = ?2",
                EVENT_COLUMNS
            );
            let result = conn
                .query_row(&sql, params![user_id, event_id], event_from_row)
                .optional()?;
            Ok(result)
        })
        .await?;

    Ok(event)
}

/// All stored events for a user, latest start first
pub async fn list_events(db: &Connection, user_id: &str) -> Result<Vec<CalendarEvent>, Error> {
    let user_id = user_id.to_owned();
    let events = db
        .call(move |conn| {
            let sql = format!(
                "SELECT {} FROM calendar_event WHERE user_id = ?1 ORDER BY start_time DESC",
                EVENT_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id], event_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await?;

    Ok(events)
}
