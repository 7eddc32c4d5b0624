//! Database queries for the notes API
use anyhow::{Error, Result, anyhow};
use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use serde_json::json;
use tokio_rusqlite::Connection;

use super::public::Note;
use crate::core::db::{timestamp_column, to_timestamp};

fn note_from_row(row: &rusqlite::Row) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        content: row.get(1)?,
        created_at: timestamp_column(row, 2)?,
        updated_at: timestamp_column(row, 3)?,
    })
}

/// Notes owned by the user plus the globally shared default notes,
/// newest first.
pub async fn list_notes(
    db: &Connection,
    user_id: &str,
    default_note_ids: &[i64],
) -> Result<Vec<Note>, Error> {
    let user_id = user_id.to_owned();
    let default_ids_json = json!(default_note_ids).to_string();
    let notes = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                r"
                SELECT id, content, created_at, updated_at
                FROM note
                WHERE user_id = ?1
                   OR id IN (SELECT value FROM json_each(?2))
                ORDER BY created_at DESC, id DESC
                ",
            )?;
            let rows = stmt
                .query_map(params![user_id, default_ids_json], note_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await?;

    Ok(notes)
}

pub async fn insert_note(db: &Connection, user_id: &str, content: &str) -> Result<Note, Error> {
    let owner = user_id.to_owned();
    let content = content.to_owned();
    let ts = to_timestamp(&Utc::now());

    let id = db
        .call(move |conn| {
            conn.execute(
                "INSERT INTO note (user_id, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
                params![owner, content, ts],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await?;

    find_owned_note(db, id, user_id)
        .await?
        .ok_or(anyhow!("Note {} missing after insert", id))
}

/// A note the user may read: their own or one of the defaults
pub async fn find_note(
    db: &Connection,
    id: i64,
    user_id: &str,
    default_note_ids: &[i64],
) -> Result<Option<Note>, Error> {
    if default_note_ids.contains(&id) {
        let note = db
            .call(move |conn| {
                let result = conn
                    .query_row(
                        "SELECT id, content, created_at, updated_at FROM note WHERE id = ?1",
                        [id],
                        note_from_row,
                    )
                    .optional()?;
                Ok(result)
            })
            .await?;
        return Ok(note);
    }
    find_owned_note(db, id, user_id).await
}

pub async fn find_owned_note(db: &Connection, id: i64, user_id: &str) -> Result<Option<Note>, Error> {
    let user_id = user_id.to_owned();
    let note = db
        .call(move |conn| {
            let result = conn
                .query_row(
                    "SELECT id, content, created_at, updated_at FROM note WHERE id = ?1 AND user_id = ?2",
                    params![id, user_id],
                    note_from_row,
                )
                .optional()?;
            Ok(result)
        })
        .await?;

    Ok(note)
}

/// Replace the content of a note owned by the user. Returns `None`
/// when no such note exists.
pub async fn update_note(
    db: &Connection,
    id: i64,
    user_id: &str,
    content: &str,
) -> Result<Option<Note>, Error> {
    let owner = user_id.to_owned();
    let content = content.to_owned();
    let ts = to_timestamp(&Utc::now());

    let updated = db
        .call(move |conn| {
            let count = conn.execute(
                "UPDATE note SET content = ?1, updated_at = ?2 WHERE id = ?3 AND user_id = ?4",
                params![content, ts, id, owner],
            )?;
            Ok(count)
        })
        .await?;

    if updated == 0 {
        return Ok(None);
    }
    find_owned_note(db, id, user_id).await
}

/// Returns `false` when the user owns no note with that id
pub async fn delete_note(db: &Connection, id: i64, user_id: &str) -> Result<bool, Error> {
    let user_id = user_id.to_owned();
    let deleted = db
        .call(move |conn| {
            let count = conn.execute(
                "DELETE FROM note WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )?;
            Ok(count)
        })
        .await?;

    Ok(deleted > 0)
}
