use anyhow::{Error, Result, anyhow};
use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use tokio_rusqlite::Connection;

use super::public::Conversation;
use crate::core::db::{timestamp_column, to_timestamp};

fn conversation_from_row(row: &rusqlite::Row) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: row.get(0)?,
        content: row.get(1)?,
        created_at: timestamp_column(row, 2)?,
        updated_at: timestamp_column(row, 3)?,
    })
}

pub async fn list_conversations(db: &Connection, user_id: &str) -> Result<Vec<Conversation>, Error> {
    let user_id = user_id.to_owned();
    let conversations = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                r"
                SELECT id, content, created_at, updated_at
                FROM conversation
                WHERE user_id = ?1
                ORDER BY created_at DESC, id DESC
                ",
            )?;
            let rows = stmt
                .query_map([user_id], conversation_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await?;

    Ok(conversations)
}

pub async fn find_conversation(
    db: &Connection,
    id: i64,
    user_id: &str,
) -> Result<Option<Conversation>, Error> {
    let user_id = user_id.to_owned();
    let conversation = db
        .call(move |conn| {
            let result = conn
                .query_row(
                    r"
                    SELECT id, content, created_at, updated_at
                    FROM conversation
                    WHERE id = ?1 AND user_id = ?2
                    ",
                    params![id, user_id],
                    conversation_from_row,
                )
                .optional()?;
            Ok(result)
        })
        .await?;

    Ok(conversation)
}

pub async fn insert_conversation(
    db: &Connection,
    user_id: &str,
    content: &str,
) -> Result<Conversation, Error> {
    let owner = user_id.to_owned();
    let content = content.to_owned();
    let ts = to_timestamp(&Utc::now());

    let id = db
        .call(move |conn| {
            conn.execute(
                "INSERT INTO conversation (user_id, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
                params![owner, content, ts],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await?;

    find_conversation(db, id, user_id)
        .await?
        .ok_or(anyhow!("Conversation {} missing after insert", id))
}

pub async fn update_conversation(
    db: &Connection,
    id: i64,
    user_id: &str,
    content: &str,
) -> Result<Option<Conversation>, Error> {
    let owner = user_id.to_owned();
    let content = content.to_owned();
    let ts = to_timestamp(&Utc::now());

    let updated = db
        .call(move |conn| {
            let count = conn.execute(
                "UPDATE conversation SET content = ?1, updated_at = ?2 WHERE id = ?3 AND user_id = ?4",
                params![content, ts, id, owner],
            )?;
            Ok(count)
        })
        .await?;

    if updated == 0 {
        return Ok(None);
    }
    find_conversation(db, id, user_id).await
}

pub async fn delete_conversation(db: &Connection, id: i64, user_id: &str) -> Result<bool, Error> {
    let user_id = user_id.to_owned();
    let deleted = db
        .call(move |conn| {
            let count = conn.execute(
                "DELETE FROM conversation WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )?;
            Ok(count)
        })
        .await?;

    Ok(deleted > 0)
}
