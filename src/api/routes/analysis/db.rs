use anyhow::{Error, Result};
use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use tokio_rusqlite::Connection;

use super::public::CvAnalysis;
use crate::core::db::{timestamp_column, to_timestamp};

fn analysis_from_row(row: &rusqlite::Row) -> rusqlite::Result<CvAnalysis> {
    Ok(CvAnalysis {
        id: row.get(0)?,
        user_id: row.get(1)?,
        summary: row.get(2)?,
        text: row.get(3)?,
        created_at: timestamp_column(row, 4)?,
    })
}

pub async fn insert_cv_analysis(
    db: &Connection,
    user_id: &str,
    summary: &str,
    text: &str,
) -> Result<CvAnalysis, Error> {
    let created_at = Utc::now();
    let analysis = CvAnalysis {
        id: 0,
        user_id: user_id.to_owned(),
        summary: summary.to_owned(),
        text: text.to_owned(),
        created_at,
    };
    let ts = to_timestamp(&created_at);

    let row = analysis.clone();
    let id = db
        .call(move |conn| {
            conn.execute(
                "INSERT INTO cv_analysis (user_id, summary, text, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![row.user_id, row.summary, row.text, ts],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await?;

    Ok(CvAnalysis { id, ..analysis })
}

/// The most recent analysis for the user, if any
pub async fn latest_cv_analysis(db: &Connection, user_id: &str) -> Result<Option<CvAnalysis>, Error> {
    let user_id = user_id.to_owned();
    let analysis = db
        .call(move |conn| {
            let result = conn
                .query_row(
                    r"
                    SELECT id, user_id, summary, text, created_at
                    FROM cv_analysis
                    WHERE user_id = ?1
                    ORDER BY created_at DESC, id DESC
                    LIMIT 1
                    ",
                    [user_id],
                    analysis_from_row,
                )
                .optional()?;
            Ok(result)
        })
        .await?;

    Ok(analysis)
}
