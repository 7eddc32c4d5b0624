//! Router for the notes API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use axum_extra::extract::Query;

use super::public;
use crate::api::public::ApiError;
use crate::api::routes::notes::db as notes_db;
use crate::api::state::AppState;
use crate::api::utils::{json_body, required};

type SharedState = Arc<RwLock<AppState>>;

/// List a user's notes along with the default notes
async fn list_notes(
    State(state): State<SharedState>,
    Query(params): Query<public::UserQuery>,
) -> Result<Json<Vec<public::Note>>, ApiError> {
    let user_id = required(params.user_id, "user_id")?;
    let (db, default_note_ids) = {
        let shared_state = state.read().expect("Unable to read share state");
        (
            shared_state.db.clone(),
            shared_state.config.default_note_ids.clone(),
        )
    };
    let notes = notes_db::list_notes(&db, &user_id, &default_note_ids).await?;
    Ok(Json(notes))
}

async fn create_note(
    State(state): State<SharedState>,
    payload: Result<Json<public::NoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<public::Note>), ApiError> {
    let payload = json_body(payload)?;
    let user_id = required(payload.user_id, "user_id")?;
    let content = required(payload.content, "content")?;
    let db = state.read().expect("Unable to read share state").db.clone();

    let note = notes_db::insert_note(&db, &user_id, &content).await?;
    tracing::debug!("Created note {} for {}", note.id, user_id);
    Ok((StatusCode::CREATED, Json(note)))
}

async fn view_note(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Query(params): Query<public::UserQuery>,
) -> Result<Json<public::Note>, ApiError> {
    let user_id = required(params.user_id, "user_id")?;
    let (db, default_note_ids) = {
        let shared_state = state.read().expect("Unable to read share state");
        (
            shared_state.db.clone(),
            shared_state.config.default_note_ids.clone(),
        )
    };

    notes_db::find_note(&db, id, &user_id, &default_note_ids)
        .await?
        .map(Json)
        .ok_or(ApiError::not_found("Note not found"))
}

async fn update_note(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    payload: Result<Json<public::NoteRequest>, JsonRejection>,
) -> Result<Json<public::Note>, ApiError> {
    let payload = json_body(payload)?;
    let user_id = required(payload.user_id, "user_id")?;
    let content = required(payload.content, "content")?;
    let db = state.read().expect("Unable to read share state").db.clone();

    notes_db::update_note(&db, id, &user_id, &content)
        .await?
        .map(Json)
        .ok_or(ApiError::not_found("Note not found"))
}

async fn delete_note(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Query(params): Query<public::UserQuery>,
) -> Result<StatusCode, ApiError> {
    let user_id = required(params.user_id, "user_id")?;
    let db = state.read().expect("Unable to read share state").db.clone();

    if notes_db::delete_note(&db, id, &user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Note not found"))
    }
}

/// Create the notes router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route(
            "/{id}",
            get(view_note).put(update_note).delete(delete_note),
        )
}
