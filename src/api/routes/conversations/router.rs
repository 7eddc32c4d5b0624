//! Router for the conversations API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use axum_extra::extract::Query;

use super::db as conversations_db;
use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::api::utils::{json_body, required};

type SharedState = Arc<RwLock<AppState>>;

async fn list_conversations(
    State(state): State<SharedState>,
    Query(params): Query<public::UserQuery>,
) -> Result<Json<Vec<public::Conversation>>, ApiError> {
    let user_id = required(params.user_id, "user_id")?;
    let db = state.read().expect("Unable to read share state").db.clone();
    let conversations = conversations_db::list_conversations(&db, &user_id).await?;
    Ok(Json(conversations))
}

async fn create_conversation(
    State(state): State<SharedState>,
    payload: Result<Json<public::ConversationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<public::Conversation>), ApiError> {
    let payload = json_body(payload)?;
    let user_id = required(payload.user_id, "user_id")?;
    let content = required(payload.content, "content")?;
    let db = state.read().expect("Unable to read share state").db.clone();

    let conversation = conversations_db::insert_conversation(&db, &user_id, &content).await?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

async fn view_conversation(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Query(params): Query<public::UserQuery>,
) -> Result<Json<public::Conversation>, ApiError> {
    let user_id = required(params.user_id, "user_id")?;
    let db = state.read().expect("Unable to read share state").db.clone();

    conversations_db::find_conversation(&db, id, &user_id)
        .await?
        .map(Json)
        .ok_or(ApiError::not_found("Conversation not found"))
}

async fn update_conversation(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    payload: Result<Json<public::ConversationRequest>, JsonRejection>,
) -> Result<Json<public::Conversation>, ApiError> {
    let payload = json_body(payload)?;
    let user_id = required(payload.user_id, "user_id")?;
    let content = required(payload.content, "content")?;
    let db = state.read().expect("Unable to read share state").db.clone();

    conversations_db::update_conversation(&db, id, &user_id, &content)
        .await?
        .map(Json)
        .ok_or(ApiError::not_found("Conversation not found"))
}

async fn delete_conversation(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Query(params): Query<public::UserQuery>,
) -> Result<StatusCode, ApiError> {
    let user_id = required(params.user_id, "user_id")?;
    let db = state.read().expect("Unable to read share state").db.clone();

    if conversations_db::delete_conversation(&db, id, &user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Conversation not found"))
    }
}

/// Create the conversations router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(list_conversations).post(create_conversation))
        .route(
            "/{id}",
            get(view_conversation)
                .put(update_conversation)
                .delete(delete_conversation),
        )
}
