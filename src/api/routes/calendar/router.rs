//! Router for the calendar API

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use axum_extra::extract::Query;
use http::StatusCode;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::api::utils::{json_body, required};
use crate::calendar::{self, SyncError};

type SharedState = Arc<RwLock<AppState>>;

/// Bad input is the caller's fault, everything else is ours
fn sync_error(err: SyncError) -> ApiError {
    let status = match err {
        SyncError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    ApiError::new(status, err.into())
}

async fn sync_handler(
    State(state): State<SharedState>,
    payload: Result<Json<public::SyncRequest>, JsonRejection>,
) -> Result<Json<public::SyncResponse>, ApiError> {
    let payload = json_body(payload)?;
    let (db, fetcher) = {
        let shared_state = state.read().expect("Unable to read share state");
        (
            shared_state.db.clone(),
            Arc::clone(&shared_state.feed_fetcher),
        )
    };
    let user_id = payload.user_id.unwrap_or_default();
    let webcal_url = payload.webcal_url.unwrap_or_default();

    let events_added = calendar::sync_calendar(&db, fetcher.as_ref(), &user_id, &webcal_url)
        .await
        .map_err(sync_error)?;

    Ok(Json(public::SyncResponse {
        status: "success".to_string(),
        events_added,
    }))
}

async fn events_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::UserQuery>,
) -> Result<Json<Vec<public::CalendarEvent>>, ApiError> {
    let user_id = required(params.user_id, "user_id")?;
    let db = state.read().expect("Unable to read share state").db.clone();
    let events = calendar::db::list_events(&db, &user_id).await?;
    Ok(Json(events))
}

async fn subscription_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::UserQuery>,
) -> Result<Json<public::CalendarSubscription>, ApiError> {
    let user_id = required(params.user_id, "user_id")?;
    let db = state.read().expect("Unable to read share state").db.clone();

    calendar::db::find_subscription(&db, &user_id)
        .await?
        .map(Json)
        .ok_or(ApiError::not_found("Subscription not found"))
}

/// Create the calendar router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sync", post(sync_handler))
        .route("/events", get(events_handler))
        .route("/subscription", get(subscription_handler))
}
