//! API routes module

pub mod analysis;
pub mod calendar;
pub mod conversations;
pub mod notes;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Notes routes
        .nest("/notes", notes::router())
        // Conversation routes
        .nest("/conversations", conversations::router())
        // Calendar routes
        .nest("/calendar", calendar::router())
        // PDF analysis and OCR live at the top level
        .merge(analysis::router())
}
