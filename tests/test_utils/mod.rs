//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, RwLock};

use axum::{Router, body::Body};
use tokio_rusqlite::Connection;

use notekeeper::api::AppState;
use notekeeper::api::app;
use notekeeper::calendar::FeedFetcher;
use notekeeper::core::AppConfig;
use notekeeper::core::db::{async_db, initialize_db};

/// Creates a test application router backed by a fresh db in a
/// temporary directory.
pub async fn test_app() -> Router {
    test_app_with_config(|_| {}).await.0
}

/// Same as [`test_app`] but lets the caller adjust the config and
/// returns the db so fixtures can be inserted directly.
pub async fn test_app_with_config<F>(configure: F) -> (Router, Connection)
where
    F: FnOnce(&mut AppConfig),
{
    build_test_app(configure, None).await
}

/// A test app whose calendar syncs read from `fetcher` instead of
/// the network.
pub async fn test_app_with_fetcher(fetcher: Arc<dyn FeedFetcher>) -> (Router, Connection) {
    build_test_app(|_| {}, Some(fetcher)).await
}

async fn build_test_app<F>(
    configure: F,
    fetcher: Option<Arc<dyn FeedFetcher>>,
) -> (Router, Connection)
where
    F: FnOnce(&mut AppConfig),
{
    let dir = tempfile::Builder::new()
        .prefix("notekeeper")
        .tempdir()
        .expect("Failed to create base directory")
        .keep();
    let db_path = dir.join("db");
    let db_path_str = db_path.to_str().unwrap();

    let db = async_db(db_path_str)
        .await
        .expect("Failed to connect to async db");
    db.call(|conn| {
        initialize_db(conn).expect("Failed to migrate db");
        Ok(())
    })
    .await
    .unwrap();

    let mut app_config = AppConfig {
        storage_path: dir.display().to_string(),
        db_path: db_path_str.to_string(),
        default_note_ids: vec![],
        calendar_fetch_timeout_secs: 2,
        openai_model: String::from("gpt-4o"),
        openai_api_hostname: String::from("http://127.0.0.1:1"),
        openai_api_key: String::from("test-api-key"),
        fal_api_hostname: String::from("http://127.0.0.1:1"),
        fal_api_key: None,
    };
    configure(&mut app_config);

    let mut app_state = AppState::new(db.clone(), app_config);
    if let Some(fetcher) = fetcher {
        app_state = app_state.with_feed_fetcher(fetcher);
    }
    (app(Arc::new(RwLock::new(app_state))), db)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf-8")
}
