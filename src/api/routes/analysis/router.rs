//! Router for PDF analysis and OCR

use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Multipart, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use axum_extra::extract::Query;

use super::db as analysis_db;
use super::public;
use crate::analysis::{extract_pdf_text, summarize_cv};
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::api::utils::{json_body, required};
use crate::ocr::FalClient;

type SharedState = Arc<RwLock<AppState>>;

async fn analyze_pdf_handler(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<public::CvAnalysis>), ApiError> {
    let mut user_id: Option<String> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {}", e)))?
    {
        match field.name() {
            Some("user_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid user_id field: {}", e)))?;
                user_id = Some(value);
            }
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid file field: {}", e)))?;
                file_bytes = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let user_id = required(user_id, "user_id")?;
    let file_bytes = file_bytes
        .filter(|b| !b.is_empty())
        .ok_or(ApiError::bad_request("file is required"))?;

    let (db, api_hostname, api_key, model) = {
        let shared_state = state.read().expect("Unable to read share state");
        let config = &shared_state.config;
        (
            shared_state.db.clone(),
            config.openai_api_hostname.clone(),
            config.openai_api_key.clone(),
            config.openai_model.clone(),
        )
    };

    let text = tokio::task::spawn_blocking(move || extract_pdf_text(&file_bytes)).await??;
    let summary = summarize_cv(&text, &api_hostname, &api_key, &model).await?;
    let analysis = analysis_db::insert_cv_analysis(&db, &user_id, &summary, &text).await?;
    tracing::info!("Stored CV analysis {} for {}", analysis.id, user_id);

    Ok((StatusCode::CREATED, Json(analysis)))
}

async fn cv_analysis_handler(
    State(state): State<SharedState>,
    Query(params): Query<public::UserQuery>,
) -> Result<Json<public::CvAnalysis>, ApiError> {
    let user_id = required(params.user_id, "user_id")?;
    let db = state.read().expect("Unable to read share state").db.clone();

    analysis_db::latest_cv_analysis(&db, &user_id)
        .await?
        .map(Json)
        .ok_or(ApiError::not_found("No CV analysis found"))
}

async fn ocr_handler(
    State(state): State<SharedState>,
    payload: Result<Json<public::OcrRequest>, JsonRejection>,
) -> Result<Json<public::OcrResult>, ApiError> {
    let payload = json_body(payload)?;
    let image_url = required(payload.image_url, "image_url")?;
    let (api_hostname, api_key) = {
        let shared_state = state.read().expect("Unable to read share state");
        (
            shared_state.config.fal_api_hostname.clone(),
            shared_state.config.fal_api_key.clone(),
        )
    };

    let client = FalClient::new(&api_hostname, api_key.as_deref())?;
    let result = client.extract_text_from_image(&image_url).await?;
    Ok(Json(result))
}

/// Create the analysis router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/analyze-pdf", post(analyze_pdf_handler))
        .route("/cv-analysis", get(cv_analysis_handler))
        .route("/ocr", post(ocr_handler))
}
