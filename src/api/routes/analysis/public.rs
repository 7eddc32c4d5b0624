//! Public types for the PDF and OCR analysis API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::ocr::OcrResult;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CvAnalysis {
    pub id: i64,
    pub user_id: String,
    pub summary: String,
    // Full text extracted from the uploaded document
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct UserQuery {
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
pub struct OcrRequest {
    pub image_url: Option<String>,
}
