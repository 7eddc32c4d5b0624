use axum::Json;
use axum::extract::rejection::JsonRejection;

use super::public::ApiError;

/// Unwrap a JSON body, answering malformed or non-JSON bodies with a
/// 400 in the same `{"error": ..}` shape as every other error
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
    }
}

/// Reject missing or blank request fields with a 400
pub fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::bad_request(format!("{} is required", name))),
    }
}
