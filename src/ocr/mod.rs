//! OCR through FAL's hosted `got-ocr` model.

use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::ai::prompt::cv_summary_prompt;

const OCR_MODEL: &str = "fal-ai/got-ocr/v2";

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct OcrResult {
    pub raw_text: String,
    // Ready to send to the LLM for a summary of the person
    pub summary_prompt: String,
}

pub struct FalClient {
    api_hostname: String,
    api_key: String,
}

impl FalClient {
    /// Fails when no API key is configured
    pub fn new(api_hostname: &str, api_key: Option<&str>) -> Result<Self, Error> {
        let api_key = api_key.ok_or(anyhow!("FAL_KEY not found in environment variables"))?;
        Ok(Self {
            api_hostname: api_hostname.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub async fn extract_text_from_image(&self, image_url: &str) -> Result<OcrResult, Error> {
        let url = format!("{}/{}", self.api_hostname, OCR_MODEL);
        let payload = json!({
            "input_image_urls": [image_url],
            "multi_page": true,
        });

        tracing::debug!("Requesting OCR for {}", image_url);
        let resp: Value = reqwest::Client::new()
            .post(url)
            .header("Authorization", format!("Key {}", self.api_key))
            .timeout(Duration::from_secs(60 * 5))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let raw_text = ocr_text(&resp);
        let summary_prompt = cv_summary_prompt(&raw_text)?;
        Ok(OcrResult {
            raw_text,
            summary_prompt,
        })
    }
}

// The model returns one entry per page in `outputs`, older versions
// return a single `text` field
fn ocr_text(resp: &Value) -> String {
    if let Some(text) = resp["text"].as_str() {
        return text.to_string();
    }
    resp["outputs"]
        .as_array()
        .map(|pages| {
            pages
                .iter()
                .filter_map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}
