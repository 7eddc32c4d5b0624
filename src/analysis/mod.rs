//! Pull text out of uploaded PDFs and summarize it.

use anyhow::{Error, Result, anyhow};

use crate::ai::prompt::cv_summary_prompt;
use crate::openai::{Message, Role, completion, completion_content};

const SUMMARY_SYSTEM_MESSAGE: &str =
    "You write short, factual summaries of CVs and resumes. Do not invent details.";

/// Extract the text layer of a PDF.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, Error> {
    // pdf_extract can panic on malformed PDFs
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));
    match result {
        Ok(Ok(text)) => {
            tracing::debug!("PDF extracted: {} chars", text.len());
            Ok(text)
        }
        Ok(Err(e)) => Err(anyhow!("Failed to extract text from PDF: {}", e)),
        Err(_) => Err(anyhow!("Failed to extract text from PDF: malformed document")),
    }
}

/// Ask the LLM for a summary of the person described in `text`
pub async fn summarize_cv(
    text: &str,
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<String, Error> {
    let prompt = cv_summary_prompt(text)?;
    let messages = vec![
        Message::new(Role::System, SUMMARY_SYSTEM_MESSAGE),
        Message::new(Role::User, &prompt),
    ];
    let resp = completion(&messages, api_hostname, api_key, model).await?;
    let summary = completion_content(&resp)?;
    Ok(summary.trim().to_string())
}
