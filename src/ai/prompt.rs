//! Reusable prompts using Handlebars for templating. Handlebars adds
//! additional security controls since it can't do much out of the box
//! without registering your own helpers. Text pulled out of uploaded
//! documents is untrusted so it only ever goes in as a variable.

use std::fmt;

use handlebars::Handlebars;

#[derive(Debug)]
pub enum Prompt {
    CvSummary,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<Prompt> for String {
    fn from(item: Prompt) -> String {
        format!("{:?}", item)
    }
}

const CV_SUMMARY_PROMPT: &str = r"Based on the following extracted text from a document, please create a concise summary of the person's information:

Extracted Text:
{{text}}

Please include:
1. Basic personal information (if available)
2. Key professional or educational highlights
3. Any notable achievements or qualifications
4. Areas of expertise or interests

Summary:";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    // Prompts are plain text, not HTML
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(&Prompt::CvSummary.to_string(), CV_SUMMARY_PROMPT)
        .expect("Failed to register template");
    registry
}

/// Render the CV summary prompt around `text`
pub fn cv_summary_prompt(text: &str) -> Result<String, handlebars::RenderError> {
    templates().render(
        &Prompt::CvSummary.to_string(),
        &serde_json::json!({ "text": text }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_renders_cv_summary_prompt() {
        let prompt = cv_summary_prompt("Jane Doe <jane@example.com> & Co").unwrap();
        assert!(prompt.starts_with("Based on the following extracted text"));
        assert!(prompt.contains("Extracted Text:\nJane Doe <jane@example.com> & Co\n"));
        assert!(prompt.ends_with("Summary:"));
    }
}
