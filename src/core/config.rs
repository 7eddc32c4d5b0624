use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_path: String,
    pub db_path: String,
    // Notes with these ids are listed for every user
    pub default_note_ids: Vec<i64>,
    pub calendar_fetch_timeout_secs: u64,
    pub openai_model: String,
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub fal_api_hostname: String,
    pub fal_api_key: Option<String>,
}

/// Parse a comma separated list of note ids, ignoring anything that
/// isn't an integer.
pub fn parse_note_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|s| s.trim().parse::<i64>().ok())
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("NOTEKEEPER_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = format!("{}/db", storage_path);
        let default_note_ids = env::var("NOTEKEEPER_DEFAULT_NOTE_IDS")
            .map(|s| parse_note_ids(&s))
            .unwrap_or_default();
        let calendar_fetch_timeout_secs = env::var("NOTEKEEPER_CALENDAR_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);
        let openai_api_hostname = env::var("NOTEKEEPER_LLM_HOST")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let openai_api_key =
            env::var("OPENAI_API_KEY").unwrap_or_else(|_| "thiswontworkforopenai".to_string());
        let openai_model =
            env::var("NOTEKEEPER_LLM_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".to_string());
        let fal_api_hostname =
            env::var("NOTEKEEPER_FAL_HOST").unwrap_or_else(|_| "https://fal.run".to_string());
        let fal_api_key = env::var("FAL_KEY").ok().filter(|k| !k.is_empty());

        Self {
            storage_path,
            db_path,
            default_note_ids,
            calendar_fetch_timeout_secs,
            openai_model,
            openai_api_hostname,
            openai_api_key,
            fal_api_hostname,
            fal_api_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_note_ids() {
        assert_eq!(parse_note_ids("1, 2,3"), vec![1, 2, 3]);
        assert_eq!(parse_note_ids("4,,abc,5"), vec![4, 5]);
        assert!(parse_note_ids("").is_empty());
    }
}
