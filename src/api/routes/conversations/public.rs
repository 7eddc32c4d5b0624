//! Public types for the conversations API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct UserQuery {
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ConversationRequest {
    pub user_id: Option<String>,
    // Free form transcript, usually serialized by the client
    pub content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Conversation {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
