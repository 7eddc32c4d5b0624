//! Public types for the calendar API
use serde::{Deserialize, Serialize};

pub use crate::calendar::{Attendee, CalendarEvent, CalendarSubscription};

#[derive(Deserialize)]
pub struct SyncRequest {
    pub user_id: Option<String>,
    pub webcal_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResponse {
    pub status: String,
    pub events_added: usize,
}

#[derive(Deserialize)]
pub struct UserQuery {
    pub user_id: Option<String>,
}
