use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
    pub name: String,
    pub role: String,
    // PARTSTAT, e.g. "ACCEPTED" or "NEEDS-ACTION"
    pub status: String,
}

/// Normalized fields pulled out of a single VEVENT. Optional fields
/// that are missing in the feed are empty strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub event_id: String,
    pub summary: String,
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: String,
    pub organizer: String,
    pub attendees: Vec<Attendee>,
    pub notes: String,
    pub status: String,
    pub meeting_link: String,
}

/// A stored calendar event
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEvent {
    pub user_id: String,
    #[serde(flatten)]
    pub record: EventRecord,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarSubscription {
    pub user_id: String,
    pub webcal_url: String,
    pub last_sync: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
