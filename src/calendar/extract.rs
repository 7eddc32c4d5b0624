//! Turn a raw VEVENT into an [`EventRecord`].

use super::error::{SyncError, SyncResult};
use super::models::{Attendee, EventRecord};
use super::parse::{EventComponent, RawProperty, parse_date_time};

/// Hosts that mark a description line as a video call link
const MEETING_HOSTS: &[&str] = &["meet.google.com", "teams.microsoft.com", "zoom.us"];

const DEFAULT_STATUS: &str = "confirmed";

pub fn extract_event(component: &EventComponent) -> SyncResult<EventRecord> {
    let event_id = component
        .find_prop("UID")
        .map(|p| p.value.trim().to_string())
        .ok_or_else(|| SyncError::Parse("event is missing UID".to_string()))?;

    let start_time = component
        .find_prop("DTSTART")
        .ok_or_else(|| SyncError::Parse(format!("event {} is missing DTSTART", event_id)))
        .and_then(parse_date_time)?;
    let end_time = match component.find_prop("DTEND") {
        Some(prop) => parse_date_time(prop)?,
        None => start_time,
    };

    let description = text_or_empty(component, "DESCRIPTION");
    let meeting_link = find_meeting_link(&description);
    let organizer = component
        .find_prop("ORGANIZER")
        .map(|p| strip_mailto(&p.value))
        .unwrap_or_default();
    let attendees = component.find_props("ATTENDEE").map(to_attendee).collect();
    let status = component
        .find_prop("STATUS")
        .map(|p| p.value.to_lowercase())
        .unwrap_or_else(|| DEFAULT_STATUS.to_string());

    Ok(EventRecord {
        event_id,
        summary: text_or_empty(component, "SUMMARY"),
        description,
        start_time,
        end_time,
        location: text_or_empty(component, "LOCATION"),
        organizer,
        attendees,
        notes: text_or_empty(component, "X-ALT-DESC"),
        status,
        meeting_link,
    })
}

/// First line of the description that mentions a known video call
/// host, or an empty string.
pub fn find_meeting_link(description: &str) -> String {
    description
        .split('\n')
        .find(|line| {
            let line = line.to_lowercase();
            MEETING_HOSTS.iter().any(|host| line.contains(host))
        })
        .map(|line| line.trim_end_matches('\r').to_string())
        .unwrap_or_default()
}

fn text_or_empty(component: &EventComponent, name: &str) -> String {
    component
        .find_prop(name)
        .map(|p| p.value.clone())
        .unwrap_or_default()
}

fn strip_mailto(value: &str) -> String {
    value.strip_prefix("mailto:").unwrap_or(value).to_string()
}

fn to_attendee(prop: &RawProperty) -> Attendee {
    let param = |key: &str| prop.param(key).unwrap_or_default().to_string();
    Attendee {
        email: strip_mailto(&prop.value),
        name: param("CN"),
        role: param("ROLE"),
        status: param("PARTSTAT"),
    }
}
