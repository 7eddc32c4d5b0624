//! ICS decoding using the icalendar crate's parser.
//!
//! The parser borrows from the unfolded document so events are copied
//! into owned [`EventComponent`]s before handing them on.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::parser::{Component, read_calendar, unfold};

use super::error::{SyncError, SyncResult};

/// A property as decoded by the parser. TEXT values already have their
/// escapes resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProperty {
    pub name: String,
    pub value: String,
    pub params: Vec<(String, String)>,
}

impl RawProperty {
    /// Look up a parameter by key, e.g. `CN` or `PARTSTAT`
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// A VEVENT as a flat list of properties in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventComponent {
    pub properties: Vec<RawProperty>,
}

impl EventComponent {
    pub fn find_prop(&self, name: &str) -> Option<&RawProperty> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn find_props<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RawProperty> {
        self.properties
            .iter()
            .filter(move |p| p.name.eq_ignore_ascii_case(name))
    }
}

/// Decode an iCalendar document and return every VEVENT in document
/// order.
pub fn parse_calendar(bytes: &[u8]) -> SyncResult<Vec<EventComponent>> {
    let content = std::str::from_utf8(bytes)
        .map_err(|e| SyncError::Parse(format!("calendar is not valid UTF-8: {}", e)))?;
    let content = content.trim_start_matches('\u{feff}');

    let begins_with_calendar = content
        .trim_start()
        .get(..15)
        .is_some_and(|s| s.eq_ignore_ascii_case("BEGIN:VCALENDAR"));
    if !begins_with_calendar {
        return Err(SyncError::Parse(
            "document does not start with BEGIN:VCALENDAR".to_string(),
        ));
    }

    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| SyncError::Parse(e.to_string()))?;

    let mut events = vec![];
    for component in &calendar.components {
        collect_events(component, &mut events);
    }
    Ok(events)
}

// Depth first so nested VEVENTs keep their document order
fn collect_events(component: &Component, events: &mut Vec<EventComponent>) {
    if component.name.as_ref().eq_ignore_ascii_case("VEVENT") {
        let properties = component
            .properties
            .iter()
            .map(|p| RawProperty {
                name: p.name.to_string(),
                value: p.val.to_string(),
                params: p
                    .params
                    .iter()
                    .map(|param| {
                        (
                            param.key.to_string(),
                            param
                                .val
                                .as_ref()
                                .map(|v| v.to_string())
                                .unwrap_or_default(),
                        )
                    })
                    .collect(),
            })
            .collect();
        events.push(EventComponent { properties });
    }
    for child in &component.components {
        collect_events(child, events);
    }
}

/// Decode a DTSTART/DTEND style property into UTC.
///
/// Handles:
/// - `VALUE=DATE`: `20240108` (midnight UTC)
/// - UTC: `20240108T100000Z`
/// - TZID parameter: `DTSTART;TZID=America/New_York:20240108T100000`
/// - Floating: `20240108T100000` (read as UTC)
pub fn parse_date_time(prop: &RawProperty) -> SyncResult<DateTime<Utc>> {
    let value = prop.value.trim();
    let invalid = || SyncError::Parse(format!("invalid {} value {:?}", prop.name, value));

    let is_date = prop
        .param("VALUE")
        .is_some_and(|v| v.eq_ignore_ascii_case("DATE"))
        || (value.len() == 8 && value.chars().all(|c| c.is_ascii_digit()));
    if is_date {
        let date = NaiveDate::parse_from_str(value, "%Y%m%d").map_err(|_| invalid())?;
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
        return Ok(midnight.and_utc());
    }

    if let Some(utc) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S").map_err(|_| invalid())?;
        return Ok(naive.and_utc());
    }

    let naive = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").map_err(|_| invalid())?;
    match prop.param("TZID") {
        Some(tzid) => {
            let tzid = tzid.trim_matches('"');
            match Tz::from_str(tzid) {
                Ok(tz) => tz
                    .from_local_datetime(&naive)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok_or_else(invalid),
                Err(_) => {
                    tracing::warn!("Unknown TZID {}, reading {} as UTC", tzid, value);
                    Ok(naive.and_utc())
                }
            }
        }
        None => Ok(naive.and_utc()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_EVENTS: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:first@example.com\r\n\
DTSTART:20250310T150000Z\r\n\
SUMMARY:First\r\n\
ATTENDEE;CN=Ada;PARTSTAT=ACCEPTED:mailto:ada@example.com\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:second@example.com\r\n\
DTSTART;VALUE=DATE:20250311\r\n\
SUMMARY:Second\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn it_parses_events_in_document_order() {
        let events = parse_calendar(TWO_EVENTS.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].find_prop("UID").unwrap().value, "first@example.com");
        assert_eq!(events[1].find_prop("uid").unwrap().value, "second@example.com");
    }

    #[test]
    fn it_keeps_property_params() {
        let events = parse_calendar(TWO_EVENTS.as_bytes()).unwrap();
        let attendee = events[0].find_prop("ATTENDEE").unwrap();
        assert_eq!(attendee.param("CN"), Some("Ada"));
        assert_eq!(attendee.param("partstat"), Some("ACCEPTED"));
        assert_eq!(attendee.param("ROLE"), None);
    }

    #[test]
    fn it_resolves_text_escapes_once() {
        let ics = concat!(
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:x\r\n",
            r"DESCRIPTION:Path C:\\new\nNext\, line",
            "\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n"
        );
        let events = parse_calendar(ics.as_bytes()).unwrap();
        assert_eq!(
            events[0].find_prop("DESCRIPTION").unwrap().value,
            "Path C:\\new\nNext, line"
        );
    }

    #[test]
    fn it_rejects_non_calendar_documents() {
        let result = parse_calendar(b"<html><body>Not found</body></html>");
        assert!(matches!(result, Err(SyncError::Parse(_))));
    }

    #[test]
    fn it_rejects_invalid_utf8() {
        let result = parse_calendar(&[0xff, 0xfe, 0x00]);
        assert!(matches!(result, Err(SyncError::Parse(_))));
    }

    #[test]
    fn it_returns_no_events_for_empty_calendar() {
        let events =
            parse_calendar(b"BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n").unwrap();
        assert!(events.is_empty());
    }

    fn prop(name: &str, value: &str, params: &[(&str, &str)]) -> RawProperty {
        RawProperty {
            name: name.to_string(),
            value: value.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn it_parses_date_time_forms() {
        let utc = parse_date_time(&prop("DTSTART", "20250310T150000Z", &[])).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap());

        let date = parse_date_time(&prop("DTSTART", "20250311", &[("VALUE", "DATE")])).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2025, 3, 11, 0, 0, 0).unwrap());

        let floating = parse_date_time(&prop("DTSTART", "20250310T150000", &[])).unwrap();
        assert_eq!(floating, Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap());

        // New York is UTC-4 after the March 9th 2025 DST change
        let zoned = parse_date_time(&prop(
            "DTSTART",
            "20250310T110000",
            &[("TZID", "America/New_York")],
        ))
        .unwrap();
        assert_eq!(zoned, Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap());
    }

    #[test]
    fn it_fails_on_malformed_dates() {
        let result = parse_date_time(&prop("DTSTART", "next tuesday", &[]));
        assert!(matches!(result, Err(SyncError::Parse(_))));
    }
}
