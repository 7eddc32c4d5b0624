//! Webcal subscription syncing.
//!
//! A sync fetches the subscribed feed, decodes its VEVENTs, keeps
//! those that started within the last week and upserts them keyed by
//! `(user_id, event_id)`.

pub mod db;
mod error;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod parse;
pub mod sync;
pub mod window;

pub use error::{SyncError, SyncResult};
pub use fetch::{FeedFetcher, HttpFeedFetcher};
pub use models::{Attendee, CalendarEvent, CalendarSubscription, EventRecord};
pub use sync::{sync_calendar, sync_calendar_at, validate_sync_request};
