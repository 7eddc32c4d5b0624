use chrono::{DateTime, Duration, Utc};

/// How far back each sync looks for events
pub const SYNC_WINDOW_DAYS: i64 = 7;

/// A closed time range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SyncWindow {
    /// The week leading up to and including `now`
    pub fn trailing(now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::days(SYNC_WINDOW_DAYS),
            end: now,
        }
    }

    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start <= time && time <= self.end
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn it_includes_both_ends() {
        let now = Utc.with_ymd_and_hms(2025, 3, 17, 12, 0, 0).unwrap();
        let window = SyncWindow::trailing(now);

        assert!(window.contains(now));
        assert!(window.contains(now - Duration::days(7)));
        assert!(window.contains(now - Duration::days(3)));
    }

    #[test]
    fn it_excludes_outside_times() {
        let now = Utc.with_ymd_and_hms(2025, 3, 17, 12, 0, 0).unwrap();
        let window = SyncWindow::trailing(now);

        assert!(!window.contains(now - Duration::days(7) - Duration::seconds(1)));
        assert!(!window.contains(now + Duration::seconds(1)));
    }
}
