//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn later_timestamps_order_after_earlier_ones() {
        let ts1 = Timestamp::now();
        sleep(Duration::from_millis(5));
        let ts2 = Timestamp::now();

        assert!(ts1 < ts2);
    }

    #[test]
    fn timestamp_roundtrips_through_rfc3339_json() {
        let ts: Timestamp = serde_json::from_str("\"2025-03-02T09:15:00Z\"").unwrap();
        assert_eq!(ts.as_datetime().year(), 2025);

        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("2025-03-02"));
    }
}
