//! Sliding time window bounding which events are considered live.

use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, Months, SecondsFormat, Utc};

/// Days looked back from now, so recently-started events stay in view.
pub const LOOKBACK_DAYS: i64 = 7;

/// Forward lookahead used when none is configured.
pub const DEFAULT_LOOKAHEAD_MONTHS: u32 = 2;

/// Accepted forward lookahead, in months.
pub const LOOKAHEAD_MONTHS_RANGE: RangeInclusive<u32> = 1..=6;

/// Half-open scan range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SyncWindow {
    /// Window anchored on `now`: `now - 7 days` to `now + lookahead_months`.
    /// The lookahead is clamped into [`LOOKAHEAD_MONTHS_RANGE`].
    pub fn anchored(now: DateTime<Utc>, lookahead_months: u32) -> Self {
        let months = lookahead_months.clamp(
            *LOOKAHEAD_MONTHS_RANGE.start(),
            *LOOKAHEAD_MONTHS_RANGE.end(),
        );

        SyncWindow {
            start: now - Duration::days(LOOKBACK_DAYS),
            end: now
                .checked_add_months(Months::new(months))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// `start` as RFC3339 string, as expected by provider APIs.
    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// `end` as RFC3339 string, as expected by provider APIs.
    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
