//! Provider-neutral event types.
//!
//! Providers convert their API responses into these types, and the
//! consolidation engine works exclusively with them.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A calendar event (provider-neutral)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Provider-assigned identifier. None for events not created yet.
    pub id: Option<String>,
    pub summary: String,
    pub description: Option<String>,
    /// Provider color tag (Google uses "1" to "11")
    pub color_id: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,

    /// Event attendees/participants
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    /// Reminder overrides
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    /// Id of the recurring series this instance was expanded from
    #[serde(default)]
    pub recurring_event_id: Option<String>,
}

impl CalendarEvent {
    /// A bare event with only the required fields set.
    pub fn new(summary: impl Into<String>, start: EventTime, end: EventTime) -> Self {
        CalendarEvent {
            id: None,
            summary: summary.into(),
            description: None,
            color_id: None,
            location: None,
            start,
            end,
            attendees: Vec::new(),
            reminders: Vec::new(),
            recurring_event_id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// An event attendee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub name: Option<String>,
    pub email: String,
    /// "accepted", "declined", "tentative", "needsAction"
    pub response_status: Option<String>,
}

/// A reminder/alarm for an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// Minutes before the event to trigger
    pub minutes: i64,
}

/// Start or end of an event: a precise instant or an all-day date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

impl EventTime {
    /// Stable textual form: `YYYY-MM-DD` for all-day dates, UTC RFC 3339
    /// with second precision for instants.
    pub fn to_key_string(&self) -> String {
        match self {
            EventTime::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
            EventTime::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// The instant this time-point begins at. All-day dates start at UTC midnight.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            EventTime::DateTime(dt) => *dt,
            EventTime::Date(d) => d.and_time(NaiveTime::MIN).and_utc(),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_key_string())
    }
}
