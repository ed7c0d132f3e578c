//! Conversion between Google Calendar API events and [`CalendarEvent`].

use anyhow::{Result, bail};
use calmerge_core::event::{Attendee, CalendarEvent, EventTime, Reminder};
use google_calendar::types::EventDateTime;

pub trait FromGoogle {
    fn from_google(event: google_calendar::types::Event) -> Result<Self>
    where
        Self: Sized;
}

pub trait ToGoogle {
    fn to_google(&self) -> google_calendar::types::Event;
}

fn none_if_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn google_to_event_time(time: Option<&EventDateTime>) -> Option<EventTime> {
    let time = time?;
    if let Some(dt) = time.date_time {
        Some(EventTime::DateTime(dt))
    } else {
        time.date.map(EventTime::Date)
    }
}

fn event_time_to_google(time: &EventTime) -> EventDateTime {
    match time {
        EventTime::Date(d) => EventDateTime {
            date: Some(*d),
            date_time: None,
            time_zone: String::new(),
        },
        EventTime::DateTime(dt) => EventDateTime {
            date: None,
            date_time: Some(*dt),
            time_zone: String::new(),
        },
    }
}

impl FromGoogle for CalendarEvent {
    fn from_google(event: google_calendar::types::Event) -> Result<Self> {
        let Some(start) = google_to_event_time(event.start.as_ref()) else {
            bail!("Event '{}' has no start time", event.summary);
        };

        let Some(end) = google_to_event_time(event.end.as_ref()) else {
            bail!("Event '{}' has no end time", event.summary);
        };

        let reminders = event
            .reminders
            .as_ref()
            .map(|rem| {
                rem.overrides
                    .iter()
                    .map(|r| Reminder { minutes: r.minutes })
                    .collect()
            })
            .unwrap_or_default();

        let attendees = event
            .attendees
            .iter()
            .map(|a| Attendee {
                name: none_if_empty(a.display_name.clone()),
                email: a.email.clone(),
                response_status: none_if_empty(a.response_status.clone()),
            })
            .collect();

        Ok(CalendarEvent {
            id: none_if_empty(event.id),
            summary: event.summary,
            description: none_if_empty(event.description),
            color_id: none_if_empty(event.color_id),
            location: none_if_empty(event.location),
            start,
            end,
            attendees,
            reminders,
            recurring_event_id: none_if_empty(event.recurring_event_id),
        })
    }
}

impl ToGoogle for CalendarEvent {
    /// Only the fields the destination is allowed to carry are sent.
    fn to_google(&self) -> google_calendar::types::Event {
        google_calendar::types::Event {
            id: self.id.clone().unwrap_or_default(),
            summary: self.summary.clone(),
            description: self.description.clone().unwrap_or_default(),
            color_id: self.color_id.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
            start: Some(event_time_to_google(&self.start)),
            end: Some(event_time_to_google(&self.end)),
            ..Default::default()
        }
    }
}

/// Whether a listed Google event should be ignored altogether.
pub fn is_cancelled(event: &google_calendar::types::Event) -> bool {
    event.status == "cancelled"
}
