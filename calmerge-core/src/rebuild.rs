//! Projection of a source event onto the fields copied to the destination.

use crate::event::CalendarEvent;

/// Copy only title, description, color, location, start and end.
///
/// The provider id is dropped so the destination assigns its own, along with
/// attendees, reminders and recurrence metadata.
pub fn project(source: &CalendarEvent) -> CalendarEvent {
    CalendarEvent {
        id: None,
        summary: source.summary.clone(),
        description: source.description.clone(),
        color_id: source.color_id.clone(),
        location: source.location.clone(),
        start: source.start.clone(),
        end: source.end.clone(),
        attendees: Vec::new(),
        reminders: Vec::new(),
        recurring_event_id: None,
    }
}
