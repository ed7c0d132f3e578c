//! Event identity: the key used to decide that two fetched events are "the same".
//!
//! Provider ids are useless for this, since the destination copy of an event
//! gets its own id. The key is built from the title and the start/end times.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use crate::event::CalendarEvent;

const KEY_SEPARATOR: &str = " : ";

/// Deterministic identity of an event: `summary : start : end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey(String);

impl EventKey {
    pub fn of(event: &CalendarEvent) -> Self {
        EventKey(format!(
            "{}{sep}{}{sep}{}",
            event.summary,
            event.start.to_key_string(),
            event.end.to_key_string(),
            sep = KEY_SEPARATOR
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Events of one or more calendars, keyed by [`EventKey`].
///
/// Keys are unique: inserting an event whose key is already present is
/// refused and the rejected event is handed back to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventMapping(HashMap<EventKey, CalendarEvent>);

impl EventMapping {
    pub fn new() -> Self {
        EventMapping(HashMap::new())
    }

    /// Insert unless the key is taken (first-seen wins).
    /// Returns the rejected event on collision.
    pub fn insert_first(&mut self, key: EventKey, event: CalendarEvent) -> Result<(), CalendarEvent> {
        match self.0.entry(key) {
            Entry::Occupied(_) => Err(event),
            Entry::Vacant(slot) => {
                slot.insert(event);
                Ok(())
            }
        }
    }

    pub fn contains_key(&self, key: &EventKey) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &EventKey) -> Option<&CalendarEvent> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &EventKey> {
        self.0.keys()
    }

    pub fn events(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.0.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EventKey, &CalendarEvent)> {
        self.0.iter()
    }
}

impl FromIterator<(EventKey, CalendarEvent)> for EventMapping {
    fn from_iter<I: IntoIterator<Item = (EventKey, CalendarEvent)>>(iter: I) -> Self {
        let mut mapping = EventMapping::new();
        for (key, event) in iter {
            let _ = mapping.insert_first(key, event);
        }
        mapping
    }
}

impl IntoIterator for EventMapping {
    type Item = (EventKey, CalendarEvent);
    type IntoIter = std::collections::hash_map::IntoIter<EventKey, CalendarEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a EventMapping {
    type Item = (&'a EventKey, &'a CalendarEvent);
    type IntoIter = std::collections::hash_map::Iter<'a, EventKey, CalendarEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
