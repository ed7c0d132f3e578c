//! Blacklist screening of events before they are published.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::event::CalendarEvent;

/// Substrings that keep an event out of the destination when found in its title.
/// Matching is case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blacklist(Vec<String>);

impl Blacklist {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Blacklist(words.into_iter().map(Into::into).collect())
    }

    /// The first blacklisted word contained in the event title, if any.
    pub fn matching_word(&self, event: &CalendarEvent) -> Option<&str> {
        self.0
            .iter()
            .map(String::as_str)
            .find(|word| event.summary.contains(word))
    }

    pub fn is_publishable(&self, event: &CalendarEvent) -> bool {
        match self.matching_word(event) {
            Some(word) => {
                info!(summary = %event.summary, word, "Skipping blacklisted event");
                false
            }
            None => true,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.0
    }
}

pub fn is_publishable(event: &CalendarEvent, blacklist: &Blacklist) -> bool {
    blacklist.is_publishable(event)
}
