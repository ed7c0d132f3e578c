//! The seam between the consolidation engine and a calendar service.

use async_trait::async_trait;

use crate::error::ProviderResult;
use crate::event::CalendarEvent;
use crate::window::SyncWindow;

/// Operations the engine needs from an upstream calendar service.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Short name used in logs (e.g. "google").
    fn name(&self) -> &str;

    /// List the events of `calendar_id` overlapping `window`.
    ///
    /// Recurring series must be expanded into their single instances, so
    /// that every returned event has its own concrete start and end.
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &SyncWindow,
    ) -> ProviderResult<Vec<CalendarEvent>>;

    /// Create `event` in `calendar_id` and return it as stored upstream.
    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &CalendarEvent,
    ) -> ProviderResult<CalendarEvent>;

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ProviderResult<()>;
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory provider used by the engine tests.

    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::CalendarProvider;
    use crate::error::{ProviderError, ProviderResult};
    use crate::event::CalendarEvent;
    use crate::window::SyncWindow;

    #[derive(Default)]
    struct State {
        calendars: HashMap<String, Vec<CalendarEvent>>,
        next_id: u64,
        inserts: Vec<(String, CalendarEvent)>,
        deletes: Vec<(String, String)>,
    }

    #[derive(Default)]
    pub struct MemoryProvider {
        state: Mutex<State>,
        failing_lists: HashSet<String>,
        failing_insert_titles: HashSet<String>,
        failing_delete_ids: HashSet<String>,
        list_delay: Option<Duration>,
    }

    impl MemoryProvider {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a calendar. Events without an id get one assigned.
        pub fn with_calendar(self, calendar_id: &str, events: Vec<CalendarEvent>) -> Self {
            {
                let mut state = self.state.lock().unwrap();
                for mut event in events {
                    if event.id.is_none() {
                        state.next_id += 1;
                        event.id = Some(format!("{calendar_id}-{}", state.next_id));
                    }
                    state
                        .calendars
                        .entry(calendar_id.to_string())
                        .or_default()
                        .push(event);
                }
                state.calendars.entry(calendar_id.to_string()).or_default();
            }
            self
        }

        pub fn failing_list(mut self, calendar_id: &str) -> Self {
            self.failing_lists.insert(calendar_id.to_string());
            self
        }

        pub fn failing_insert(mut self, summary: &str) -> Self {
            self.failing_insert_titles.insert(summary.to_string());
            self
        }

        pub fn failing_delete(mut self, event_id: &str) -> Self {
            self.failing_delete_ids.insert(event_id.to_string());
            self
        }

        pub fn slow_list(mut self, delay: Duration) -> Self {
            self.list_delay = Some(delay);
            self
        }

        pub fn events(&self, calendar_id: &str) -> Vec<CalendarEvent> {
            let state = self.state.lock().unwrap();
            state.calendars.get(calendar_id).cloned().unwrap_or_default()
        }

        pub fn inserts(&self) -> Vec<(String, CalendarEvent)> {
            self.state.lock().unwrap().inserts.clone()
        }

        pub fn deletes(&self) -> Vec<(String, String)> {
            self.state.lock().unwrap().deletes.clone()
        }
    }

    #[async_trait]
    impl CalendarProvider for MemoryProvider {
        fn name(&self) -> &str {
            "memory"
        }

        async fn list_events(
            &self,
            calendar_id: &str,
            window: &SyncWindow,
        ) -> ProviderResult<Vec<CalendarEvent>> {
            if let Some(delay) = self.list_delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing_lists.contains(calendar_id) {
                return Err(ProviderError::Api(format!("404 Not Found: {calendar_id}")));
            }

            let state = self.state.lock().unwrap();
            let events = state
                .calendars
                .get(calendar_id)
                .ok_or_else(|| ProviderError::Api(format!("404 Not Found: {calendar_id}")))?;

            Ok(events
                .iter()
                .filter(|e| e.start.to_utc() < window.end && e.end.to_utc() > window.start)
                .cloned()
                .collect())
        }

        async fn insert_event(
            &self,
            calendar_id: &str,
            event: &CalendarEvent,
        ) -> ProviderResult<CalendarEvent> {
            if self.failing_insert_titles.contains(&event.summary) {
                return Err(ProviderError::Api("400 Bad Request".to_string()));
            }

            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let mut created = event.clone();
            created.id = Some(format!("{calendar_id}-{}", state.next_id));

            state
                .calendars
                .entry(calendar_id.to_string())
                .or_default()
                .push(created.clone());
            state.inserts.push((calendar_id.to_string(), event.clone()));

            Ok(created)
        }

        async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ProviderResult<()> {
            if self.failing_delete_ids.contains(event_id) {
                return Err(ProviderError::Api("500 Internal Server Error".to_string()));
            }

            let mut state = self.state.lock().unwrap();
            if let Some(events) = state.calendars.get_mut(calendar_id) {
                events.retain(|e| e.id.as_deref() != Some(event_id));
            }
            state
                .deletes
                .push((calendar_id.to_string(), event_id.to_string()));

            Ok(())
        }
    }
}
