//! Fetching a calendar's events into an [`EventMapping`].

use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};
use crate::identity::{EventKey, EventMapping};
use crate::remote::Remote;
use crate::window::SyncWindow;

#[derive(Debug, Clone, Copy, Default)]
pub struct CollectOptions {
    /// Delete duplicate events upstream, on the calendar they were found in.
    pub cleanup: bool,
}

/// An event dropped from a mapping because its key was already taken.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateEvent {
    pub key: EventKey,
    pub calendar_id: String,
    pub event_id: Option<String>,
    /// Whether the upstream cleanup delete went through.
    pub purged: bool,
}

/// Result of collecting one or more calendars.
#[derive(Debug, Default)]
pub struct Collected {
    pub mapping: EventMapping,
    pub duplicates: Vec<DuplicateEvent>,
}

/// Collect every event of `calendar_id` within `window`.
pub async fn collect(
    remote: &Remote,
    calendar_id: &str,
    window: &SyncWindow,
    options: CollectOptions,
) -> SyncResult<Collected> {
    collect_all(remote, &[calendar_id], window, options).await
}

/// Collect several calendars, in order, into a single mapping.
///
/// The first event seen for a key wins, across calendars as well as within
/// one. Any listing failure aborts the whole collection.
pub async fn collect_all<S: AsRef<str>>(
    remote: &Remote,
    calendar_ids: &[S],
    window: &SyncWindow,
    options: CollectOptions,
) -> SyncResult<Collected> {
    let mut collected = Collected::default();

    for calendar_id in calendar_ids {
        let calendar_id = calendar_id.as_ref();

        let events = remote
            .list_events(calendar_id, window)
            .await
            .map_err(|source| SyncError::Fetch {
                calendar_id: calendar_id.to_string(),
                source,
            })?;

        debug!(calendar_id, count = events.len(), "Listed events");

        for event in events {
            let key = EventKey::of(&event);

            let Err(duplicate) = collected.mapping.insert_first(key.clone(), event) else {
                continue;
            };

            warn!(calendar_id, key = %key, "Duplicate event found");

            let purged = if options.cleanup {
                purge_duplicate(remote, calendar_id, duplicate.id.as_deref()).await
            } else {
                false
            };

            collected.duplicates.push(DuplicateEvent {
                key,
                calendar_id: calendar_id.to_string(),
                event_id: duplicate.id,
                purged,
            });
        }
    }

    Ok(collected)
}

/// Best-effort delete of a duplicate; failures are only logged.
async fn purge_duplicate(remote: &Remote, calendar_id: &str, event_id: Option<&str>) -> bool {
    let Some(event_id) = event_id else {
        warn!(calendar_id, "Duplicate event has no id, cannot clean it up");
        return false;
    };

    match remote.delete_event(calendar_id, event_id).await {
        Ok(()) => {
            info!(calendar_id, event_id, "Deleted duplicate event");
            true
        }
        Err(e) => {
            warn!(calendar_id, event_id, error = %e, "Unable to delete duplicate event");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::event::{CalendarEvent, EventTime};
    use crate::provider::memory::MemoryProvider;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap()
    }

    fn event(summary: &str, id: &str, offset_hours: i64) -> CalendarEvent {
        let start = now() + Duration::hours(offset_hours);
        CalendarEvent::new(
            summary,
            EventTime::DateTime(start),
            EventTime::DateTime(start + Duration::hours(1)),
        )
        .with_id(id)
    }

    fn window() -> SyncWindow {
        SyncWindow::anchored(now(), 2)
    }

    #[tokio::test]
    async fn test_collect_keys_every_event() {
        let provider = MemoryProvider::new().with_calendar(
            "work",
            vec![event("Standup", "a", 1), event("Retro", "b", 2)],
        );
        let remote = Remote::new(Arc::new(provider));

        let collected = collect(&remote, "work", &window(), CollectOptions::default())
            .await
            .unwrap();

        assert_eq!(collected.mapping.len(), 2);
        assert!(collected.duplicates.is_empty());
        let key = EventKey::of(&event("Standup", "ignored", 1));
        assert_eq!(collected.mapping.get(&key).unwrap().id.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_duplicate_is_reported_and_first_occurrence_kept() {
        let provider = Arc::new(MemoryProvider::new().with_calendar(
            "work",
            vec![event("Standup", "first", 1), event("Standup", "second", 1)],
        ));
        let remote = Remote::new(provider.clone());

        let collected = collect(&remote, "work", &window(), CollectOptions::default())
            .await
            .unwrap();

        assert_eq!(collected.mapping.len(), 1);
        assert_eq!(collected.duplicates.len(), 1);
        assert_eq!(collected.duplicates[0].event_id.as_deref(), Some("second"));
        assert!(!collected.duplicates[0].purged);
        assert_eq!(
            collected.mapping.events().next().unwrap().id.as_deref(),
            Some("first")
        );
        // No cleanup requested: nothing deleted upstream
        assert!(provider.deletes().is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_deletes_duplicate_upstream() {
        let provider = Arc::new(MemoryProvider::new().with_calendar(
            "work",
            vec![event("Standup", "first", 1), event("Standup", "second", 1)],
        ));
        let remote = Remote::new(provider.clone());

        let collected = collect(&remote, "work", &window(), CollectOptions { cleanup: true })
            .await
            .unwrap();

        assert!(collected.duplicates[0].purged);
        assert_eq!(
            provider.deletes(),
            vec![("work".to_string(), "second".to_string())]
        );
    }

    #[tokio::test]
    async fn test_failed_cleanup_is_not_fatal() {
        let provider = MemoryProvider::new()
            .with_calendar(
                "work",
                vec![event("Standup", "first", 1), event("Standup", "second", 1)],
            )
            .failing_delete("second");
        let remote = Remote::new(Arc::new(provider));

        let collected = collect(&remote, "work", &window(), CollectOptions { cleanup: true })
            .await
            .unwrap();

        assert_eq!(collected.mapping.len(), 1);
        assert!(!collected.duplicates[0].purged);
    }

    #[tokio::test]
    async fn test_collect_all_dedupes_across_calendars() {
        let provider = MemoryProvider::new()
            .with_calendar("a", vec![event("Standup", "a1", 1)])
            .with_calendar("b", vec![event("Standup", "b1", 1), event("Lunch", "b2", 3)]);
        let remote = Remote::new(Arc::new(provider));

        let collected = collect_all(&remote, &["a", "b"], &window(), CollectOptions::default())
            .await
            .unwrap();

        assert_eq!(collected.mapping.len(), 2);
        assert_eq!(collected.duplicates.len(), 1);
        assert_eq!(collected.duplicates[0].calendar_id, "b");
    }

    #[tokio::test]
    async fn test_listing_failure_is_fetch_error() {
        let provider = MemoryProvider::new()
            .with_calendar("a", vec![event("Standup", "a1", 1)])
            .failing_list("broken");
        let remote = Remote::new(Arc::new(provider));

        let result =
            collect_all(&remote, &["a", "broken"], &window(), CollectOptions::default()).await;

        match result {
            Err(SyncError::Fetch {
                calendar_id,
                source: ProviderError::Api(_),
            }) => assert_eq!(calendar_id, "broken"),
            other => panic!("Expected fetch error, got {:?}", other),
        }
    }
}
