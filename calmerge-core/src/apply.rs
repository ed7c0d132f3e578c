//! Applying a [`Delta`] to the destination calendar.

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::delta::Delta;
use crate::error::{ProviderError, SyncError, SyncResult};
use crate::event::CalendarEvent;
use crate::filter::{Blacklist, is_publishable};
use crate::rebuild::project;
use crate::remote::Remote;

/// What to do when inserting an event into the destination fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishPolicy {
    /// Stop applying immediately: no further inserts, no removals.
    #[default]
    Abort,
    /// Record the failure and carry on with the next event.
    Skip,
}

/// Outcome of applying a delta.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub added: usize,
    pub removed: usize,
    /// Events kept out by the blacklist
    pub skipped: usize,
    /// Insert failures tolerated under [`PublishPolicy::Skip`]
    pub failed_inserts: Vec<SyncError>,
    /// Delete failures, which never stop processing
    pub failed_removals: Vec<SyncError>,
}

impl ApplyReport {
    pub fn has_failures(&self) -> bool {
        !self.failed_inserts.is_empty() || !self.failed_removals.is_empty()
    }
}

/// Insert every publishable event of `delta.to_add`, then delete every
/// event of `delta.to_remove`, one provider call per event.
///
/// Nothing is transactional: under [`PublishPolicy::Abort`] a failed insert
/// returns [`SyncError::Publish`] after the earlier inserts already went
/// through, and before any removal runs.
pub async fn apply(
    remote: &Remote,
    calendar_id: &str,
    delta: &Delta,
    blacklist: &Blacklist,
    policy: PublishPolicy,
) -> SyncResult<ApplyReport> {
    let mut report = ApplyReport::default();

    for event in sorted_by_start(delta.to_add.events()) {
        if !is_publishable(event, blacklist) {
            report.skipped += 1;
            continue;
        }

        let new_event = project(event);

        match remote.insert_event(calendar_id, &new_event).await {
            Ok(_) => {
                info!(summary = %event.summary, "Published event");
                report.added += 1;
            }
            Err(source) => {
                error!(
                    summary = %event.summary,
                    start = %event.start,
                    end = %event.end,
                    calendar_id,
                    error = %source,
                    "Unable to publish event"
                );

                let err = publish_error(calendar_id, event, source);
                match policy {
                    PublishPolicy::Abort => return Err(err),
                    PublishPolicy::Skip => report.failed_inserts.push(err),
                }
            }
        }
    }

    for event in sorted_by_start(delta.to_remove.events()) {
        let result = match event.id.as_deref() {
            Some(event_id) => remote.delete_event(calendar_id, event_id).await,
            None => Err(ProviderError::InvalidEvent(
                "destination event has no id".to_string(),
            )),
        };

        match result {
            Ok(()) => {
                info!(summary = %event.summary, "Deleted event");
                report.removed += 1;
            }
            Err(source) => {
                warn!(
                    summary = %event.summary,
                    event_id = event.id.as_deref().unwrap_or_default(),
                    calendar_id,
                    error = %source,
                    "Unable to delete event"
                );
                report.failed_removals.push(SyncError::Removal {
                    calendar_id: calendar_id.to_string(),
                    event_id: event.id.clone().unwrap_or_default(),
                    summary: event.summary.clone(),
                    source,
                });
            }
        }
    }

    Ok(report)
}

fn publish_error(calendar_id: &str, event: &CalendarEvent, source: ProviderError) -> SyncError {
    SyncError::Publish {
        calendar_id: calendar_id.to_string(),
        summary: event.summary.clone(),
        start: event.start.to_string(),
        end: event.end.to_string(),
        source,
    }
}

/// Events ordered by start time, then title.
pub fn sorted_by_start<'a>(events: impl Iterator<Item = &'a CalendarEvent>) -> Vec<&'a CalendarEvent> {
    let mut events: Vec<_> = events.collect();
    events.sort_by(|a, b| {
        a.start
            .to_utc()
            .cmp(&b.start.to_utc())
            .then_with(|| a.summary.cmp(&b.summary))
    });
    events
}
