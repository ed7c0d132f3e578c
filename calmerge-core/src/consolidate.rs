//! One full consolidation cycle: collect, diff, apply.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::apply::{ApplyReport, apply};
use crate::collector::{Collected, collect, collect_all};
use crate::delta::{Delta, diff};
use crate::error::SyncResult;
use crate::remote::Remote;
use crate::settings::SyncSettings;
use crate::window::SyncWindow;

/// The state observed at the start of a cycle and the changes it calls for.
#[derive(Debug)]
pub struct Consolidation {
    pub window: SyncWindow,
    pub sources: Collected,
    pub destination: Collected,
    pub delta: Delta,
}

/// Counts for a finished cycle.
#[derive(Debug)]
pub struct CycleReport {
    pub source_events: usize,
    pub destination_events: usize,
    pub duplicates: usize,
    pub apply: ApplyReport,
}

impl Consolidation {
    /// Collect every source calendar, then the destination, and diff them.
    ///
    /// Fails without side effects (duplicate cleanup aside) if any calendar
    /// cannot be listed.
    pub async fn prepare(
        remote: &Remote,
        settings: &SyncSettings,
        now: DateTime<Utc>,
    ) -> SyncResult<Self> {
        settings.validate()?;

        let window = SyncWindow::anchored(now, settings.lookahead_months);
        let options = settings.collect_options();

        let sources = collect_all(remote, &settings.source_calendar_ids, &window, options).await?;
        let destination =
            collect(remote, &settings.destination_calendar_id, &window, options).await?;

        info!(count = sources.mapping.len(), "Processed input events");
        info!(count = destination.mapping.len(), "Processed output events");

        let delta = diff(
            &sources.mapping,
            &destination.mapping,
            settings.delta_options(),
        );

        info!(count = delta.to_add.len(), "Found events to add");
        info!(count = delta.to_remove.len(), "Found events to remove");

        Ok(Consolidation {
            window,
            sources,
            destination,
            delta,
        })
    }

    /// Push the delta to the destination calendar.
    pub async fn apply(self, remote: &Remote, settings: &SyncSettings) -> SyncResult<CycleReport> {
        let report = apply(
            remote,
            &settings.destination_calendar_id,
            &self.delta,
            &settings.blacklist,
            settings.publish_policy,
        )
        .await?;

        if !report.failed_inserts.is_empty() {
            warn!(
                count = report.failed_inserts.len(),
                "Some events could not be published this cycle"
            );
        }

        if !report.failed_removals.is_empty() {
            warn!(
                count = report.failed_removals.len(),
                "Some stale events could not be deleted this cycle"
            );
        }

        Ok(CycleReport {
            source_events: self.sources.mapping.len(),
            destination_events: self.destination.mapping.len(),
            duplicates: self.sources.duplicates.len() + self.destination.duplicates.len(),
            apply: report,
        })
    }
}

/// Run a complete cycle anchored on `now`.
pub async fn run_cycle(
    remote: &Remote,
    settings: &SyncSettings,
    now: DateTime<Utc>,
) -> SyncResult<CycleReport> {
    let report = Consolidation::prepare(remote, settings, now)
        .await?
        .apply(remote, settings)
        .await?;

    info!(
        added = report.apply.added,
        removed = report.apply.removed,
        skipped = report.apply.skipped,
        "Consolidation completed"
    );

    Ok(report)
}
