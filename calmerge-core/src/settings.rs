//! Inputs of a synchronization cycle.

use crate::apply::PublishPolicy;
use crate::collector::CollectOptions;
use crate::delta::DeltaOptions;
use crate::error::{SyncError, SyncResult};
use crate::filter::Blacklist;
use crate::window::{DEFAULT_LOOKAHEAD_MONTHS, LOOKAHEAD_MONTHS_RANGE};

/// Everything the engine needs to know about one consolidation.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub source_calendar_ids: Vec<String>,
    pub destination_calendar_id: String,
    pub lookahead_months: u32,
    pub blacklist: Blacklist,
    /// Delete duplicate events from the calendar they were found in
    pub cleanup_duplicates: bool,
    /// Wipe every destination event in the window (maintenance pass)
    pub delete_all: bool,
    pub publish_policy: PublishPolicy,
}

impl SyncSettings {
    pub fn new(source_calendar_ids: Vec<String>, destination_calendar_id: String) -> Self {
        SyncSettings {
            source_calendar_ids,
            destination_calendar_id,
            lookahead_months: DEFAULT_LOOKAHEAD_MONTHS,
            blacklist: Blacklist::default(),
            cleanup_duplicates: false,
            delete_all: false,
            publish_policy: PublishPolicy::default(),
        }
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.source_calendar_ids.is_empty() {
            return Err(SyncError::Config("no source calendars configured".into()));
        }

        if self.destination_calendar_id.trim().is_empty() {
            return Err(SyncError::Config("no destination calendar configured".into()));
        }

        if self
            .source_calendar_ids
            .iter()
            .any(|id| *id == self.destination_calendar_id)
        {
            return Err(SyncError::Config(format!(
                "destination calendar '{}' is also listed as a source",
                self.destination_calendar_id
            )));
        }

        if !LOOKAHEAD_MONTHS_RANGE.contains(&self.lookahead_months) {
            return Err(SyncError::Config(format!(
                "lookahead_months must be between {} and {}, got {}",
                LOOKAHEAD_MONTHS_RANGE.start(),
                LOOKAHEAD_MONTHS_RANGE.end(),
                self.lookahead_months
            )));
        }

        Ok(())
    }

    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            cleanup: self.cleanup_duplicates,
        }
    }

    pub fn delta_options(&self) -> DeltaOptions {
        DeltaOptions {
            delete_all: self.delete_all,
        }
    }
}
