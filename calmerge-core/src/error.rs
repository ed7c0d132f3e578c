//! Error types for the consolidation engine.

use std::time::Duration;

use thiserror::Error;

/// Failure of a single call to a calendar provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Provider request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Provider API error: {0}")]
    Api(String),

    #[error("Provider authentication error: {0}")]
    Auth(String),

    #[error("Invalid event from provider: {0}")]
    InvalidEvent(String),
}

/// Result type alias for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors raised while running a synchronization cycle.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Listing events failed. The cycle must stop before mutating anything.
    #[error("Unable to retrieve events for calendar '{calendar_id}': {source}")]
    Fetch {
        calendar_id: String,
        #[source]
        source: ProviderError,
    },

    #[error("Unable to publish event '{summary}' ({start} - {end}) to calendar '{calendar_id}': {source}")]
    Publish {
        calendar_id: String,
        summary: String,
        start: String,
        end: String,
        #[source]
        source: ProviderError,
    },

    #[error("Unable to delete event '{summary}' (id: {event_id}) from calendar '{calendar_id}': {source}")]
    Removal {
        calendar_id: String,
        event_id: String,
        summary: String,
        #[source]
        source: ProviderError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// Whether this error must stop the whole process rather than one cycle.
    /// Settings are loaded once, so a configuration error never heals on retry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Publish { .. } | SyncError::Config(_))
    }
}

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
