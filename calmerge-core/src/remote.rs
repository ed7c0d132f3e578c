//! Provider calls with a bounded timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::error::{ProviderError, ProviderResult};
use crate::event::CalendarEvent;
use crate::provider::CalendarProvider;
use crate::window::SyncWindow;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A calendar provider whose every call is bounded by a timeout.
///
/// An elapsed timeout is reported as [`ProviderError::Timeout`] and is
/// handled by callers like any other failure of that call.
#[derive(Clone)]
pub struct Remote {
    provider: Arc<dyn CalendarProvider>,
    timeout: Duration,
}

impl Remote {
    pub fn new(provider: Arc<dyn CalendarProvider>) -> Self {
        Remote {
            provider,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn list_events(
        &self,
        calendar_id: &str,
        window: &SyncWindow,
    ) -> ProviderResult<Vec<CalendarEvent>> {
        self.bounded(self.provider.list_events(calendar_id, window))
            .await
    }

    pub async fn insert_event(
        &self,
        calendar_id: &str,
        event: &CalendarEvent,
    ) -> ProviderResult<CalendarEvent> {
        self.bounded(self.provider.insert_event(calendar_id, event))
            .await
    }

    pub async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ProviderResult<()> {
        self.bounded(self.provider.delete_event(calendar_id, event_id))
            .await
    }

    async fn bounded<T>(&self, call: impl Future<Output = ProviderResult<T>>) -> ProviderResult<T> {
        timeout(self.timeout, call)
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::memory::MemoryProvider;
    use chrono::Utc;

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let provider = MemoryProvider::new()
            .with_calendar("work", vec![])
            .slow_list(Duration::from_secs(5));
        let remote = Remote::new(Arc::new(provider)).with_timeout(Duration::from_millis(20));

        let result = remote
            .list_events("work", &SyncWindow::anchored(Utc::now(), 2))
            .await;

        assert_eq!(
            result,
            Err(ProviderError::Timeout(Duration::from_millis(20)))
        );
    }

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let remote = Remote::new(Arc::new(MemoryProvider::new().with_calendar("work", vec![])));

        let events = remote
            .list_events("work", &SyncWindow::anchored(Utc::now(), 2))
            .await
            .unwrap();

        assert!(events.is_empty());
        assert_eq!(remote.provider_name(), "memory");
    }
}
