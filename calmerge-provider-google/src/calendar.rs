//! [`CalendarProvider`] backed by the Google Calendar API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use calmerge_core::error::{ProviderError, ProviderResult};
use calmerge_core::event::CalendarEvent;
use calmerge_core::provider::CalendarProvider;
use calmerge_core::window::SyncWindow;
use google_calendar::Client;
use google_calendar::types::{OrderBy, SendUpdates};
use tokio::sync::Mutex;
use tracing::debug;

use crate::app_config::AppConfig;
use crate::convert::{FromGoogle, ToGoogle, is_cancelled};
use crate::session::Session;

/// Google calendars reachable through one authenticated account.
pub struct GoogleCalendar {
    account_email: String,
    app_config: AppConfig,
    session: Mutex<Option<Session>>,
}

impl GoogleCalendar {
    pub fn new(account_email: &str) -> Result<Self> {
        Ok(Self::with_app_config(account_email, AppConfig::load()?))
    }

    pub fn with_app_config(account_email: &str, app_config: AppConfig) -> Self {
        GoogleCalendar {
            account_email: account_email.to_string(),
            app_config,
            session: Mutex::new(None),
        }
    }

    /// A client with a valid access token. The session is loaded once and
    /// refreshed in place when it expires.
    async fn client(&self) -> Result<Client> {
        let mut guard = self.session.lock().await;

        let session = match guard.take() {
            Some(mut session) => {
                session.refresh_if_expired(&self.app_config).await?;
                session
            }
            None => Session::load_valid(&self.account_email, &self.app_config).await?,
        };

        let client = session.client(&self.app_config);
        *guard = Some(session);

        Ok(client)
    }

    async fn fetch_events(&self, calendar_id: &str, window: &SyncWindow) -> Result<Vec<CalendarEvent>> {
        let client = self.client().await?;

        let time_min = window.start_rfc3339();
        let time_max = window.end_rfc3339();

        let response = client
            .events()
            .list_all(
                calendar_id,
                "",
                0,
                OrderBy::default(),
                &[],
                "", // search query
                &[],
                false,
                false,
                true, // single_events: expand recurring series into instances
                &time_max,
                &time_min,
                "",
                "",
            )
            .await
            .with_context(|| format!("Failed to fetch events for calendar {}", calendar_id))?;

        let mut events = Vec::new();

        for google_event in response.body {
            if is_cancelled(&google_event) {
                continue;
            }

            match CalendarEvent::from_google(google_event) {
                Ok(event) => events.push(event),
                Err(e) => debug!(calendar_id, error = %e, "Skipping unusable event"),
            }
        }

        Ok(events)
    }

    async fn create_event(&self, calendar_id: &str, event: &CalendarEvent) -> Result<CalendarEvent> {
        let client = self.client().await?;

        // Let google assign the ID
        // (Otherwise we'll get "Invalid resource id value")
        let mut google_event = event.to_google();
        google_event.id = String::new();

        let response = client
            .events()
            .insert(
                calendar_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                &google_event,
            )
            .await
            .with_context(|| format!("Failed to create event: {}", event.summary))?;

        CalendarEvent::from_google(response.body)
    }

    async fn remove_event(&self, calendar_id: &str, event_id: &str) -> Result<()> {
        let client = self.client().await?;

        let result = client
            .events()
            .delete(calendar_id, event_id, false, SendUpdates::None)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                // Already deleted upstream
                if error_str.contains("410") || error_str.contains("Gone") {
                    Ok(())
                } else {
                    Err(e).with_context(|| format!("Failed to delete event: {}", event_id))
                }
            }
        }
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendar {
    fn name(&self) -> &str {
        "google"
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        window: &SyncWindow,
    ) -> ProviderResult<Vec<CalendarEvent>> {
        self.fetch_events(calendar_id, window)
            .await
            .map_err(provider_error)
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &CalendarEvent,
    ) -> ProviderResult<CalendarEvent> {
        self.create_event(calendar_id, event)
            .await
            .map_err(provider_error)
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ProviderResult<()> {
        self.remove_event(calendar_id, event_id)
            .await
            .map_err(provider_error)
    }
}

/// Flatten an error chain into a [`ProviderError`], telling auth problems apart.
fn provider_error(err: anyhow::Error) -> ProviderError {
    let message = format!("{:#}", err);

    let is_auth = ["401", "Unauthorized", "invalid_grant", "OAuth session", "refresh token"]
        .iter()
        .any(|marker| message.contains(marker));

    if is_auth {
        ProviderError::Auth(message)
    } else {
        ProviderError::Api(message)
    }
}
