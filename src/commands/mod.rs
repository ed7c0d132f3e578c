pub mod auth;
pub mod status;
pub mod sync;

use std::sync::Arc;

use anyhow::Result;
use calmerge_core::Remote;
use calmerge_provider_google::GoogleCalendar;

use crate::config::CalmergeConfig;

/// Connect to the configured Google account.
pub fn connect(cfg: &CalmergeConfig) -> Result<Remote> {
    let provider = GoogleCalendar::new(cfg.google_account()?)?;

    Ok(Remote::new(Arc::new(provider)).with_timeout(cfg.request_timeout()))
}
