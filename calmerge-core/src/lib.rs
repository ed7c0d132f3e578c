//! Consolidation engine for calmerge.
//!
//! Mirrors the events of several source calendars into one destination
//! calendar within a sliding window:
//! - `identity` keys events by title, start and end
//! - `collector` lists a calendar into an `EventMapping`
//! - `delta` diffs source and destination mappings
//! - `filter`, `rebuild` and `apply` publish the result
//! - `consolidate` ties one cycle together
//!
//! Calendar services plug in through the `CalendarProvider` trait.

pub mod apply;
pub mod collector;
pub mod consolidate;
pub mod delta;
pub mod error;
pub mod event;
pub mod filter;
pub mod identity;
pub mod provider;
pub mod rebuild;
pub mod remote;
pub mod settings;
pub mod window;

pub use apply::{ApplyReport, PublishPolicy};
pub use consolidate::{Consolidation, CycleReport, run_cycle};
pub use error::{ProviderError, ProviderResult, SyncError, SyncResult};
pub use event::{Attendee, CalendarEvent, EventTime, Reminder};
pub use filter::Blacklist;
pub use identity::{EventKey, EventMapping};
pub use provider::CalendarProvider;
pub use remote::Remote;
pub use settings::SyncSettings;
pub use window::SyncWindow;
