//! Google Calendar provider for calmerge.
//!
//! The provider manages its own credentials and sessions:
//!   ~/.config/calmerge/google/app_config.toml
//!   ~/.config/calmerge/google/session/{account}.toml

pub mod app_config;
pub mod auth;
pub mod calendar;
pub mod convert;
pub mod session;

pub use calendar::GoogleCalendar;
