//! Google Calendar provider implementation.
//!
//! Reads a public calendar through the Calendar API v3 `events.list`
//! endpoint, authenticated with an API key.
//!
//! # Features
//!
//! - Pagination with `pageToken`
//! - Server-side recurring event expansion, ordered by start time
//! - API error bodies surfaced as provider error messages
//!
//! # Example
//!
//! ```ignore
//! use afisha_providers::google::{GoogleConfig, GoogleProvider};
//! use afisha_providers::{CalendarProvider, FetchOptions};
//!
//! let provider = GoogleProvider::new(GoogleConfig::new(api_key, calendar_id))?;
//! let result = provider.fetch_events(FetchOptions::for_year(2025)?).await?;
//! ```

mod client;
mod config;
mod provider;

pub use client::GoogleCalendarClient;
pub use config::GoogleConfig;
pub use provider::GoogleProvider;
