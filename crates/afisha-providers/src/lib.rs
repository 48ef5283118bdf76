//! Calendar providers, event normalization and the year repository.
//!
//! - [`CalendarProvider`] - The trait calendar backends implement
//! - [`RawEvent`] - Event data as the backend returns it
//! - [`normalize_event`] - Turns a raw event into an [`afisha_core::Event`]
//! - [`EventRepository`] - Holds the events of the viewed year
//! - [`ProviderError`] / [`FetchFailure`] - Detailed and user-facing errors
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ Google API v3   │
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │ GoogleProvider  │  CalendarProvider
//! └────────┬────────┘
//!          ▼
//!   ┌─────────────┐
//!   │  RawEvent   │
//!   └──────┬──────┘
//!          ▼ normalize_event()
//!   ┌─────────────┐
//!   │    Event    │──▶ EventRepository (year-scoped)
//!   └─────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use afisha_providers::{EventRepository, google::{GoogleConfig, GoogleProvider}};
//!
//! let provider = GoogleProvider::new(GoogleConfig::new(api_key, calendar_id))?;
//! let repo = EventRepository::new(Arc::new(provider), 2025);
//! repo.load(2025).await;
//! let snapshot = repo.snapshot().await;
//! ```

pub mod error;
#[cfg(feature = "google")]
pub mod google;
pub mod normalize;
pub mod provider;
pub mod raw_event;
pub mod repository;

pub use error::{FailureCategory, FetchFailure, ProviderError, ProviderErrorCode, ProviderResult};
pub use normalize::{normalize_event, normalize_events};
pub use provider::{BoxFuture, CalendarProvider, ErrorProvider, FetchOptions, FetchResult};
pub use raw_event::{RawEvent, RawEventStart};
pub use repository::{EventRepository, LoadOutcome, RepositorySnapshot};
