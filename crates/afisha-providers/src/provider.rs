//! CalendarProvider trait definition.
//!
//! Providers are responsible for:
//! - Fetching the raw events of a time window, following pagination
//! - Mapping transport and service failures to [`ProviderError`]
//!
//! They do not normalize; that happens in [`crate::normalize`].

use std::future::Future;
use std::pin::Pin;

use afisha_core::TimeWindow;

use crate::error::{ProviderError, ProviderResult};
use crate::raw_event::RawEvent;

/// Result from fetching events.
#[derive(Debug, Default)]
pub struct FetchResult {
    /// The fetched events, in provider order.
    pub events: Vec<RawEvent>,
    /// Records dropped by the provider (cancelled or without an id).
    pub skipped: usize,
}

impl FetchResult {
    /// Creates a new fetch result with events.
    pub fn with_events(events: Vec<RawEvent>) -> Self {
        Self { events, skipped: 0 }
    }

    /// Builder method to record dropped records.
    pub fn with_skipped(mut self, skipped: usize) -> Self {
        self.skipped = skipped;
        self
    }
}

/// Options for fetching events.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Time window to fetch events for.
    pub time_window: Option<TimeWindow>,
    /// Page size hint for providers that paginate.
    pub max_results: Option<usize>,
    /// Whether to expand recurring events into instances.
    pub expand_recurring: bool,
    /// Whether to order events by start time.
    pub order_by_start: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            time_window: None,
            max_results: None,
            expand_recurring: true,
            order_by_start: true,
        }
    }
}

impl FetchOptions {
    /// Creates new fetch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options covering the whole of `year`.
    pub fn for_year(year: i32) -> ProviderResult<Self> {
        let window = TimeWindow::for_year(year)
            .ok_or_else(|| ProviderError::bad_request(format!("year {year} is out of range")))?;
        Ok(Self::new().with_time_window(window))
    }

    /// Builder method to set time window.
    pub fn with_time_window(mut self, window: TimeWindow) -> Self {
        self.time_window = Some(window);
        self
    }
}

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe so the repository can hold a
/// `dyn CalendarProvider`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The core abstraction for calendar providers.
///
/// # Example Implementation
///
/// ```ignore
/// struct FixtureProvider {
///     events: Vec<RawEvent>,
/// }
///
/// impl CalendarProvider for FixtureProvider {
///     fn name(&self) -> &str { "fixture" }
///
///     fn fetch_events(&self, _options: FetchOptions) -> BoxFuture<'_, ProviderResult<FetchResult>> {
///         let events = self.events.clone();
///         Box::pin(async move { Ok(FetchResult::with_events(events)) })
///     }
/// }
/// ```
pub trait CalendarProvider: Send + Sync {
    /// Returns the name/type of this provider (e.g., "google").
    fn name(&self) -> &str;

    /// Fetches the raw events of the window in `options`.
    ///
    /// Pagination is handled internally; the result holds every page.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on configuration, network or service failures.
    fn fetch_events(&self, options: FetchOptions) -> BoxFuture<'_, ProviderResult<FetchResult>>;

    /// Returns false if the provider cannot possibly succeed as configured.
    fn is_configured(&self) -> bool {
        true
    }
}

/// A provider that always returns an error.
///
/// Stands in for a provider that could not be built, typically because the
/// API key or calendar id is missing, so the failure surfaces through the
/// normal fetch path.
#[derive(Debug)]
pub struct ErrorProvider {
    name: String,
    error: ProviderError,
}

impl ErrorProvider {
    /// Creates a new error provider.
    pub fn new(name: impl Into<String>, error: ProviderError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }
}

impl CalendarProvider for ErrorProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_events(&self, _options: FetchOptions) -> BoxFuture<'_, ProviderResult<FetchResult>> {
        // ProviderError is not Clone because of its boxed source.
        let error =
            ProviderError::new(self.error.code(), self.error.message()).with_provider(&self.name);
        Box::pin(async move { Err(error) })
    }

    fn is_configured(&self) -> bool {
        false
    }
}
