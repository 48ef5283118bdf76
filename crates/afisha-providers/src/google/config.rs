//! Google Calendar provider configuration.

use std::time::Duration;

/// Configuration for the Google Calendar provider.
///
/// The calendar is read with a plain API key, so it must be shared publicly.
#[derive(Clone)]
pub struct GoogleConfig {
    /// API key from the Google Cloud Console.
    pub api_key: String,

    /// The public calendar to read (usually an address ending in
    /// `@group.calendar.google.com`).
    pub calendar_id: String,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,

    /// Base URL of the Calendar API, overridable for tests.
    pub api_base: String,

    /// Page size requested from `events.list`.
    pub page_size: usize,
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Base URL for Google Calendar API v3.
    pub const DEFAULT_API_BASE: &'static str = "https://www.googleapis.com/calendar/v3";

    /// Largest page `events.list` will return.
    pub const MAX_PAGE_SIZE: usize = 2500;

    /// Creates a new Google configuration.
    pub fn new(api_key: impl Into<String>, calendar_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            calendar_id: calendar_id.into(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("afisha/{}", env!("CARGO_PKG_VERSION")),
            api_base: Self::DEFAULT_API_BASE.to_string(),
            page_size: Self::MAX_PAGE_SIZE,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the API base URL.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns the `events.list` URL for the configured calendar.
    pub fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(&self.calendar_id)
        )
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("API key is not set".to_string());
        }
        if self.calendar_id.trim().is_empty() {
            return Err("calendar id is not set".to_string());
        }
        if self.api_key.chars().any(char::is_whitespace) {
            return Err("API key must not contain whitespace".to_string());
        }
        if self.timeout.is_zero() {
            return Err("timeout must be greater than zero".to_string());
        }
        if self.page_size == 0 || self.page_size > Self::MAX_PAGE_SIZE {
            return Err(format!(
                "page size must be between 1 and {}",
                Self::MAX_PAGE_SIZE
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("api_key", &"[redacted]")
            .field("calendar_id", &self.calendar_id)
            .field("timeout", &self.timeout)
            .field("api_base", &self.api_base)
            .field("page_size", &self.page_size)
            .finish()
    }
}
