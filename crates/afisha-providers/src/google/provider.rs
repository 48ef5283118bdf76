//! Google Calendar provider implementation.
//!
//! This module implements the [`CalendarProvider`] trait for a public Google
//! calendar read with an API key.

use chrono::{Datelike, Utc};
use tracing::{debug, info};

use afisha_core::TimeWindow;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, CalendarProvider, FetchOptions, FetchResult};

use super::client::GoogleCalendarClient;
use super::config::GoogleConfig;

/// Google Calendar provider.
#[derive(Debug)]
pub struct GoogleProvider {
    config: GoogleConfig,
    client: GoogleCalendarClient,
}

impl GoogleProvider {
    /// Provider name used in errors and logs.
    pub const NAME: &'static str = "google";

    /// Creates a new Google provider with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key or calendar id is missing.
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        config
            .validate()
            .map_err(|e| ProviderError::configuration(e).with_provider(Self::NAME))?;
        let client = GoogleCalendarClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// Returns the configured calendar id.
    pub fn calendar_id(&self) -> &str {
        &self.config.calendar_id
    }

    async fn fetch_impl(&self, options: &FetchOptions) -> ProviderResult<FetchResult> {
        let window = match options.time_window {
            Some(window) => window,
            None => current_year_window()?,
        };

        debug!(
            calendar = %self.config.calendar_id,
            time_min = %window.start_rfc3339(),
            time_max = %window.end_rfc3339(),
            "fetching events"
        );

        let (events, skipped) = self
            .client
            .list_events(
                &window,
                options.expand_recurring,
                options.order_by_start,
                options.max_results,
            )
            .await
            .map_err(|e| e.with_provider(Self::NAME))?;

        info!(events = events.len(), skipped, "fetched events from google");
        Ok(FetchResult::with_events(events).with_skipped(skipped))
    }
}

fn current_year_window() -> ProviderResult<TimeWindow> {
    let year = Utc::now().year();
    TimeWindow::for_year(year)
        .ok_or_else(|| ProviderError::internal(format!("year {year} is out of range")))
}

impl CalendarProvider for GoogleProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fetch_events(&self, options: FetchOptions) -> BoxFuture<'_, ProviderResult<FetchResult>> {
        Box::pin(async move { self.fetch_impl(&options).await })
    }
}
