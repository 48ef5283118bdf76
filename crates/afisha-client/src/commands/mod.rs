//! Command implementations.

pub mod browse;
pub mod config;
pub mod draft;
pub mod events;
pub mod export;

use std::sync::Arc;

use afisha_core::format::{NO_EVENTS, list_heading};
use afisha_core::{CalendarView, Event, OutputFormat, OutputFormatter};
use afisha_providers::{CalendarProvider, EventRepository, FetchFailure, LoadOutcome};
use chrono::NaiveDate;
use serde::Serialize;

use crate::access::Identity;
use crate::config::AppConfig;
use crate::error::{ClientError, ClientResult};

/// Everything a command needs: resolved settings, the provider and the date.
pub struct Context {
    pub config: AppConfig,
    pub identity: Identity,
    pub format: OutputFormat,
    pub formatter: OutputFormatter,
    pub today: NaiveDate,
    provider: Arc<dyn CalendarProvider>,
}

impl Context {
    pub fn new(config: AppConfig, identity: Identity, format: OutputFormat) -> Self {
        let provider = config.provider();
        let formatter = OutputFormatter::new(config.format_options());
        Self {
            config,
            identity,
            format,
            formatter,
            today: chrono::Local::now().date_naive(),
            provider,
        }
    }

    /// Replaces the calendar provider.
    pub fn with_provider(mut self, provider: Arc<dyn CalendarProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// Pins the current date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Creates a repository viewing `year`.
    pub fn repository(&self, year: i32) -> EventRepository {
        EventRepository::new(self.provider.clone(), year)
    }

    /// Loads the events of `year`, failing with the user-facing error.
    pub async fn load(&self, year: i32) -> ClientResult<Vec<Event>> {
        let repo = self.repository(year);
        match repo.load(year).await {
            LoadOutcome::Failed(failure) => Err(ClientError::Fetch(failure)),
            LoadOutcome::Loaded { .. } | LoadOutcome::Discarded => Ok(repo.snapshot().await.events),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.config.admins.allows(&self.identity)
    }
}

/// Renders the event list under the calendar.
///
/// Events on the selected day are expanded, as is the event with id
/// `expanded`.
pub fn render_events(
    formatter: &OutputFormatter,
    view: &CalendarView,
    events: &[Event],
    expanded: Option<&str>,
) -> String {
    let visible = view.visible_events(events);
    let mut out = list_heading(view.cursor(), view.selected());
    out.push('\n');
    if visible.is_empty() {
        out.push_str(NO_EVENTS);
        return out;
    }

    out.push_str(&formatter.event_list(&visible));
    for event in visible
        .iter()
        .filter(|e| view.expands(e) || expanded == Some(e.id.as_str()))
    {
        out.push_str("\n\n");
        out.push_str(formatter.event_detail(event).trim_end());
    }
    out
}

/// Renders the month grid followed by the event list.
pub fn render_calendar(
    formatter: &OutputFormatter,
    view: &CalendarView,
    events: &[Event],
    today: NaiveDate,
    expanded: Option<&str>,
) -> String {
    format!(
        "{}\n\n{}",
        formatter.month_grid(&view.grid(events, today)),
        render_events(formatter, view, events, expanded)
    )
}

/// Renders the panel shown in place of the event list after a failed load.
pub fn render_failure(failure: &FetchFailure) -> String {
    format!(
        "{}\n{}\n\n[r] повторить  [R] перезагрузить",
        failure.label, failure.detail
    )
}

/// Finds an event by id.
pub fn find_event<'a>(events: &'a [Event], id: &str) -> ClientResult<&'a Event> {
    events
        .iter()
        .find(|e| e.id == id)
        .ok_or_else(|| ClientError::EventNotFound(id.to_string()))
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> ClientResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
