//! Year-scoped event repository.
//!
//! The repository owns the events of the year being viewed. Month and day
//! navigation inside that year is served from memory; only a change of year
//! triggers a new fetch. Loads are tagged with the year they were started
//! for and are dropped if the viewed year moved on while they were in flight.

use std::sync::Arc;

use afisha_core::Event;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{FetchFailure, ProviderResult};
use crate::normalize::normalize_events;
use crate::provider::{CalendarProvider, FetchOptions};

/// Mutable state behind the repository lock.
#[derive(Debug, Clone, Default)]
struct RepositoryState {
    year: i32,
    events: Vec<Event>,
    loading: bool,
    failure: Option<FetchFailure>,
}

/// Shared repository state.
type SharedRepositoryState = Arc<RwLock<RepositoryState>>;

/// Point-in-time copy of the repository state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySnapshot {
    pub year: i32,
    pub events: Vec<Event>,
    pub loading: bool,
    pub failure: Option<FetchFailure>,
}

/// What happened to a completed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The events were stored.
    Loaded { count: usize },
    /// The fetch failed; events were cleared and the failure stored.
    Failed(FetchFailure),
    /// The viewed year changed while fetching; nothing was applied.
    Discarded,
}

impl LoadOutcome {
    /// Returns true if the load replaced the event set.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Holds the events of the viewed year, fetched through a provider.
#[derive(Clone)]
pub struct EventRepository {
    provider: Arc<dyn CalendarProvider>,
    state: SharedRepositoryState,
}

impl std::fmt::Debug for EventRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRepository")
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

impl EventRepository {
    /// Creates a repository viewing `year`, with nothing loaded yet.
    pub fn new(provider: Arc<dyn CalendarProvider>, year: i32) -> Self {
        Self {
            provider,
            state: Arc::new(RwLock::new(RepositoryState {
                year,
                ..RepositoryState::default()
            })),
        }
    }

    /// Fetches and normalizes every event of `year`.
    ///
    /// Does not touch the repository state.
    pub async fn fetch_year(&self, year: i32) -> ProviderResult<Vec<Event>> {
        let options = FetchOptions::for_year(year)?;
        let result = self.provider.fetch_events(options).await?;
        if result.skipped > 0 {
            debug!(year, skipped = result.skipped, "provider dropped records");
        }
        Ok(normalize_events(&result.events))
    }

    /// Returns the viewed year.
    pub async fn year(&self) -> i32 {
        self.state.read().await.year
    }

    /// Sets the viewed year.
    ///
    /// Returns true if the year changed, in which case the caller should
    /// [`load`](Self::load) it. Events of the previous year are dropped.
    pub async fn view_year(&self, year: i32) -> bool {
        let mut state = self.state.write().await;
        if state.year == year {
            return false;
        }
        debug!(from = state.year, to = year, "viewed year changed");
        state.year = year;
        state.events.clear();
        state.failure = None;
        state.loading = false;
        true
    }

    /// Fetches `year` and stores the result if `year` is still viewed.
    pub async fn load(&self, year: i32) -> LoadOutcome {
        {
            let mut state = self.state.write().await;
            if state.year == year {
                state.loading = true;
            }
        }

        let result = self.fetch_year(year).await;

        let mut state = self.state.write().await;
        if state.year != year {
            debug!(year, viewed = state.year, "discarding stale load");
            return LoadOutcome::Discarded;
        }
        state.loading = false;

        match result {
            Ok(events) => {
                info!(year, events = events.len(), "loaded events");
                let count = events.len();
                state.events = events;
                state.failure = None;
                LoadOutcome::Loaded { count }
            }
            Err(e) => {
                warn!(year, error = %e, "failed to load events");
                let failure = FetchFailure::from(&e);
                state.events.clear();
                state.failure = Some(failure.clone());
                LoadOutcome::Failed(failure)
            }
        }
    }

    /// Clears the stored events and failure, then loads the viewed year again.
    pub async fn reload(&self) -> LoadOutcome {
        let year = {
            let mut state = self.state.write().await;
            state.events.clear();
            state.failure = None;
            state.year
        };
        self.load(year).await
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> RepositorySnapshot {
        let state = self.state.read().await;
        RepositorySnapshot {
            year: state.year,
            events: state.events.clone(),
            loading: state.loading,
            failure: state.failure.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use tokio::sync::Notify;

    use super::*;
    use crate::error::{FailureCategory, ProviderError};
    use crate::provider::{BoxFuture, ErrorProvider, FetchResult};
    use crate::raw_event::RawEvent;

    /// Serves canned events per year and records requested windows.
    #[derive(Default)]
    struct FixtureProvider {
        years: HashMap<String, Vec<RawEvent>>,
        requests: Mutex<Vec<String>>,
        fail_with_network: bool,
    }

    impl FixtureProvider {
        fn with_year(mut self, year: i32, events: Vec<RawEvent>) -> Self {
            self.years.insert(format!("{year}-01-01"), events);
            self
        }
    }

    impl CalendarProvider for FixtureProvider {
        fn name(&self) -> &str {
            "fixture"
        }

        fn fetch_events(
            &self,
            options: FetchOptions,
        ) -> BoxFuture<'_, ProviderResult<FetchResult>> {
            let start = options
                .time_window
                .map(|w| w.start_rfc3339())
                .unwrap_or_default();
            self.requests.lock().unwrap().push(start.clone());
            let fail = self.fail_with_network;
            let events = self.years.get(&start[..10.min(start.len())]).cloned();
            Box::pin(async move {
                if fail {
                    return Err(ProviderError::network("connection refused"));
                }
                Ok(FetchResult::with_events(events.unwrap_or_default()))
            })
        }
    }

    /// Signals `started` when a fetch begins, then blocks until the gate opens.
    struct GatedProvider {
        started: Arc<Notify>,
        gate: Arc<Notify>,
    }

    impl CalendarProvider for GatedProvider {
        fn name(&self) -> &str {
            "gated"
        }

        fn fetch_events(
            &self,
            _options: FetchOptions,
        ) -> BoxFuture<'_, ProviderResult<FetchResult>> {
            let started = self.started.clone();
            let gate = self.gate.clone();
            Box::pin(async move {
                started.notify_one();
                gate.notified().await;
                Ok(FetchResult::with_events(vec![
                    RawEvent::new("late").with_date("2025-05-01"),
                ]))
            })
        }
    }

    fn events_2025() -> Vec<RawEvent> {
        vec![
            RawEvent::new("a")
                .with_date("2025-03-15")
                .with_summary("Концерт"),
            RawEvent::new("b")
                .with_date_time("2025-03-20T19:00:00+03:00")
                .with_description("3. НАИМЕНОВАНИЕ: Лекция"),
        ]
    }

    #[tokio::test]
    async fn fetch_year_normalizes_and_requests_year_window() {
        let provider = Arc::new(FixtureProvider::default().with_year(2025, events_2025()));
        let repo = EventRepository::new(provider.clone(), 2025);

        let events = repo.fetch_year(2025).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "КОНЦЕРТ");
        assert_eq!(events[1].name, "ЛЕКЦИЯ");
        assert_eq!(events[1].start_time.as_deref(), Some("19:00"));
        assert_eq!(
            *provider.requests.lock().unwrap(),
            vec!["2025-01-01T00:00:00+00:00".to_string()]
        );

        // fetch_year leaves state alone
        assert!(repo.snapshot().await.events.is_empty());
    }

    #[tokio::test]
    async fn load_stores_events() {
        let provider = Arc::new(FixtureProvider::default().with_year(2025, events_2025()));
        let repo = EventRepository::new(provider, 2025);

        let outcome = repo.load(2025).await;
        assert_eq!(outcome, LoadOutcome::Loaded { count: 2 });
        assert!(outcome.is_loaded());

        let snapshot = repo.snapshot().await;
        assert_eq!(snapshot.year, 2025);
        assert_eq!(snapshot.events.len(), 2);
        assert!(!snapshot.loading);
        assert!(snapshot.failure.is_none());
    }

    #[tokio::test]
    async fn view_year_reports_change() {
        let provider = Arc::new(FixtureProvider::default().with_year(2025, events_2025()));
        let repo = EventRepository::new(provider.clone(), 2025);
        repo.load(2025).await;

        assert!(!repo.view_year(2025).await);
        assert_eq!(repo.snapshot().await.events.len(), 2);

        assert!(repo.view_year(2026).await);
        assert_eq!(repo.year().await, 2026);
        assert!(repo.snapshot().await.events.is_empty());

        assert_eq!(repo.load(2026).await, LoadOutcome::Loaded { count: 0 });
        assert_eq!(provider.requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failure_clears_events() {
        let provider = Arc::new(FixtureProvider {
            fail_with_network: true,
            ..FixtureProvider::default()
        });
        let repo = EventRepository::new(provider, 2025);
        {
            let mut state = repo.state.write().await;
            state.events = normalize_events(&events_2025());
        }

        let LoadOutcome::Failed(failure) = repo.load(2025).await else {
            panic!("expected failure");
        };
        assert_eq!(failure.category, FailureCategory::Transport);
        assert_eq!(failure.label, "Ошибка сети");
        assert_eq!(failure.detail, "connection refused");
        assert!(failure.retryable);

        let snapshot = repo.snapshot().await;
        assert!(snapshot.events.is_empty());
        assert_eq!(snapshot.failure, Some(failure));
    }

    #[tokio::test]
    async fn missing_configuration_surfaces_as_failure() {
        let provider = Arc::new(ErrorProvider::new(
            "google",
            ProviderError::configuration("API key is not set"),
        ));
        let repo = EventRepository::new(provider, 2025);

        let LoadOutcome::Failed(failure) = repo.load(2025).await else {
            panic!("expected failure");
        };
        assert_eq!(failure.category, FailureCategory::Configuration);
        assert_eq!(failure.to_string(), "Конфигурация не найдена: API key is not set");
        assert!(!failure.retryable);
    }

    #[tokio::test]
    async fn reload_refetches_and_clears_failure() {
        let provider = Arc::new(FixtureProvider::default().with_year(2025, events_2025()));
        let repo = EventRepository::new(provider.clone(), 2025);
        {
            let mut state = repo.state.write().await;
            state.failure = Some(FetchFailure::from(&ProviderError::network("timeout")));
        }

        assert_eq!(repo.reload().await, LoadOutcome::Loaded { count: 2 });
        assert!(repo.snapshot().await.failure.is_none());
        assert_eq!(provider.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn stale_load_is_discarded() {
        let started = Arc::new(Notify::new());
        let gate = Arc::new(Notify::new());
        let repo = EventRepository::new(
            Arc::new(GatedProvider {
                started: started.clone(),
                gate: gate.clone(),
            }),
            2025,
        );

        let pending = tokio::spawn({
            let repo = repo.clone();
            async move { repo.load(2025).await }
        });

        // the fetch for 2025 is in flight before the year changes
        started.notified().await;
        assert!(repo.snapshot().await.loading);

        assert!(repo.view_year(2026).await);
        gate.notify_one();

        assert_eq!(pending.await.unwrap(), LoadOutcome::Discarded);
        let snapshot = repo.snapshot().await;
        assert_eq!(snapshot.year, 2026);
        assert!(snapshot.events.is_empty());
        assert!(snapshot.failure.is_none());
        assert!(!snapshot.loading);
    }
}
