//! Google Calendar API client.
//!
//! Low-level HTTP client for `events.list`: request building, pagination,
//! error mapping and response parsing.

use afisha_core::TimeWindow;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::raw_event::{RawEvent, RawEventStart};

use super::config::GoogleConfig;

/// Upper bound on followed pages, guarding against a looping page token.
const MAX_PAGES: usize = 100;

/// Google Calendar API client.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    api_key: String,
    events_url: String,
    page_size: usize,
}

impl GoogleCalendarClient {
    /// Creates a new client for the calendar in `config`.
    pub fn new(config: &GoogleConfig) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            events_url: config.events_url(),
            page_size: config.page_size,
        })
    }

    /// Lists the events of `window`, following every page.
    ///
    /// `page_size` overrides the configured page size when set. Returns the
    /// events and the number of records dropped because they were cancelled
    /// or had no id.
    pub async fn list_events(
        &self,
        window: &TimeWindow,
        single_events: bool,
        order_by_start: bool,
        page_size: Option<usize>,
    ) -> ProviderResult<(Vec<RawEvent>, usize)> {
        let page_size = page_size
            .map(|size| size.clamp(1, GoogleConfig::MAX_PAGE_SIZE))
            .unwrap_or(self.page_size);
        let mut all_events = Vec::new();
        let mut skipped = 0;
        let mut page_token: Option<String> = None;

        for page in 1..=MAX_PAGES {
            let query = list_query(
                &self.api_key,
                window,
                single_events,
                order_by_start,
                page_size,
                page_token.as_deref(),
            );
            let result = self.list_events_page(&query).await?;
            debug!(page, items = result.items.len(), "fetched events page");

            for event in result.items {
                match convert_event(event) {
                    Some(raw_event) => all_events.push(raw_event),
                    None => skipped += 1,
                }
            }

            match result.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => {
                    debug!(events = all_events.len(), skipped, "fetched calendar");
                    return Ok((all_events, skipped));
                }
            }
        }

        warn!(pages = MAX_PAGES, "page limit reached, result is truncated");
        Ok((all_events, skipped))
    }

    /// Fetches a single page of events.
    async fn list_events_page(&self, query: &[(&str, String)]) -> ProviderResult<EventListResponse> {
        let response = self
            .http_client
            .get(&self.events_url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::network("request timeout")
                } else if e.is_connect() {
                    ProviderError::network(format!("connection failed: {}", e))
                } else {
                    ProviderError::network(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();

        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read response: {}", e))
        })?;

        if !status.is_success() {
            return Err(error_for_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
        })
    }
}

/// Builds the `events.list` query parameters.
fn list_query(
    api_key: &str,
    window: &TimeWindow,
    single_events: bool,
    order_by_start: bool,
    page_size: usize,
    page_token: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("key", api_key.to_string()),
        ("timeMin", window.start_rfc3339()),
        ("timeMax", window.end_rfc3339()),
        ("singleEvents", single_events.to_string()),
        ("maxResults", page_size.to_string()),
    ];
    // The API rejects orderBy=startTime unless recurring events are expanded.
    if order_by_start && single_events {
        query.push(("orderBy", "startTime".to_string()));
    }
    if let Some(token) = page_token {
        query.push(("pageToken", token.to_string()));
    }
    query
}

/// Maps a non-success response to a provider error.
///
/// The message comes from the API error body when there is one.
fn error_for_status(status: reqwest::StatusCode, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .map(|r| r.error.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });
    let message = format!("{} ({})", message, status.as_u16());

    match status.as_u16() {
        400 => ProviderError::bad_request(message),
        401 => ProviderError::authentication(message),
        403 => ProviderError::authorization(message),
        404 => ProviderError::not_found(message),
        429 => ProviderError::rate_limited(message),
        500..=599 => ProviderError::server(message),
        _ => ProviderError::invalid_response(message),
    }
}

/// Converts a Google Calendar API event to a RawEvent.
///
/// Cancelled events and events without an id are dropped.
fn convert_event(event: ApiEvent) -> Option<RawEvent> {
    if event.status.as_deref() == Some("cancelled") {
        return None;
    }

    let Some(id) = event.id.filter(|id| !id.is_empty()) else {
        warn!(summary = ?event.summary, "dropping event without id");
        return None;
    };

    let start = event.start.map(|s| RawEventStart {
        date: s.date,
        date_time: s.date_time,
        time_zone: s.time_zone,
    });
    if start.is_none() {
        debug!(%id, "event has no start");
    }

    Some(RawEvent {
        id: Some(id),
        start,
        summary: event.summary,
        description: event.description,
        location: event.location,
        status: event.status,
    })
}

/// Response from the events.list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
    next_page_token: Option<String>,
}

/// A single event from the Google Calendar API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEvent {
    id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    location: Option<String>,
    start: Option<ApiEventTime>,
    status: Option<String>,
}

/// Event time from the API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventTime {
    date: Option<String>,
    date_time: Option<String>,
    time_zone: Option<String>,
}

/// Error envelope returned with non-success statuses.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureCategory, ProviderErrorCode};

    #[test]
    fn parse_event_list_response() {
        let json = r#"{
            "kind": "calendar#events",
            "nextPageToken": "page-2",
            "items": [
                {
                    "id": "event1",
                    "summary": "Лекция",
                    "start": { "dateTime": "2025-03-15T19:00:00+03:00", "timeZone": "Europe/Moscow" },
                    "end": { "dateTime": "2025-03-15T21:00:00+03:00" },
                    "status": "confirmed"
                },
                {
                    "id": "event2",
                    "start": { "date": "2025-03-16" }
                }
            ]
        }"#;

        let response: EventListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.next_page_token.as_deref(), Some("page-2"));
        assert_eq!(response.items[0].summary.as_deref(), Some("Лекция"));
    }

    #[test]
    fn parse_empty_response() {
        let response: EventListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.items.is_empty());
        assert!(response.next_page_token.is_none());
    }

    #[test]
    fn convert_keeps_start_text() {
        let event: ApiEvent = serde_json::from_str(
            r#"{"id": "e1", "start": {"dateTime": "2025-03-15T19:00:00+03:00"}, "location": "Клуб"}"#,
        )
        .unwrap();
        let raw = convert_event(event).unwrap();
        assert_eq!(raw.id.as_deref(), Some("e1"));
        assert_eq!(
            raw.start.unwrap().date_time.as_deref(),
            Some("2025-03-15T19:00:00+03:00")
        );
        assert_eq!(raw.location.as_deref(), Some("Клуб"));
    }

    #[test]
    fn convert_drops_cancelled_and_anonymous() {
        let cancelled: ApiEvent =
            serde_json::from_str(r#"{"id": "e1", "status": "cancelled"}"#).unwrap();
        assert!(convert_event(cancelled).is_none());

        let anonymous: ApiEvent = serde_json::from_str(r#"{"summary": "?"}"#).unwrap();
        assert!(convert_event(anonymous).is_none());

        let empty_id: ApiEvent = serde_json::from_str(r#"{"id": ""}"#).unwrap();
        assert!(convert_event(empty_id).is_none());
    }

    #[test]
    fn convert_without_start() {
        let event: ApiEvent = serde_json::from_str(r#"{"id": "e1"}"#).unwrap();
        let raw = convert_event(event).unwrap();
        assert!(raw.start.is_none());
    }

    #[test]
    fn query_parameters() {
        let window = TimeWindow::for_year(2025).unwrap();
        let query = list_query("KEY", &window, true, true, 2500, None);
        assert_eq!(
            query,
            vec![
                ("key", "KEY".to_string()),
                ("timeMin", "2025-01-01T00:00:00+00:00".to_string()),
                ("timeMax", "2025-12-31T23:59:59+00:00".to_string()),
                ("singleEvents", "true".to_string()),
                ("maxResults", "2500".to_string()),
                ("orderBy", "startTime".to_string()),
            ]
        );

        let query = list_query("KEY", &window, false, true, 10, Some("tok"));
        assert!(!query.iter().any(|(k, _)| *k == "orderBy"));
        assert_eq!(query.last(), Some(&("pageToken", "tok".to_string())));
    }

    #[test]
    fn error_message_from_body() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "errors": []}}"#;
        let err = error_for_status(reqwest::StatusCode::BAD_REQUEST, body);
        assert_eq!(err.code(), ProviderErrorCode::BadRequest);
        assert_eq!(
            err.message(),
            "API key not valid. Please pass a valid API key. (400)"
        );
        assert_eq!(err.category(), FailureCategory::Upstream);
    }

    #[test]
    fn error_message_without_body() {
        let err = error_for_status(reqwest::StatusCode::NOT_FOUND, "<html>");
        assert_eq!(err.code(), ProviderErrorCode::NotFound);
        assert_eq!(err.message(), "Not Found (404)");

        let err = error_for_status(reqwest::StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.code(), ProviderErrorCode::ServerError);
        assert!(err.is_retryable());

        let err = error_for_status(reqwest::StatusCode::FORBIDDEN, "{}");
        assert_eq!(err.code(), ProviderErrorCode::AuthorizationFailed);

        let err = error_for_status(reqwest::StatusCode::TOO_MANY_REQUESTS, "");
        assert_eq!(err.code(), ProviderErrorCode::RateLimited);
    }
}
