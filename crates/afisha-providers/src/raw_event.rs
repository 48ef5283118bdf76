//! Raw event type from calendar providers.
//!
//! [`RawEvent`] is the provider record as received, before normalization.
//! Provider payloads are loosely typed, so every field is optional and the
//! normalizer has to cope with any combination of them.
//!
//! Start values are kept as the provider wrote them. The date-time text
//! carries the organizer's wall-clock time, which is what gets displayed,
//! so it is deliberately not converted to UTC here.

use serde::{Deserialize, Serialize};

/// The start of a raw event.
///
/// All-day events carry `date` (`YYYY-MM-DD`); timed events carry
/// `date_time` (RFC 3339 with offset). Either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventStart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    /// IANA timezone identifier, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl RawEventStart {
    /// Creates an all-day start.
    pub fn from_date(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Self::default()
        }
    }

    /// Creates a timed start.
    pub fn from_date_time(date_time: impl Into<String>) -> Self {
        Self {
            date_time: Some(date_time.into()),
            ..Self::default()
        }
    }

    /// Returns true if this start has a non-empty all-day date.
    pub fn is_all_day(&self) -> bool {
        self.date.as_deref().is_some_and(|d| !d.is_empty())
    }
}

/// A raw calendar event from a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Provider-assigned identifier.
    #[serde(default)]
    pub id: Option<String>,

    /// When the event starts.
    #[serde(default)]
    pub start: Option<RawEventStart>,

    /// The event title.
    #[serde(default)]
    pub summary: Option<String>,

    /// Free-text description, possibly with HTML markup.
    #[serde(default)]
    pub description: Option<String>,

    /// The event location.
    #[serde(default)]
    pub location: Option<String>,

    /// The event status (e.g., "confirmed", "tentative", "cancelled").
    #[serde(default)]
    pub status: Option<String>,
}

impl RawEvent {
    /// Creates a raw event with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Returns the summary if it is present and not blank.
    pub fn effective_summary(&self) -> Option<&str> {
        self.summary.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Returns the location if it is present and not blank.
    pub fn effective_location(&self) -> Option<&str> {
        self.location.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Returns true if the event is cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status
            .as_ref()
            .is_some_and(|s| s.eq_ignore_ascii_case("cancelled"))
    }

    /// Returns true if this is an all-day event.
    pub fn is_all_day(&self) -> bool {
        self.start.as_ref().is_some_and(RawEventStart::is_all_day)
    }

    /// Builder method to set an all-day start date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.start = Some(RawEventStart::from_date(date));
        self
    }

    /// Builder method to set a timed start.
    pub fn with_date_time(mut self, date_time: impl Into<String>) -> Self {
        self.start = Some(RawEventStart::from_date_time(date_time));
        self
    }

    /// Builder method to set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}
