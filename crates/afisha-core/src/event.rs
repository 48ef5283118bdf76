//! The canonical event record.
//!
//! [`Event`] is what the rest of the system consumes: every field is already
//! resolved to either an extracted value or its fallback, so presentation code
//! never has to deal with missing data.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// City shown when the description carries no city line.
pub const UNSPECIFIED_CITY: &str = "Не указан";

/// Venue shown when neither the description nor the provider has one.
pub const UNSPECIFIED_VENUE: &str = "Не указана";

/// Title used when neither the description nor the provider has one.
pub const UNTITLED: &str = "БЕЗ НАЗВАНИЯ";

/// Age limit assumed when the description does not state one.
pub const DEFAULT_AGE_LIMIT: &str = "0+";

/// Price assumed when the description does not state one.
pub const DEFAULT_PRICE: &str = "Бесплатно";

/// Format of [`Event::date`] and of day keys in calendar views.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of [`Event::start_time`].
pub const TIME_FORMAT: &str = "%H:%M";

/// A fully normalized event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Provider-assigned identifier, unique within one fetch.
    pub id: String,
    pub city: String,
    /// Empty when the description names only a city.
    pub district: String,
    /// Always uppercase.
    pub name: String,
    pub short_description: String,
    /// Calendar date as `YYYY-MM-DD`, or empty when the provider gave none.
    pub date: String,
    /// Wall-clock start as `HH:MM`, absent for all-day events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    pub venue: String,
    pub age_limit: String,
    pub price: String,
    /// The whole cleaned description, kept even when extraction fails.
    pub long_description: String,
    pub link: String,
    pub contacts: String,
}

impl Event {
    /// Parses [`Event::date`] into a calendar date.
    ///
    /// Returns `None` for events that cannot be placed on the calendar.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()
    }

    /// Parses [`Event::start_time`], if any.
    pub fn start_naive_time(&self) -> Option<NaiveTime> {
        self.start_time
            .as_deref()
            .and_then(|t| NaiveTime::parse_from_str(t, TIME_FORMAT).ok())
    }

    /// Returns true if the event date is exactly the given day.
    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date == day.format(DATE_FORMAT).to_string()
    }

    /// Returns `"<city>, <venue>"`, used as the exported location.
    pub fn location_line(&self) -> String {
        format!("{}, {}", self.city, self.venue)
    }

    /// Returns true if the event has a website link.
    pub fn has_link(&self) -> bool {
        !self.link.trim().is_empty()
    }
}
