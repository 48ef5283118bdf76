//! Single-event iCalendar export.
//!
//! Produces one `VCALENDAR` holding one `VEVENT`. Text values are escaped by
//! `icalendar` when the calendar is written. Times are written as floating
//! local date-times; events without a start time begin at midnight. The end is
//! always two hours after the start.

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, Utc};
use icalendar::{Calendar, Component, EventLike};
use thiserror::Error;
use tracing::debug;

use crate::event::Event;

/// `PRODID` written into every exported calendar.
pub const PRODUCT_ID: &str = "-//EventCalendar TWA//RU";

/// Suffix appended to the event id to form the `UID`.
pub const UID_DOMAIN: &str = "eventcalendar";

/// Default event length.
pub const DEFAULT_DURATION_HOURS: i64 = 2;

const FILE_NAME_CHARS: usize = 20;
const ICS_DATETIME: &str = "%Y%m%dT%H%M%S";
const ICS_UTC_DATETIME: &str = "%Y%m%dT%H%M%SZ";

/// Errors from ICS generation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IcsError {
    /// The event has no date that can be placed on a calendar.
    #[error("event {id} has no usable date")]
    MissingDate { id: String },
}

/// Generates the ICS document for `event`, stamped with the current time.
pub fn generate_ics(event: &Event) -> Result<String, IcsError> {
    generate_ics_at(event, Utc::now())
}

/// Generates the ICS document for `event` with an explicit `DTSTAMP`.
pub fn generate_ics_at(event: &Event, stamp: DateTime<Utc>) -> Result<String, IcsError> {
    let start = event_start(event)?;
    let end = start + Duration::hours(DEFAULT_DURATION_HOURS);

    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&format!("{}@{}", event.id, UID_DOMAIN));
    ics_event.add_property("DTSTAMP", stamp.format(ICS_UTC_DATETIME).to_string());
    ics_event.add_property("DTSTART", start.format(ICS_DATETIME).to_string());
    ics_event.add_property("DTEND", end.format(ICS_DATETIME).to_string());
    ics_event.summary(&event.name);
    ics_event.description(&export_description(event));
    ics_event.location(&event.location_line());

    cal.push(ics_event.done());
    let cal = cal.done();

    debug!(id = %event.id, start = %start, "generated ics");
    Ok(normalize_output(&cal.to_string()))
}

/// Returns the suggested download file name: the first 20 characters of the
/// event name followed by `.ics`.
pub fn ics_file_name(event: &Event) -> String {
    let stem: String = event
        .name
        .chars()
        .take(FILE_NAME_CHARS)
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    format!("{stem}.ics")
}

/// Text placed in `DESCRIPTION`: short description, long description, price.
pub fn export_description(event: &Event) -> String {
    format!(
        "{}\n\n{}\n\nЦена: {}",
        event.short_description, event.long_description, event.price
    )
}

fn event_start(event: &Event) -> Result<NaiveDateTime, IcsError> {
    let date = event.calendar_date().ok_or_else(|| IcsError::MissingDate {
        id: event.id.clone(),
    })?;
    let time = event.start_naive_time().unwrap_or(NaiveTime::MIN);
    Ok(date.and_time(time))
}

/// Replaces the library `PRODID` and drops the default `CALSCALE` line.
fn normalize_output(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODUCT_ID);
            result.push_str("\r\n");
            continue;
        }
        if line == "CALSCALE:GREGORIAN" {
            continue;
        }
        result.push_str(line);
        result.push_str("\r\n");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Event {
        Event {
            id: "abc123".to_string(),
            city: "Москва".to_string(),
            district: "Центр".to_string(),
            name: "ФЕСТИВАЛЬ СВЕТА".to_string(),
            short_description: "Световые инсталляции".to_string(),
            date: "2025-03-15".to_string(),
            start_time: Some("19:30".to_string()),
            venue: "Парк Горького".to_string(),
            age_limit: "0+".to_string(),
            price: "500 руб.".to_string(),
            long_description: "Полное описание".to_string(),
            link: String::new(),
            contacts: String::new(),
        }
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn unfold(ics: &str) -> String {
        ics.replace("\r\n ", "")
    }

    fn property<'a>(ics: &'a str, name: &str) -> Option<&'a str> {
        let prefix = format!("{name}:");
        ics.split("\r\n")
            .find_map(|line| line.strip_prefix(prefix.as_str()))
    }

    #[test]
    fn dtstart_date_matches_event_date() {
        let ics = unfold(&generate_ics_at(&sample(), stamp()).unwrap());
        let dtstart = property(&ics, "DTSTART").unwrap();
        assert_eq!(&dtstart[..8], sample().date.replace('-', ""));
        assert_eq!(dtstart, "20250315T193000");
    }

    #[test]
    fn end_is_two_hours_later() {
        let ics = unfold(&generate_ics_at(&sample(), stamp()).unwrap());
        assert_eq!(property(&ics, "DTEND"), Some("20250315T213000"));
    }

    #[test]
    fn end_rolls_into_next_day() {
        let event = Event {
            start_time: Some("23:00".to_string()),
            date: "2025-12-31".to_string(),
            ..sample()
        };
        let ics = unfold(&generate_ics_at(&event, stamp()).unwrap());
        assert_eq!(property(&ics, "DTSTART"), Some("20251231T230000"));
        assert_eq!(property(&ics, "DTEND"), Some("20260101T010000"));
    }

    #[test]
    fn all_day_starts_at_midnight() {
        let event = Event {
            start_time: None,
            ..sample()
        };
        let ics = unfold(&generate_ics_at(&event, stamp()).unwrap());
        assert_eq!(property(&ics, "DTSTART"), Some("20250315T000000"));
        assert_eq!(property(&ics, "DTEND"), Some("20250315T020000"));
    }

    #[test]
    fn envelope_and_identity() {
        let ics = generate_ics_at(&sample(), stamp()).unwrap();
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert!(!ics.replace("\r\n", "").contains('\n'));

        let ics = unfold(&ics);
        assert_eq!(property(&ics, "PRODID"), Some(PRODUCT_ID));
        assert_eq!(property(&ics, "UID"), Some("abc123@eventcalendar"));
        assert_eq!(property(&ics, "DTSTAMP"), Some("20250301T120000Z"));
        assert_eq!(property(&ics, "SUMMARY"), Some("ФЕСТИВАЛЬ СВЕТА"));
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
    }

    #[test]
    fn description_and_location() {
        let ics = unfold(&generate_ics_at(&sample(), stamp()).unwrap());
        let description = property(&ics, "DESCRIPTION").unwrap();
        assert_eq!(
            description,
            "Световые инсталляции\\n\\nПолное описание\\n\\nЦена: 500 руб."
        );
        assert_eq!(property(&ics, "LOCATION"), Some("Москва\\, Парк Горького"));
    }

    #[test]
    fn missing_date_is_an_error() {
        let event = Event {
            date: String::new(),
            ..sample()
        };
        assert_eq!(
            generate_ics_at(&event, stamp()),
            Err(IcsError::MissingDate {
                id: "abc123".to_string()
            })
        );
    }

    #[test]
    fn text_values_are_escaped_once() {
        let event = Event {
            name: "A, B; C".to_string(),
            short_description: "кратко".to_string(),
            long_description: "строка1\nстрока2".to_string(),
            price: "100".to_string(),
            venue: "Клуб".to_string(),
            ..sample()
        };
        let ics = unfold(&generate_ics_at(&event, stamp()).unwrap());

        assert_eq!(property(&ics, "SUMMARY"), Some("A\\, B\\; C"));
        assert_eq!(
            property(&ics, "DESCRIPTION"),
            Some("кратко\\n\\nстрока1\\nстрока2\\n\\nЦена: 100")
        );
        assert_eq!(property(&ics, "LOCATION"), Some("Москва\\, Клуб"));
    }

    #[test]
    fn file_name_takes_twenty_chars() {
        let event = Event {
            name: "ОЧЕНЬ ДЛИННОЕ НАЗВАНИЕ МЕРОПРИЯТИЯ".to_string(),
            ..sample()
        };
        assert_eq!(ics_file_name(&event), "ОЧЕНЬ ДЛИННОЕ НАЗВАН.ics");
        assert_eq!(ics_file_name(&sample()), "ФЕСТИВАЛЬ СВЕТА.ics");

        let slashed = Event {
            name: "A/B".to_string(),
            ..sample()
        };
        assert_eq!(ics_file_name(&slashed), "A_B.ics");
    }
}
