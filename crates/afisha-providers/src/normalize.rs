//! RawEvent to Event conversion pipeline.
//!
//! The normalization process:
//! 1. Extracts the numbered fields from the description
//! 2. Resolves the calendar date and wall-clock start from the provider start
//! 3. Fills every field with its extracted value, a provider value, or a fallback
//!
//! Normalization is total: any [`RawEvent`], however sparse, yields an [`Event`].

use afisha_core::event::{Event, TIME_FORMAT, UNTITLED, UNSPECIFIED_VENUE};
use afisha_core::extract::{FieldLabel, extract_fields};
use chrono::NaiveTime;

use crate::raw_event::{RawEvent, RawEventStart};

/// Converts a [`RawEvent`] to an [`Event`].
pub fn normalize_event(raw: &RawEvent) -> Event {
    let fields = extract_fields(raw.description.as_deref().unwrap_or_default());
    let place = fields.city_district();

    let name = fields
        .value(FieldLabel::Name)
        .or_else(|| raw.effective_summary())
        .unwrap_or(UNTITLED)
        .to_uppercase();

    let venue = fields
        .value(FieldLabel::Venue)
        .or_else(|| raw.effective_location())
        .unwrap_or(UNSPECIFIED_VENUE)
        .to_string();

    let (date, start_time) = match raw.start {
        Some(ref start) => (start_date(start), start_time(start)),
        None => (String::new(), None),
    };

    Event {
        id: raw.id.clone().unwrap_or_default(),
        city: place.city,
        district: place.district,
        name,
        short_description: fields.get(FieldLabel::ShortDescription).to_string(),
        date,
        start_time,
        venue,
        age_limit: fields.get(FieldLabel::AgeLimit).to_string(),
        price: fields.get(FieldLabel::Price).to_string(),
        link: fields.get(FieldLabel::Link).to_string(),
        contacts: fields.get(FieldLabel::Contacts).to_string(),
        long_description: fields.into_cleaned(),
    }
}

/// Normalizes a batch of raw events, preserving order.
pub fn normalize_events(raw_events: &[RawEvent]) -> Vec<Event> {
    raw_events.iter().map(normalize_event).collect()
}

/// The all-day date if present, else the date part of the date-time text.
fn start_date(start: &RawEventStart) -> String {
    if let Some(date) = start.date.as_deref().filter(|d| !d.is_empty()) {
        return date.to_string();
    }
    start
        .date_time
        .as_deref()
        .and_then(|dt| dt.split('T').next())
        .unwrap_or_default()
        .to_string()
}

/// `HH:MM` as written after the `T` of the date-time, for timed events only.
fn start_time(start: &RawEventStart) -> Option<String> {
    if start.is_all_day() {
        return None;
    }
    let (_, time) = start.date_time.as_deref()?.split_once('T')?;
    let hhmm = time.get(..5)?;
    NaiveTime::parse_from_str(hhmm, TIME_FORMAT)
        .ok()
        .map(|t| t.format(TIME_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use afisha_core::event::{DEFAULT_AGE_LIMIT, DEFAULT_PRICE, UNSPECIFIED_CITY};

    #[test]
    fn festival_end_to_end() {
        let raw = RawEvent::new("evt-1")
            .with_date("2025-03-15")
            .with_description("1. Город: Центр, Москва\n3. НАИМЕНОВАНИЕ\nФестиваль света\n8. Цена: 500 руб.");

        let event = normalize_event(&raw);
        assert_eq!(event.id, "evt-1");
        assert_eq!(event.district, "Центр");
        assert_eq!(event.city, "Москва");
        assert_eq!(event.name, "ФЕСТИВАЛЬ СВЕТА");
        assert_eq!(event.price, "500 руб.");
        assert_eq!(event.age_limit, DEFAULT_AGE_LIMIT);
        assert_eq!(event.date, "2025-03-15");
        assert!(event.start_time.is_none());
        assert_eq!(event.venue, UNSPECIFIED_VENUE);
    }

    #[test]
    fn empty_record_is_total() {
        let event = normalize_event(&RawEvent::default());
        assert_eq!(event.id, "");
        assert_eq!(event.city, UNSPECIFIED_CITY);
        assert_eq!(event.district, "");
        assert_eq!(event.name, UNTITLED);
        assert_eq!(event.date, "");
        assert!(event.start_time.is_none());
        assert_eq!(event.venue, UNSPECIFIED_VENUE);
        assert_eq!(event.age_limit, DEFAULT_AGE_LIMIT);
        assert_eq!(event.price, DEFAULT_PRICE);
        assert_eq!(event.long_description, "");
        assert_eq!(event.link, "");
        assert_eq!(event.contacts, "");
    }

    #[test]
    fn start_without_fields() {
        let raw = RawEvent {
            start: Some(RawEventStart::default()),
            ..RawEvent::new("x")
        };
        let event = normalize_event(&raw);
        assert_eq!(event.date, "");
        assert!(event.start_time.is_none());
    }

    #[test]
    fn date_time_keeps_wall_clock() {
        let raw = RawEvent::new("x").with_date_time("2025-03-15T23:30:00+03:00");
        let event = normalize_event(&raw);
        assert_eq!(event.date, "2025-03-15");
        assert_eq!(event.start_time.as_deref(), Some("23:30"));
    }

    #[test]
    fn all_day_date_wins_over_date_time() {
        let raw = RawEvent {
            start: Some(RawEventStart {
                date: Some("2025-03-16".to_string()),
                date_time: Some("2025-03-15T10:00:00Z".to_string()),
                time_zone: None,
            }),
            ..RawEvent::new("x")
        };
        let event = normalize_event(&raw);
        assert_eq!(event.date, "2025-03-16");
        assert!(event.start_time.is_none());
    }

    #[test]
    fn empty_date_falls_back_to_date_time() {
        let raw = RawEvent {
            start: Some(RawEventStart {
                date: Some(String::new()),
                date_time: Some("2025-03-15T10:00:00Z".to_string()),
                time_zone: None,
            }),
            ..RawEvent::new("x")
        };
        let event = normalize_event(&raw);
        assert_eq!(event.date, "2025-03-15");
        assert_eq!(event.start_time.as_deref(), Some("10:00"));
    }

    #[test]
    fn malformed_time_is_dropped() {
        let raw = RawEvent::new("x").with_date_time("2025-03-15Tlater");
        let event = normalize_event(&raw);
        assert_eq!(event.date, "2025-03-15");
        assert!(event.start_time.is_none());
    }

    #[test]
    fn summary_is_name_fallback_and_uppercased() {
        let raw = RawEvent::new("x").with_summary("Вечер джаза");
        assert_eq!(normalize_event(&raw).name, "ВЕЧЕР ДЖАЗА");

        let blank = RawEvent::new("x").with_summary("  ");
        assert_eq!(normalize_event(&blank).name, UNTITLED);
    }

    #[test]
    fn extracted_name_wins_over_summary() {
        let raw = RawEvent::new("x")
            .with_summary("Summary")
            .with_description("3. Название: Лекция о космосе");
        assert_eq!(normalize_event(&raw).name, "ЛЕКЦИЯ О КОСМОСЕ");
    }

    #[test]
    fn venue_prefers_description_then_location() {
        let from_location = RawEvent::new("x").with_location("ДК Горбунова");
        assert_eq!(normalize_event(&from_location).venue, "ДК Горбунова");

        let from_description = RawEvent::new("x")
            .with_location("ДК Горбунова")
            .with_description("6. Площадка: Лужники");
        assert_eq!(normalize_event(&from_description).venue, "Лужники");
    }

    #[test]
    fn long_description_is_cleaned_text() {
        let raw = RawEvent::new("x").with_description("<b>Просто</b>&nbsp;текст");
        let event = normalize_event(&raw);
        assert_eq!(event.long_description, "Просто текст");
        assert_eq!(event.short_description, "");
    }

    #[test]
    fn full_description() {
        let description = "1. Город: Видное, ЮЗАО\n\
            3. Название: Турнир\n\
            4. Описание: Открытый турнир по шахматам\n\
            6. Площадка: Шахматный клуб\n\
            7. Допуск: 12+\n\
            8. Стоимость: 300 руб.\n\
            9. Сайт: https://chess.example\n\
            10. Контакты: @chess";
        let event = normalize_event(&RawEvent::new("x").with_description(description));

        assert_eq!(event.district, "Видное");
        assert_eq!(event.city, "ЮЗАО");
        assert_eq!(event.name, "ТУРНИР");
        assert_eq!(event.short_description, "Открытый турнир по шахматам");
        assert_eq!(event.venue, "Шахматный клуб");
        assert_eq!(event.age_limit, "12+");
        assert_eq!(event.price, "300 руб.");
        assert_eq!(event.link, "https://chess.example");
        assert_eq!(event.contacts, "@chess");
    }

    #[test]
    fn batch_preserves_order() {
        let events = normalize_events(&[RawEvent::new("a"), RawEvent::new("b")]);
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn from_api_payload() {
        let raw: RawEvent = serde_json::from_value(serde_json::json!({
            "id": "gcal-42",
            "status": "confirmed",
            "summary": "Выставка",
            "location": "Манеж",
            "description": "1.Город: Санкт-Петербург\n7.Возрастной ценз: 6+",
            "start": { "dateTime": "2025-06-01T11:00:00+03:00" }
        }))
        .unwrap();

        let event = normalize_event(&raw);
        assert_eq!(event.id, "gcal-42");
        assert_eq!(event.city, "Санкт-Петербург");
        assert_eq!(event.age_limit, "6+");
        assert_eq!(event.name, "ВЫСТАВКА");
        assert_eq!(event.venue, "Манеж");
        assert_eq!(event.date, "2025-06-01");
        assert_eq!(event.start_time.as_deref(), Some("11:00"));
    }
}
