//! Text and JSON rendering of calendar views.
//!
//! - **Text**: month grid, one-line event rows and the expanded event card
//! - **JSON**: the visible events as camelCase records
//!
//! # Example
//!
//! ```rust
//! use afisha_core::calendar::{CalendarView, MonthCursor};
//! use afisha_core::format::{FormatOptions, OutputFormatter};
//! use chrono::NaiveDate;
//!
//! let view = CalendarView::new(MonthCursor::new(2025, 3).unwrap());
//! let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
//! let formatter = OutputFormatter::new(FormatOptions::default());
//! let text = formatter.month_grid(&view.grid(&[], today));
//! assert!(text.starts_with("Март 2025"));
//! ```

use std::borrow::Cow;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{DayCell, MonthCursor, MonthGrid};
use crate::event::Event;


/// Month names, nominative, January first.
pub const MONTHS_RU: [&str; 12] = [
    "Январь",
    "Февраль",
    "Март",
    "Апрель",
    "Май",
    "Июнь",
    "Июль",
    "Август",
    "Сентябрь",
    "Октябрь",
    "Ноябрь",
    "Декабрь",
];

/// Month names, genitive, as used after a day number.
pub const MONTHS_RU_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Abbreviated month names for date badges.
pub const MONTHS_RU_SHORT: [&str; 12] = [
    "янв", "февр", "мар", "апр", "мая", "июн", "июл", "авг", "сент", "окт", "нояб", "дек",
];

/// Weekday headers, Monday first.
pub const DAYS_RU: [&str; 7] = ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"];

/// Link placeholder in the event card.
pub const NO_LINK: &str = "Не указан";

/// Contacts placeholder in the event card.
pub const CONTACTS_PENDING: &str = "Информация уточняется";

/// Shown instead of an empty event list.
pub const NO_EVENTS: &str = "Событий нет";

const CELL_WIDTH: usize = 4;

/// The output format for event display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable terminal output.
    #[default]
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Configuration options for output formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Maximum length for event names in rows (truncated with ellipsis).
    pub max_name_length: Option<usize>,
    /// Whether to render links as OSC8 hyperlinks.
    pub hyperlinks: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_name_length: Some(40),
            hyperlinks: false,
        }
    }
}

/// JSON output for a list of events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Number of events.
    pub count: usize,
    /// The events, in display order.
    pub events: Vec<Event>,
}

/// Renders calendar views as text.
#[derive(Debug, Clone, Default)]
pub struct OutputFormatter {
    options: FormatOptions,
}

impl OutputFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Renders the month grid with a title and a Monday-first header.
    ///
    /// Cell markers follow the highlight priority: `[15]` selected, ` 15*`
    /// has events, `(15)` today.
    pub fn month_grid(&self, grid: &MonthGrid) -> String {
        let mut lines = vec![month_title(grid.cursor)];
        lines.push(
            DAYS_RU
                .iter()
                .map(|d| format!(" {d} "))
                .collect::<String>()
                .trim_end()
                .to_string(),
        );

        for week in grid.weeks() {
            let line: String = week
                .iter()
                .map(|cell| match cell {
                    Some(cell) => day_cell(cell),
                    None => " ".repeat(CELL_WIDTH),
                })
                .collect();
            lines.push(line.trim_end().to_string());
        }

        lines.join("\n")
    }

    /// Renders one collapsed event row: badge, name, city and price.
    pub fn event_row(&self, event: &Event) -> String {
        let name = match self.options.max_name_length {
            Some(max) => ellipsis(&event.name, max),
            None => Cow::Borrowed(event.name.as_str()),
        };
        format!(
            "{:<7} {} · {} · {}",
            date_badge(event),
            name,
            event.city,
            event.price
        )
    }

    /// Renders the rows of `events`, numbered from 1.
    pub fn event_list(&self, events: &[&Event]) -> String {
        events
            .iter()
            .enumerate()
            .map(|(idx, event)| format!("{:>2}. {}", idx + 1, self.event_row(event)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders the expanded event card.
    pub fn event_detail(&self, event: &Event) -> String {
        let mut out = String::new();
        out.push_str(&event.name);
        out.push('\n');
        out.push_str(&date_line(event));
        out.push_str("\n\n");

        out.push_str("Основная информация\n");
        let city = if event.district.is_empty() {
            event.city.clone()
        } else {
            format!("{} ({})", event.city, event.district)
        };
        out.push_str(&field_line("Город и округ", &city));
        out.push_str(&field_line("Описание", &event.short_description));
        out.push('\n');

        out.push_str("Место и условия\n");
        out.push_str(&field_line("Площадка", &event.venue));
        out.push_str(&field_line("Допуск", &event.age_limit));
        out.push_str(&field_line("Стоимость", &event.price));
        out.push('\n');

        out.push_str("Контакты и ссылки\n");
        let link = if !event.has_link() {
            NO_LINK.to_string()
        } else if self.options.hyperlinks {
            make_hyperlink(&event.link, &event.link)
        } else {
            event.link.clone()
        };
        out.push_str(&field_line("Сайт", &link));
        let contacts = if event.contacts.trim().is_empty() {
            CONTACTS_PENDING
        } else {
            event.contacts.as_str()
        };
        out.push_str(&field_line("Обратная связь", contacts));

        if !event.long_description.trim().is_empty() {
            out.push('\n');
            out.push_str(event.long_description.trim_end());
            out.push('\n');
        }

        out
    }

    /// Formats events as JSON output.
    pub fn json(&self, events: &[&Event]) -> JsonOutput {
        JsonOutput {
            count: events.len(),
            events: events.iter().map(|e| (*e).clone()).collect(),
        }
    }
}

/// Returns `"Март 2025"` style titles.
pub fn month_title(cursor: MonthCursor) -> String {
    format!("{} {}", MONTHS_RU[cursor.month0()], cursor.year())
}

/// Heading of the event list: the selected day, or the month.
pub fn list_heading(cursor: MonthCursor, selected: Option<NaiveDate>) -> String {
    match selected {
        Some(day) => format!("События за {} число", day.day()),
        None => format!("События: {}", MONTHS_RU[cursor.month0()].to_lowercase()),
    }
}

/// Returns `"15 марта"` style dates.
pub fn format_date_ru(date: NaiveDate) -> String {
    format!("{} {}", date.day(), MONTHS_RU_GENITIVE[date.month0() as usize])
}

/// Returns the `"15 мар"` badge, or `"--"` for undated events.
pub fn date_badge(event: &Event) -> String {
    match event.calendar_date() {
        Some(date) => format!("{} {}", date.day(), MONTHS_RU_SHORT[date.month0() as usize]),
        None => "--".to_string(),
    }
}

fn date_line(event: &Event) -> String {
    let date = match event.calendar_date() {
        Some(date) => format!("{} {}", format_date_ru(date), date.year()),
        None => "Дата не указана".to_string(),
    };
    match &event.start_time {
        Some(time) => format!("{date}, {time}"),
        None => date,
    }
}

fn field_line(label: &str, value: &str) -> String {
    format!("  {label}: {value}\n")
}

fn day_cell(cell: &DayCell) -> String {
    if cell.selected {
        format!("[{:>2}]", cell.day)
    } else if cell.has_events {
        format!(" {:>2}*", cell.day)
    } else if cell.today {
        format!("({:>2})", cell.day)
    } else {
        format!(" {:>2} ", cell.day)
    }
}

/// Truncates a string with ellipsis if it exceeds the given length in characters.
pub fn ellipsis(s: &str, max_len: usize) -> Cow<'_, str> {
    if max_len == 0 {
        return Cow::Borrowed("");
    }

    if s.chars().count() <= max_len {
        return Cow::Borrowed(s);
    }

    let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
    Cow::Owned(format!("{}...", truncated))
}

/// Creates an OSC8 hyperlink for terminal output.
pub fn make_hyperlink(url: &str, label: &str) -> String {
    format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, label)
}
