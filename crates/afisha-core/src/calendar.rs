//! Month and day views over the fetched events.
//!
//! The views are pure functions of the current event set and the
//! [`CalendarView`] state; they are recomputed on every change rather than
//! maintained incrementally.

use std::collections::HashSet;

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::event::{DATE_FORMAT, Event};

/// The displayed month. Always points at the first day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthCursor {
    first: NaiveDate,
}

impl MonthCursor {
    /// Creates a cursor for `month` (1-12) of `year`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// Creates a cursor for the month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date - chrono::Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Month number, 1-12.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// Zero-based month index, for lookups in month name tables.
    pub fn month0(&self) -> usize {
        self.first.month0() as usize
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Returns the following month, if representable.
    pub fn next(&self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
    }

    /// Returns the preceding month, if representable.
    pub fn prev(&self) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
    }

    /// Iterates over the days of this month.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let month = self.month();
        self.first.iter_days().take_while(move |d| d.month() == month)
    }

    pub fn days_in_month(&self) -> usize {
        self.days().count()
    }

    /// Number of blank cells before day 1 in a Monday-first week.
    pub fn leading_blanks(&self) -> usize {
        self.first.weekday().num_days_from_monday() as usize
    }

    /// Returns true if `date` lies in this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

/// Formats a day as the key compared against [`Event::date`].
pub fn day_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Events whose date falls in the given month.
///
/// Events with a missing or unparseable date never match.
pub fn month_view(events: &[Event], cursor: MonthCursor) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| e.calendar_date().is_some_and(|d| cursor.contains(d)))
        .collect()
}

/// Month view restricted to events on exactly `day`.
pub fn day_view(events: &[Event], cursor: MonthCursor, day: NaiveDate) -> Vec<&Event> {
    let key = day_key(day);
    month_view(events, cursor)
        .into_iter()
        .filter(|e| e.date == key)
        .collect()
}

/// Navigation and selection state of the calendar screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    cursor: MonthCursor,
    selected: Option<NaiveDate>,
}

impl CalendarView {
    pub fn new(cursor: MonthCursor) -> Self {
        Self {
            cursor,
            selected: None,
        }
    }

    /// Starts on the month containing `today`.
    pub fn starting_at(today: NaiveDate) -> Self {
        Self::new(MonthCursor::containing(today))
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn year(&self) -> i32 {
        self.cursor.year()
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    /// Selects `day`, or clears the selection if `day` is already selected.
    pub fn select_day(&mut self, day: NaiveDate) {
        self.selected = if self.selected == Some(day) {
            None
        } else {
            Some(day)
        };
    }

    /// Moves to `cursor`. Returns true if the displayed year changed.
    pub fn go_to(&mut self, cursor: MonthCursor) -> bool {
        let year_changed = cursor.year() != self.cursor.year();
        self.cursor = cursor;
        year_changed
    }

    /// Moves one month forward. Returns true if the displayed year changed.
    pub fn next_month(&mut self) -> bool {
        match self.cursor.next() {
            Some(next) => self.go_to(next),
            None => false,
        }
    }

    /// Moves one month back. Returns true if the displayed year changed.
    pub fn prev_month(&mut self) -> bool {
        match self.cursor.prev() {
            Some(prev) => self.go_to(prev),
            None => false,
        }
    }

    /// Events of the displayed month.
    pub fn month_events<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        month_view(events, self.cursor)
    }

    /// Events listed under the calendar: the selected day, or the whole month.
    pub fn visible_events<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        match self.selected {
            Some(day) => day_view(events, self.cursor, day),
            None => month_view(events, self.cursor),
        }
    }

    /// Returns true if the event should be shown expanded.
    pub fn expands(&self, event: &Event) -> bool {
        self.selected.is_some_and(|day| event.is_on(day))
    }

    /// Builds the month grid for the displayed month.
    pub fn grid(&self, events: &[Event], today: NaiveDate) -> MonthGrid {
        let days_with_events: HashSet<&str> = events.iter().map(|e| e.date.as_str()).collect();

        let days = self
            .cursor
            .days()
            .map(|date| DayCell {
                date,
                day: date.day(),
                has_events: days_with_events.contains(day_key(date).as_str()),
                selected: self.selected == Some(date),
                today: date == today,
            })
            .collect();

        MonthGrid {
            cursor: self.cursor,
            leading_blanks: self.cursor.leading_blanks(),
            days,
        }
    }
}

/// One day cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub day: u32,
    pub has_events: bool,
    pub selected: bool,
    pub today: bool,
}

/// A month laid out on a Monday-first grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub cursor: MonthCursor,
    /// Empty cells before day 1.
    pub leading_blanks: usize,
    pub days: Vec<DayCell>,
}

impl MonthGrid {
    /// Splits the grid into weeks of seven cells; `None` is a blank cell.
    pub fn weeks(&self) -> Vec<Vec<Option<DayCell>>> {
        let cells: Vec<Option<DayCell>> = std::iter::repeat_n(None, self.leading_blanks)
            .chain(self.days.iter().copied().map(Some))
            .collect();
        cells.chunks(7).map(<[_]>::to_vec).collect()
    }
}
