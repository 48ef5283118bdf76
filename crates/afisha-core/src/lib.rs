//! Core types: events, description field extraction, calendar views, export

pub mod calendar;
pub mod event;
pub mod extract;
pub mod format;
pub mod ics;
pub mod template;
pub mod time;
pub mod tracing;

pub use calendar::{CalendarView, DayCell, MonthCursor, MonthGrid, day_key, day_view, month_view};
pub use event::Event;
pub use extract::{CityDistrict, ExtractedFields, FieldLabel, extract_fields};
pub use format::{FormatOptions, JsonOutput, OutputFormat, OutputFormatter};
pub use ics::{IcsError, generate_ics, ics_file_name};
pub use template::EventDraft;
pub use time::TimeWindow;
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
