//! Command-line interface definition.

use std::path::PathBuf;

use afisha_core::calendar::{CalendarView, MonthCursor};
use afisha_core::event::DATE_FORMAT;
use afisha_core::{OutputFormat, TracingConfig, TracingOutputFormat};
use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::Level;

use crate::access::Identity;
use crate::config::Overrides;
use crate::error::{ClientError, ClientResult};

/// afisha - events of a public Google calendar, month by month
#[derive(Debug, Parser)]
#[command(name = "afisha")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "AFISHA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Log output format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    // --- Display options ---
    /// Maximum event name length in lists (truncated with ellipsis)
    #[arg(long, global = true)]
    pub max_name_length: Option<usize>,

    /// Render links as terminal hyperlinks
    #[arg(long, global = true)]
    pub hyperlinks: bool,

    // --- Connection flags ---
    /// Google API key
    #[arg(long, env = "AFISHA_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Public calendar id
    #[arg(long, env = "AFISHA_CALENDAR_ID", global = true)]
    pub calendar_id: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    // --- Identity ---
    /// Comma-separated admin user ids and usernames
    #[arg(long, env = "AFISHA_ADMIN_IDS", global = true)]
    pub admin_ids: Option<String>,

    /// Your user id, checked against the admin list
    #[arg(long, env = "AFISHA_USER_ID", global = true)]
    pub user_id: Option<String>,

    /// Your username, checked against the admin list
    #[arg(long, env = "AFISHA_USERNAME", global = true)]
    pub username: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the output format based on CLI flags.
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// Logging setup for `--debug` and `--log-format`.
    pub fn tracing_config(&self) -> TracingConfig {
        let level = if self.debug { Level::DEBUG } else { Level::WARN };
        match self.log_format {
            LogFormat::Json => TracingConfig::json().with_level(level),
            LogFormat::Pretty => self.compact_tracing().with_format(TracingOutputFormat::Pretty),
            LogFormat::Compact => self.compact_tracing(),
        }
    }

    fn compact_tracing(&self) -> TracingConfig {
        if self.debug {
            TracingConfig::cli_debug()
        } else {
            TracingConfig::cli()
        }
    }

    /// Configuration values given on the command line.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            calendar_id: self.calendar_id.clone(),
            admin_ids: self.admin_ids.clone(),
            timeout: self.timeout,
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.user_id.clone(), self.username.clone())
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the events of a month, or of one day with --day
    Events {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Show the month grid and its events (default)
    Calendar {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Show one event in full
    Show {
        /// Event id
        id: String,

        /// Year to look in (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Export one event as an ICS file
    Export(ExportArgs),

    /// Print a ten-line event description to paste into the calendar
    Draft(DraftArgs),

    /// Browse the calendar interactively
    Browse {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Which month, and optionally which day, to show.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct PeriodArgs {
    /// Year (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Month, 1-12 (defaults to the current month, or January of another year)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Day of the month to select
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31))]
    pub day: Option<u32>,
}

impl PeriodArgs {
    /// Builds the calendar view these arguments describe.
    pub fn view(&self, today: NaiveDate) -> ClientResult<CalendarView> {
        let year = self.year.unwrap_or(today.year());
        let month = self.month.unwrap_or(if year == today.year() {
            today.month()
        } else {
            1
        });
        let cursor = MonthCursor::new(year, month)
            .ok_or_else(|| ClientError::Usage(format!("invalid month {month}/{year}")))?;

        let mut view = CalendarView::new(cursor);
        if let Some(day) = self.day {
            let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                ClientError::Usage(format!("{month}/{year} has no day {day}"))
            })?;
            view.select_day(date);
        }
        Ok(view)
    }
}

/// Arguments of `export`.
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// Event id
    pub id: String,

    /// Year to look in (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Output file (defaults to the event name + .ics in the current directory)
    #[arg(long, short, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write the calendar to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Open the file with the default calendar application
    #[arg(long, conflicts_with = "stdout")]
    pub open: bool,
}

/// Arguments of `draft`.
#[derive(Debug, Clone, Default, Args)]
pub struct DraftArgs {
    /// Event date, YYYY-MM-DD (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub district: Option<String>,

    /// Event name (uppercased in the output)
    #[arg(long)]
    pub name: Option<String>,

    /// Short description
    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub venue: Option<String>,

    /// Age limit (defaults to 18+)
    #[arg(long)]
    pub age_limit: Option<String>,

    /// Price (defaults to Бесплатно)
    #[arg(long)]
    pub price: Option<String>,

    #[arg(long)]
    pub link: Option<String>,

    /// People responsible for the event
    #[arg(long)]
    pub contacts: Option<String>,

    /// Copy the description to the clipboard
    #[arg(long)]
    pub copy: bool,
}

/// Configuration actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
