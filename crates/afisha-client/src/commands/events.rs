//! Read-only views: event list, calendar and a single event.

use afisha_core::OutputFormat;
use chrono::Datelike;
use serde_json::json;

use crate::cli::PeriodArgs;
use crate::error::ClientResult;

use super::{Context, find_event, print_json, render_calendar, render_events};

/// Lists the events of the month, or of the selected day.
pub async fn list(ctx: &Context, period: &PeriodArgs) -> ClientResult<()> {
    let view = period.view(ctx.today)?;
    let events = ctx.load(view.year()).await?;

    match ctx.format {
        OutputFormat::Json => print_json(&ctx.formatter.json(&view.visible_events(&events))),
        OutputFormat::Text => {
            println!("{}", render_events(&ctx.formatter, &view, &events, None));
            Ok(())
        }
    }
}

/// Shows the month grid with the event list below it.
pub async fn calendar(ctx: &Context, period: &PeriodArgs) -> ClientResult<()> {
    let view = period.view(ctx.today)?;
    let events = ctx.load(view.year()).await?;

    match ctx.format {
        OutputFormat::Json => print_json(&json!({
            "grid": view.grid(&events, ctx.today),
            "selected": view.selected(),
            "events": ctx.formatter.json(&view.visible_events(&events)),
        })),
        OutputFormat::Text => {
            println!(
                "{}",
                render_calendar(&ctx.formatter, &view, &events, ctx.today, None)
            );
            Ok(())
        }
    }
}

/// Shows one event in full.
pub async fn show(ctx: &Context, id: &str, year: Option<i32>) -> ClientResult<()> {
    let year = year.unwrap_or(ctx.today.year());
    let events = ctx.load(year).await?;
    let event = find_event(&events, id)?;

    match ctx.format {
        OutputFormat::Json => print_json(event),
        OutputFormat::Text => {
            print!("{}", ctx.formatter.event_detail(event));
            Ok(())
        }
    }
}
