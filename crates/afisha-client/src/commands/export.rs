//! ICS export.

use std::path::{Path, PathBuf};

use afisha_core::{OutputFormat, generate_ics, ics_file_name};
use chrono::Datelike;
use serde_json::json;
use tracing::info;

use crate::actions;
use crate::cli::ExportArgs;
use crate::error::ClientResult;

use super::{Context, find_event, print_json};

/// Exports one event to an `.ics` file, stdout, or the calendar application.
pub async fn export(ctx: &Context, args: &ExportArgs) -> ClientResult<()> {
    let year = args.year.unwrap_or(ctx.today.year());
    let events = ctx.load(year).await?;
    let event = find_event(&events, &args.id)?;
    let ics = generate_ics(event)?;

    if args.stdout {
        print!("{ics}");
        return Ok(());
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(ics_file_name(event)));
    write_ics(&path, &ics)?;
    info!(id = %event.id, path = %path.display(), "exported event");

    match ctx.format {
        OutputFormat::Json => print_json(&json!({ "id": event.id, "path": path }))?,
        OutputFormat::Text => println!("{}", path.display()),
    }

    if args.open {
        actions::open_path(&path)?;
    }
    Ok(())
}

/// Writes the calendar text to `path`.
pub fn write_ics(path: &Path, ics: &str) -> ClientResult<()> {
    std::fs::write(path, ics)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::context;

    fn args(id: &str, output: Option<PathBuf>) -> ExportArgs {
        ExportArgs {
            id: id.to_string(),
            year: None,
            output,
            stdout: false,
            open: false,
        }
    }

    #[tokio::test]
    async fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("festival.ics");

        export(&context(false), &args("festival", Some(path.clone())))
            .await
            .unwrap();

        let ics = std::fs::read_to_string(&path).unwrap();
        let unfolded = ics.replace("\r\n ", "");
        assert!(unfolded.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(unfolded.contains("UID:festival@eventcalendar\r\n"));
        assert!(unfolded.contains("DTSTART:20250315T000000\r\n"));
        assert!(unfolded.contains("DTEND:20250315T020000\r\n"));
        assert!(unfolded.contains("SUMMARY:ФЕСТИВАЛЬ СВЕТА\r\n"));
    }

    #[tokio::test]
    async fn export_unknown_id_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.ics");
        assert!(export(&context(false), &args("nope", Some(path.clone())))
            .await
            .is_err());
        assert!(!path.exists());
    }
}
