//! Numbered description drafts for administrators.

use afisha_core::{EventDraft, OutputFormat};
use chrono::NaiveDate;
use serde_json::json;
use tracing::debug;

use crate::actions;
use crate::cli::DraftArgs;
use crate::error::{ClientError, ClientResult};

use super::{Context, print_json};

/// Prints the ten-line description built from `args`.
pub fn draft(ctx: &Context, args: &DraftArgs) -> ClientResult<()> {
    if !ctx.is_admin() {
        debug!(identity = ?ctx.identity, "draft refused");
        return Err(ClientError::NotAdmin);
    }

    let draft = build_draft(args, ctx.today);
    let description = draft.render_description();

    match ctx.format {
        OutputFormat::Json => print_json(&json!({
            "draft": draft,
            "description": description,
        }))?,
        OutputFormat::Text => println!("{description}"),
    }

    if args.copy {
        actions::copy_to_clipboard(&description)?;
        eprintln!("Скопировано");
    }
    Ok(())
}

/// Fills a draft from the arguments; unset fields keep their defaults.
pub fn build_draft(args: &DraftArgs, today: NaiveDate) -> EventDraft {
    let mut draft = EventDraft::for_selection(args.date, today);
    let fields = [
        (&mut draft.city, &args.city),
        (&mut draft.district, &args.district),
        (&mut draft.name, &args.name),
        (&mut draft.description, &args.description),
        (&mut draft.venue, &args.venue),
        (&mut draft.age_limit, &args.age_limit),
        (&mut draft.price, &args.price),
        (&mut draft.link, &args.link),
        (&mut draft.contacts, &args.contacts),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            *field = value.trim().to_string();
        }
    }
    draft
}
