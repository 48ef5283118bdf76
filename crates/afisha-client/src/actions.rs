//! Desktop actions: open a file, copy text to the clipboard.

use std::path::Path;

use tracing::info;

use crate::error::{ClientError, ClientResult};

/// Opens `path` with the default application (the calendar app for `.ics`).
pub fn open_path(path: &Path) -> ClientResult<()> {
    info!(path = %path.display(), "opening file");
    open::that(path).map_err(|e| ClientError::Action(format!("failed to open {}: {}", path.display(), e)))
}

/// Opens a URL in the default browser.
pub fn open_url(url: &str) -> ClientResult<()> {
    info!(url = %url, "opening URL");
    open::that(url).map_err(|e| ClientError::Action(format!("failed to open URL: {}", e)))
}

/// Copies `text` to the clipboard.
pub fn copy_to_clipboard(text: &str) -> ClientResult<()> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| {
        ClientError::Action(format!("failed to access clipboard: {}", e))
    })?;

    clipboard.set_text(text).map_err(|e| {
        ClientError::Action(format!("failed to copy to clipboard: {}", e))
    })?;

    info!(chars = text.chars().count(), "copied to clipboard");
    Ok(())
}
