//! Single-note view through the pager.

use crate::cli::output::Output;
use crate::error::Result;
use crate::pager;
use crate::render::Renderer;
use crate::store::Store;
use crate::types::NoteId;
use serde::Serialize;

/// Reported when `--less` names a note that is not stored.
#[derive(Debug, Serialize)]
pub struct MissingNote {
    pub id: NoteId,
    pub message: String,
}

pub fn run(
    store: &Store,
    id: NoteId,
    renderer: &Renderer,
    pager_command: &str,
    output: &Output,
) -> Result<()> {
    let Some(note) = store.get_note(id)? else {
        // A missing note is reported, not fatal.
        let missing = MissingNote {
            id,
            message: format!("Note does not exist: {}", id),
        };
        return output.report(&missing, || missing.message.clone());
    };

    if output.is_json() {
        return output.print(&note);
    }
    pager::page(pager_command, &renderer.detail(&note))
}
