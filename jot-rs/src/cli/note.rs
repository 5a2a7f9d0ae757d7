//! Add, edit, check and uncheck.

use crate::cli::args::{Body, NoteInput, ParentChange};
use crate::error::{JotError, Result};
use crate::store::Store;
use crate::types::{Note, NoteId, Status};
use chrono::Local;

/// Insert a new note and apply its parent link.
///
/// `compose` is called with the starting text when the body has to come
/// from the editor.
pub fn add<F>(store: &Store, input: &NoteInput, compose: F) -> Result<Note>
where
    F: FnOnce(&str) -> Result<String>,
{
    if let Some(ParentChange::Attach(parent)) = input.parent {
        require_note(store, parent)?;
    }

    let description = match &input.body {
        Body::Text(text) => non_empty(text)?,
        Body::Keep | Body::Editor => compose("")?,
    };
    let due = input.due.flatten();
    let id = store.insert_note(&description, input.status.unwrap_or_default(), due)?;

    if let Some(change) = input.parent {
        apply_parent(store, id, change)?;
    }
    require_note(store, id)
}

/// Partial update: fields not supplied keep their stored value,
/// `modified_at` is always refreshed.
pub fn edit<F>(store: &Store, id: NoteId, input: &NoteInput, compose: F) -> Result<Note>
where
    F: FnOnce(&str) -> Result<String>,
{
    let current = require_note(store, id)?;
    if let Some(change) = input.parent {
        check_parent(store, id, change)?;
    }

    let description = match &input.body {
        Body::Keep => current.description.clone(),
        Body::Text(text) => non_empty(text)?,
        Body::Editor => compose(&current.description)?,
    };
    let status_id = input.status.map(Status::id).unwrap_or(current.status_id);
    let due = input.due.unwrap_or(current.due);

    store.replace_note(
        id,
        status_id,
        due,
        &description,
        current.created_at,
        Local::now().naive_local(),
    )?;

    if let Some(change) = input.parent {
        apply_parent(store, id, change)?;
    }
    require_note(store, id)
}

/// Set a note's status, leaving everything else as stored.
pub fn set_status(store: &Store, id: NoteId, status: Status) -> Result<Note> {
    let input = NoteInput {
        body: Body::Keep,
        status: Some(status),
        due: None,
        parent: None,
    };
    edit(store, id, &input, |_| Err(JotError::NoContentProvided))
}

fn require_note(store: &Store, id: NoteId) -> Result<Note> {
    store.get_note(id)?.ok_or(JotError::NoteNotFound(id))
}

fn non_empty(text: &str) -> Result<String> {
    if text.trim().is_empty() {
        return Err(JotError::NoContentProvided);
    }
    Ok(text.to_string())
}

fn check_parent(store: &Store, child: NoteId, change: ParentChange) -> Result<()> {
    if let ParentChange::Attach(parent) = change {
        if parent == child {
            return Err(JotError::InvalidArgument(format!(
                "note {} cannot be its own parent",
                child
            )));
        }
        require_note(store, parent)?;
    }
    Ok(())
}

fn apply_parent(store: &Store, child: NoteId, change: ParentChange) -> Result<()> {
    check_parent(store, child, change)?;
    match change {
        ParentChange::Attach(parent) => {
            if store.edge_exists(parent, child)? {
                log::debug!("{} is already a child of {}", child, parent);
            } else {
                store.insert_edge(parent, child)?;
            }
        }
        ParentChange::Detach(parent) => {
            store.delete_edge(Some(parent), Some(child))?;
        }
        ParentChange::DetachAll => {
            store.delete_edge(None, Some(child))?;
        }
    }
    Ok(())
}
