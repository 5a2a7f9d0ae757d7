//! Delete a note and re-home its children.

use crate::error::{JotError, Result};
use crate::store::Store;
use crate::types::{Edge, NoteId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removal {
    pub id: NoteId,
    /// Edges created so former parents adopt former children.
    pub adopted: Vec<Edge>,
}

/// Remove `id` and every edge touching it. Each former parent adopts each
/// former child.
pub fn remove(store: &Store, id: NoteId) -> Result<Removal> {
    if !store.note_exists(id)? {
        return Err(JotError::NoteNotFound(id));
    }

    let parents = store.edges_where_child(id)?;
    let children = store.edges_where_parent(id)?;

    store.delete_edge(Some(id), None)?;
    store.delete_edge(None, Some(id))?;
    store.delete_note(id)?;

    let mut adopted = Vec::new();
    for &parent in parents.iter().filter(|&&p| p != id) {
        for &child in children.iter().filter(|&&c| c != id) {
            if parent == child || store.edge_exists(parent, child)? {
                continue;
            }
            store.insert_edge(parent, child)?;
            log::info!("{} adopts {} after removing {}", parent, child, id);
            adopted.push(Edge::new(parent, child));
        }
    }

    Ok(Removal { id, adopted })
}
