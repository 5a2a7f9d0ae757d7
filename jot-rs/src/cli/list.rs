//! Nested and flat listings.

use crate::cli::args::{ListRequest, Order};
use crate::cli::output::Output;
use crate::error::Result;
use crate::filter::Filter;
use crate::hierarchy::Forest;
use crate::pager;
use crate::render::Renderer;
use crate::store::Store;
use crate::types::{Generation, Note, NoteId};
use serde::Serialize;

/// A note as it appears in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    #[serde(flatten)]
    pub note: Note,
    /// Depth in the full hierarchy; -1 for unresolved notes.
    pub generation: i64,
    #[serde(skip)]
    pub placement: Generation,
}

/// Notes to show, in render order.
pub fn collect(store: &Store, filter: &Filter, order: Order) -> Result<Vec<ListEntry>> {
    let visible = filter.working_set(store)?;

    let placed: Vec<(NoteId, Generation)> = match order {
        Order::Nested => {
            let forest = Forest::resolve(&store.all_note_ids()?, &store.all_edges()?);
            log::debug!(
                "resolved {} notes: {} unresolved, {} back-edges skipped",
                forest.placements().len(),
                forest.unresolved().count(),
                forest.back_edges().len()
            );
            let forest = forest.retain(&visible);
            forest
                .placements()
                .iter()
                .map(|p| (p.id, p.generation))
                .collect()
        }
        Order::Flat => visible.iter().map(|&id| (id, Generation::TOP)).collect(),
    };

    let mut entries = Vec::with_capacity(placed.len());
    for (id, generation) in placed {
        // Deleted between queries; nothing to show.
        let Some(note) = store.get_note(id)? else {
            continue;
        };
        entries.push(ListEntry {
            note,
            generation: generation.as_i64(),
            placement: generation,
        });
    }
    Ok(entries)
}

/// Render the listing as text.
pub fn format(renderer: &Renderer, entries: &[ListEntry], filter: &Filter) -> Result<String> {
    renderer.listing(
        entries.iter().map(|e| (&e.note, e.placement)),
        filter.search_term(),
    )
}

pub fn run(
    store: &Store,
    request: &ListRequest,
    renderer: &Renderer,
    pager_command: &str,
    output: &Output,
) -> Result<()> {
    let filter = Filter::new(request.view, request.find.as_deref());
    let entries = collect(store, &filter, request.order)?;

    if output.is_json() {
        return output.print(&entries);
    }

    let text = format(renderer, &entries, &filter)?;
    if request.page {
        pager::page(pager_command, &text)
    } else {
        output.print_raw(&text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::View;
    use crate::types::Status;
    use pretty_assertions::assert_eq;

    fn ids(entries: &[ListEntry]) -> Vec<(NoteId, i64)> {
        entries.iter().map(|e| (e.note.id, e.generation)).collect()
    }

    fn scenario() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.insert_note("Buy milk", Status::Plain, None).unwrap();
        store.insert_note("Buy eggs", Status::Plain, None).unwrap();
        store.insert_edge(1, 2).unwrap();
        store
    }

    #[test]
    fn test_nested_listing() {
        let store = scenario();
        let entries = collect(&store, &Filter::new(View::Active, None), Order::Nested).unwrap();
        assert_eq!(ids(&entries), vec![(1, 0), (2, 1)]);

        let text = format(&Renderer::new(20, false), &entries, &Filter::default()).unwrap();
        assert!(text.contains("|    2 | > Buy eggs"));
    }

    #[test]
    fn test_checked_child_leaves_active_view() {
        let store = scenario();
        let eggs = store.get_note(2).unwrap().unwrap();
        store
            .replace_note(2, Status::Checked.id(), None, "Buy eggs", eggs.created_at, eggs.modified_at)
            .unwrap();

        let active = collect(&store, &Filter::new(View::Active, None), Order::Nested).unwrap();
        assert_eq!(ids(&active), vec![(1, 0)]);

        // Still shown at its true depth even though its parent is filtered out.
        let review = collect(&store, &Filter::new(View::Review, None), Order::Nested).unwrap();
        assert_eq!(ids(&review), vec![(2, 1)]);
    }

    #[test]
    fn test_flat_listing_uses_store_order() {
        let store = scenario();
        store.insert_note("Standalone", Status::Unchecked, None).unwrap();
        store.insert_edge(3, 1).unwrap();
        let entries = collect(&store, &Filter::new(View::Active, None), Order::Flat).unwrap();
        assert_eq!(ids(&entries), vec![(1, 0), (2, 0), (3, 0)]);
    }

    #[test]
    fn test_cycle_listing_terminates() {
        let store = scenario();
        store.insert_edge(2, 1).unwrap();
        let entries = collect(&store, &Filter::new(View::Active, None), Order::Nested).unwrap();
        assert_eq!(ids(&entries), vec![(1, -1), (2, -1)]);

        let text = format(&Renderer::new(20, false), &entries, &Filter::default()).unwrap();
        assert_eq!(text.matches("? Buy").count(), 2);
    }

    #[test]
    fn test_search_listing_highlights() {
        let store = scenario();
        let filter = Filter::new(View::Active, Some("eggs"));
        let entries = collect(&store, &filter, Order::Nested).unwrap();
        assert_eq!(ids(&entries), vec![(2, 1)]);
        let text = format(&Renderer::new(20, false), &entries, &filter).unwrap();
        assert!(text.contains("> Buy EGGS"));
    }

    #[test]
    fn test_empty_listing_renders_frame() {
        let store = Store::open_in_memory().unwrap();
        let entries = collect(&store, &Filter::new(View::Active, None), Order::Nested).unwrap();
        let renderer = Renderer::new(20, false);
        let text = format(&renderer, &entries, &Filter::default()).unwrap();
        assert_eq!(text, renderer.listing(std::iter::empty(), None).unwrap());
    }

    #[test]
    fn test_json_entry_shape() {
        let store = scenario();
        let entries = collect(&store, &Filter::new(View::Active, None), Order::Nested).unwrap();
        let value = serde_json::to_value(&entries[1]).unwrap();
        assert_eq!(value["id"], 2);
        assert_eq!(value["generation"], 1);
        assert_eq!(value["description"], "Buy eggs");
        assert!(value.get("placement").is_none());
    }
}
