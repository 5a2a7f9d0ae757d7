//! Filter engine: which notes a listing shows.

use crate::error::Result;
use crate::store::Store;
use crate::types::{NoteId, Status};
use std::collections::HashSet;

/// Preset status subsets for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Plain, unchecked and partial notes.
    #[default]
    Active,
    /// Checked and cancelled notes.
    Review,
    /// Everything.
    Verbose,
}

impl View {
    pub fn statuses(self) -> &'static [Status] {
        match self {
            View::Active => &[Status::Plain, Status::Unchecked, Status::Partial],
            View::Review => &[Status::Checked, Status::Cancelled],
            View::Verbose => Status::all(),
        }
    }
}

/// Status and search-term predicate over the store.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub statuses: Vec<Status>,
    pub search: Option<String>,
}

impl Filter {
    pub fn new(view: View, search: Option<&str>) -> Self {
        Self {
            statuses: view.statuses().to_vec(),
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    /// Search term, if one is active.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Ids matching every predicate, in store order.
    pub fn working_set(&self, store: &Store) -> Result<Vec<NoteId>> {
        let mut ids = store.list_ids_by_status(&self.statuses)?;
        if let Some(term) = self.search_term() {
            let hits: HashSet<NoteId> = store.search_description(term)?.into_iter().collect();
            ids.retain(|id| hits.contains(id));
        }
        Ok(ids)
    }
}
