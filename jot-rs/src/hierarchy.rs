//! Hierarchy resolver.
//!
//! Turns the flat `Nest` edge list into a depth-first ordered forest:
//!
//! 1. Edges whose endpoints are not stored notes are dropped, and repeated
//!    edges collapse to their first occurrence.
//! 2. Roots are notes that appear as a parent but never as a child.
//! 3. Each root is expanded with an explicit stack. The current ancestor
//!    chain is tracked so an edge back into it is recorded and not followed,
//!    and a global visited set places every note at most once (a note with
//!    several parents shows up under the first one reached).
//! 4. Notes that carry edges but were never reached are unresolved: pure
//!    cycles and anything hanging off them.
//! 5. Notes without edges are free-standing, depth 0.
//!
//! Depths are always computed over the whole graph; [`Forest::retain`]
//! narrows the view afterwards so a filtered listing keeps true indentation.

use crate::types::{Edge, Generation, NoteId};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

/// One line of the nested listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub id: NoteId,
    pub generation: Generation,
}

impl Placement {
    pub fn new(id: NoteId, generation: Generation) -> Self {
        Self { id, generation }
    }
}

/// Resolved render order for a set of notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    placements: Vec<Placement>,
    back_edges: Vec<Edge>,
}

struct Frame {
    id: NoteId,
    depth: usize,
    next_child: usize,
}

impl Forest {
    /// Resolve the forest for `note_ids` (every stored note, in store order)
    /// and the full edge list.
    pub fn resolve(note_ids: &[NoteId], edges: &[Edge]) -> Self {
        let known: HashSet<NoteId> = note_ids.iter().copied().collect();

        let mut children: HashMap<NoteId, Vec<NoteId>> = HashMap::new();
        let mut seen_edges: HashSet<Edge> = HashSet::new();
        let mut parents: BTreeSet<NoteId> = BTreeSet::new();
        let mut has_parent: HashSet<NoteId> = HashSet::new();
        let mut linked: BTreeSet<NoteId> = BTreeSet::new();

        for edge in edges {
            if !known.contains(&edge.parent) || !known.contains(&edge.child) {
                log::debug!("ignoring dangling edge {}", edge);
                continue;
            }
            if !seen_edges.insert(*edge) {
                continue;
            }
            children.entry(edge.parent).or_default().push(edge.child);
            parents.insert(edge.parent);
            has_parent.insert(edge.child);
            linked.insert(edge.parent);
            linked.insert(edge.child);
        }

        let mut forest = Forest::default();
        let mut placed: HashSet<NoteId> = HashSet::new();

        for &root in parents.iter().filter(|id| !has_parent.contains(id)) {
            forest.expand(root, &children, &mut placed);
        }

        for &id in &linked {
            if !placed.contains(&id) {
                forest.placements.push(Placement::new(id, Generation::Unresolved));
                placed.insert(id);
            }
        }

        for &id in note_ids {
            if !linked.contains(&id) && placed.insert(id) {
                forest.placements.push(Placement::new(id, Generation::TOP));
            }
        }

        forest
    }

    /// Depth-first expansion of one root without recursion.
    fn expand(
        &mut self,
        root: NoteId,
        children: &HashMap<NoteId, Vec<NoteId>>,
        placed: &mut HashSet<NoteId>,
    ) {
        if !placed.insert(root) {
            return;
        }
        self.placements.push(Placement::new(root, Generation::TOP));

        let mut on_path: HashSet<NoteId> = HashSet::from([root]);
        let mut stack = vec![Frame {
            id: root,
            depth: 0,
            next_child: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let kids = children.get(&frame.id).map(Vec::as_slice).unwrap_or(&[]);
            let Some(&child) = kids.get(frame.next_child) else {
                let done = frame.id;
                stack.pop();
                on_path.remove(&done);
                continue;
            };
            frame.next_child += 1;
            let (parent, depth) = (frame.id, frame.depth + 1);

            if on_path.contains(&child) {
                log::debug!("cycle: not following back-edge {} -> {}", parent, child);
                self.back_edges.push(Edge::new(parent, child));
                continue;
            }
            if !placed.insert(child) {
                continue;
            }

            self.placements.push(Placement::new(child, Generation::Depth(depth)));
            on_path.insert(child);
            stack.push(Frame {
                id: child,
                depth,
                next_child: 0,
            });
        }
    }

    /// Keep only placements for `visible` ids, preserving order and depth.
    /// Visible ids the forest never saw are appended as free-standing.
    pub fn retain(mut self, visible: &[NoteId]) -> Self {
        let wanted: HashSet<NoteId> = visible.iter().copied().collect();
        self.placements.retain(|p| wanted.contains(&p.id));

        let present: HashSet<NoteId> = self.placements.iter().map(|p| p.id).collect();
        for &id in visible {
            if !present.contains(&id) {
                self.placements.push(Placement::new(id, Generation::TOP));
            }
        }
        self
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Edges skipped because they lead back into their own ancestor chain.
    pub fn back_edges(&self) -> &[Edge] {
        &self.back_edges
    }

    #[cfg(test)]
    fn generation_of(&self, id: NoteId) -> Option<Generation> {
        self.placements
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.generation)
    }

    /// Notes placed in the unresolved bucket.
    pub fn unresolved(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.placements
            .iter()
            .filter(|p| p.generation == Generation::Unresolved)
            .map(|p| p.id)
    }
}
