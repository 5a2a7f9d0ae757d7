//! jot - notes and nested tasks on the command line.
//!
//! # Overview
//!
//! Notes live in a single SQLite file. Each has a status (plain, unchecked,
//! checked, cancelled, partial), an optional due date and any number of
//! parent and child links, so tasks can carry subtasks. Listings are built
//! in three steps:
//!
//! - the [`filter`] picks the note ids a view should show,
//! - the [`hierarchy`] resolver places them in the full parent/child forest,
//!   isolating cycles,
//! - the [`render`] module lays them out as fixed-width rows.
//!
//! # Example
//!
//! ```no_run
//! use jot::filter::{Filter, View};
//! use jot::hierarchy::Forest;
//! use jot::render::Renderer;
//! use jot::{Status, Store};
//!
//! let store = Store::open_in_memory().unwrap();
//! let milk = store.insert_note("Buy milk", Status::Plain, None).unwrap();
//! let eggs = store.insert_note("Buy eggs", Status::Unchecked, None).unwrap();
//! store.insert_edge(milk, eggs).unwrap();
//!
//! let visible = Filter::new(View::Active, None).working_set(&store).unwrap();
//! let forest = Forest::resolve(&store.all_note_ids().unwrap(), &store.all_edges().unwrap())
//!     .retain(&visible);
//! let notes: Vec<_> = forest
//!     .placements()
//!     .iter()
//!     .map(|p| (store.get_note(p.id).unwrap().unwrap(), p.generation))
//!     .collect();
//!
//! let renderer = Renderer::new(48, false);
//! println!("{}", renderer.listing(notes.iter().map(|(n, g)| (n, *g)), None).unwrap());
//! ```

pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod filter;
pub mod hierarchy;
pub mod pager;
pub mod render;
pub mod store;
pub mod types;

// Re-export main types at crate root
pub use config::Config;
pub use error::{JotError, Result};
pub use store::Store;
pub use types::*;
