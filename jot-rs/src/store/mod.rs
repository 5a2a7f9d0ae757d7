//! SQLite-backed note store.
//!
//! Pure CRUD and query primitives over the `Notes`, `Status` and `Nest`
//! tables. Every mutating call is a single statement and is durable when it
//! returns; orchestration across calls (edge cleanup, re-parenting) belongs
//! to the caller.

use crate::config::Config;
use crate::error::{JotError, Result};
use crate::render::highlight::Matcher;
use crate::types::{DATE_FMT, Edge, Note, NoteId, Status, TIMESTAMP_FMT};
use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use std::path::Path;

/// Schema script run on every open; idempotent.
const SCHEMA: &str = include_str!("schema.sql");

const NOTE_SELECT: &str = "SELECT n.notes_id, n.status_id, n.due, n.description, \
     n.created_at, n.modified_at, s.glyph \
     FROM Notes n LEFT JOIN Status s ON n.status_id = s.status_id";

/// Handle to the note database.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the database named by the config.
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_path(&config.db_path())
    }

    /// Open (creating on first run) the database at `path`.
    pub fn open_path(path: &Path) -> Result<Self> {
        let fresh = !path.exists();
        let unavailable = |source| JotError::StoreUnavailable {
            path: path.to_path_buf(),
            source,
        };

        let conn = Connection::open(path).map_err(unavailable)?;
        conn.execute_batch(SCHEMA).map_err(unavailable)?;

        if fresh {
            log::info!("created note database at {}", path.display());
        } else {
            log::debug!("opened note database at {}", path.display());
        }

        Ok(Self { conn })
    }

    /// Open a throwaway database, mostly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    // === Notes ===

    /// Insert a note; `created_at` and `modified_at` are set to now.
    pub fn insert_note(
        &self,
        description: &str,
        status: Status,
        due: Option<NaiveDate>,
    ) -> Result<NoteId> {
        let now = now_stamp();
        self.conn.execute(
            "INSERT INTO Notes (description, status_id, due, created_at, modified_at) \
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![description, status.id(), due.map(format_date), now],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Full-row upsert. Callers pass unchanged fields through verbatim.
    pub fn replace_note(
        &self,
        id: NoteId,
        status_id: i64,
        due: Option<NaiveDate>,
        description: &str,
        created_at: NaiveDateTime,
        modified_at: NaiveDateTime,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO Notes \
             (notes_id, status_id, due, description, created_at, modified_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                status_id,
                due.map(format_date),
                description,
                created_at.format(TIMESTAMP_FMT).to_string(),
                modified_at.format(TIMESTAMP_FMT).to_string(),
            ],
        )?;
        Ok(())
    }

    /// Remove the note row only. Edges are left for the caller.
    pub fn delete_note(&self, id: NoteId) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM Notes WHERE notes_id = ?1", params![id])?;
        Ok(removed > 0)
    }

    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>> {
        let sql = format!("{} WHERE n.notes_id = ?1", NOTE_SELECT);
        let note = self
            .conn
            .query_row(&sql, params![id], note_from_row)
            .optional()?;
        Ok(note)
    }

    pub fn note_exists(&self, id: NoteId) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM Notes WHERE notes_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Every note id, in id order.
    pub fn all_note_ids(&self) -> Result<Vec<NoteId>> {
        self.query_ids("SELECT notes_id FROM Notes ORDER BY notes_id", [])
    }

    /// Ids of notes whose status is in `statuses`, in id order.
    pub fn list_ids_by_status(&self, statuses: &[Status]) -> Result<Vec<NoteId>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; statuses.len()].join(", ");
        let sql = format!(
            "SELECT notes_id FROM Notes WHERE status_id IN ({}) ORDER BY notes_id",
            placeholders
        );
        self.query_ids(&sql, params_from_iter(statuses.iter().map(|s| s.id())))
    }

    /// Ids of notes whose description contains `term`, ignoring case.
    ///
    /// SQLite `LIKE` folds ASCII only, so matching is done with the same
    /// Unicode-aware matcher the renderer highlights with.
    pub fn search_description(&self, term: &str) -> Result<Vec<NoteId>> {
        let matcher = Matcher::new(term)?;
        let mut stmt = self
            .conn
            .prepare("SELECT notes_id, description FROM Notes ORDER BY notes_id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, NoteId>(0)?, row.get::<_, Option<String>>(1)?))
        })?;

        let mut ids = Vec::new();
        for row in rows {
            let (id, description) = row?;
            if matcher.is_match(description.as_deref().unwrap_or("")) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    // === Edges ===

    pub fn insert_edge(&self, parent: NoteId, child: NoteId) -> Result<()> {
        self.conn.execute(
            "INSERT INTO Nest (parent, child) VALUES (?1, ?2)",
            params![parent, child],
        )?;
        Ok(())
    }

    /// Delete edges matching the bound endpoints. At least one must be bound.
    pub fn delete_edge(&self, parent: Option<NoteId>, child: Option<NoteId>) -> Result<usize> {
        let removed = match (parent, child) {
            (Some(p), Some(c)) => self.conn.execute(
                "DELETE FROM Nest WHERE parent = ?1 AND child = ?2",
                params![p, c],
            )?,
            (Some(p), None) => self
                .conn
                .execute("DELETE FROM Nest WHERE parent = ?1", params![p])?,
            (None, Some(c)) => self
                .conn
                .execute("DELETE FROM Nest WHERE child = ?1", params![c])?,
            (None, None) => {
                return Err(JotError::InvalidArgument(
                    "edge deletion needs a parent or a child".to_string(),
                ));
            }
        };
        Ok(removed)
    }

    pub fn edge_exists(&self, parent: NoteId, child: NoteId) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM Nest WHERE parent = ?1 AND child = ?2 LIMIT 1",
                params![parent, child],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Parents of `id`, in edge insertion order.
    pub fn edges_where_child(&self, id: NoteId) -> Result<Vec<NoteId>> {
        self.query_ids(
            "SELECT parent FROM Nest WHERE child = ?1 ORDER BY rowid",
            params![id],
        )
    }

    /// Children of `id`, in edge insertion order.
    pub fn edges_where_parent(&self, id: NoteId) -> Result<Vec<NoteId>> {
        self.query_ids(
            "SELECT child FROM Nest WHERE parent = ?1 ORDER BY rowid",
            params![id],
        )
    }

    /// Every edge, in insertion order. Duplicates are returned as stored.
    pub fn all_edges(&self) -> Result<Vec<Edge>> {
        let mut stmt = self
            .conn
            .prepare("SELECT parent, child FROM Nest ORDER BY rowid")?;
        let edges = stmt
            .query_map([], |row| Ok(Edge::new(row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(edges)
    }

    fn query_ids<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<NoteId>> {
        let mut stmt = self.conn.prepare(sql)?;
        let ids = stmt
            .query_map(params, |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<NoteId>>>()?;
        Ok(ids)
    }
}

/// Current local time, truncated to whole seconds.
pub fn now_stamp() -> String {
    Local::now().naive_local().format(TIMESTAMP_FMT).to_string()
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    let due: Option<String> = row.get(2)?;
    let description: Option<String> = row.get(3)?;
    let created: String = row.get(4)?;
    let modified: String = row.get(5)?;

    let due = match due.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(
            NaiveDate::parse_from_str(s, DATE_FMT).map_err(|e| conversion_error(2, e))?,
        ),
    };

    Ok(Note {
        id: row.get(0)?,
        status_id: row.get(1)?,
        glyph: row.get(6)?,
        due,
        description: description.unwrap_or_default(),
        created_at: parse_stamp(&created).map_err(|e| conversion_error(4, e))?,
        modified_at: parse_stamp(&modified).map_err(|e| conversion_error(5, e))?,
    })
}

fn parse_stamp(s: &str) -> std::result::Result<NaiveDateTime, chrono::ParseError> {
    // Tolerate fractional seconds written by other tools.
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FMT)
        .or_else(|_| NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S%.f"))
}

fn conversion_error(idx: usize, err: chrono::ParseError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FMT).unwrap()
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let store = Store::open_in_memory().unwrap();
        let id = store
            .insert_note("Buy milk\nsemi-skimmed", Status::Unchecked, Some(date("2024-05-01")))
            .unwrap();

        let note = store.get_note(id).unwrap().unwrap();
        assert_eq!(note.id, id);
        assert_eq!(note.description, "Buy milk\nsemi-skimmed");
        assert_eq!(note.status(), Some(Status::Unchecked));
        assert_eq!(note.glyph.as_deref(), Some("[ ]"));
        assert_eq!(note.due, Some(date("2024-05-01")));
        assert_eq!(note.created_at, note.modified_at);
    }

    #[test]
    fn test_first_insert_gets_id_one() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.insert_note("a", Status::Plain, None).unwrap(), 1);
        assert_eq!(store.insert_note("b", Status::Plain, None).unwrap(), 2);
    }

    #[test]
    fn test_get_missing_note() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.get_note(42).unwrap().is_none());
        assert!(!store.note_exists(42).unwrap());
    }

    #[test]
    fn test_replace_note_overwrites_row() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_note("draft", Status::Plain, None).unwrap();
        let before = store.get_note(id).unwrap().unwrap();

        let later = before.created_at + chrono::Duration::minutes(5);
        store
            .replace_note(id, Status::Checked.id(), Some(date("2030-01-01")), "final", before.created_at, later)
            .unwrap();

        let after = store.get_note(id).unwrap().unwrap();
        assert_eq!(after.description, "final");
        assert_eq!(after.status_id, 3);
        assert_eq!(after.due, Some(date("2030-01-01")));
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.modified_at, later);
    }

    #[test]
    fn test_unknown_status_has_no_glyph() {
        let store = Store::open_in_memory().unwrap();
        let id = store.insert_note("odd", Status::Plain, None).unwrap();
        let note = store.get_note(id).unwrap().unwrap();
        store
            .replace_note(id, 9, None, "odd", note.created_at, note.modified_at)
            .unwrap();

        let note = store.get_note(id).unwrap().unwrap();
        assert_eq!(note.glyph, None);
        assert_eq!(note.status(), None);
    }

    #[test]
    fn test_delete_note_leaves_edges() {
        let store = Store::open_in_memory().unwrap();
        let a = store.insert_note("a", Status::Plain, None).unwrap();
        let b = store.insert_note("b", Status::Plain, None).unwrap();
        store.insert_edge(a, b).unwrap();

        assert!(store.delete_note(b).unwrap());
        assert!(!store.delete_note(b).unwrap());
        assert_eq!(store.all_edges().unwrap(), vec![Edge::new(a, b)]);
    }

    #[test]
    fn test_list_ids_by_status() {
        let store = Store::open_in_memory().unwrap();
        let plain = store.insert_note("p", Status::Plain, None).unwrap();
        let done = store.insert_note("d", Status::Checked, None).unwrap();
        let partial = store.insert_note("h", Status::Partial, None).unwrap();

        assert_eq!(
            store
                .list_ids_by_status(&[Status::Plain, Status::Unchecked, Status::Partial])
                .unwrap(),
            vec![plain, partial]
        );
        assert_eq!(store.list_ids_by_status(&[Status::Checked]).unwrap(), vec![done]);
        assert!(store.list_ids_by_status(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_search_description_ignores_case() {
        let store = Store::open_in_memory().unwrap();
        let milk = store.insert_note("Buy MILK", Status::Plain, None).unwrap();
        let _eggs = store.insert_note("Buy eggs", Status::Plain, None).unwrap();
        let later = store
            .insert_note("call\nabout the milkman", Status::Plain, None)
            .unwrap();

        assert_eq!(store.search_description("milk").unwrap(), vec![milk, later]);
    }

    #[test]
    fn test_search_description_folds_unicode_case() {
        let store = Store::open_in_memory().unwrap();
        let river = store.insert_note("Über den Fluss", Status::Plain, None).unwrap();
        let _other = store.insert_note("unter der Brücke", Status::Plain, None).unwrap();
        let greek = store.insert_note("ΣΟΦΙΑ", Status::Plain, None).unwrap();

        assert_eq!(store.search_description("über").unwrap(), vec![river]);
        assert_eq!(store.search_description("ÜBER").unwrap(), vec![river]);
        assert_eq!(store.search_description("σοφ").unwrap(), vec![greek]);
    }

    #[test]
    fn test_search_description_escapes_wildcards() {
        let store = Store::open_in_memory().unwrap();
        let pct = store.insert_note("100% done", Status::Plain, None).unwrap();
        let _other = store.insert_note("1000 done", Status::Plain, None).unwrap();

        assert_eq!(store.search_description("0%").unwrap(), vec![pct]);
        assert!(store.search_description("a_b").unwrap().is_empty());
    }

    #[test]
    fn test_edge_queries() {
        let store = Store::open_in_memory().unwrap();
        store.insert_edge(1, 2).unwrap();
        store.insert_edge(1, 3).unwrap();
        store.insert_edge(4, 3).unwrap();

        assert_eq!(store.edges_where_parent(1).unwrap(), vec![2, 3]);
        assert_eq!(store.edges_where_child(3).unwrap(), vec![1, 4]);
        assert!(store.edge_exists(4, 3).unwrap());
        assert!(!store.edge_exists(3, 4).unwrap());

        assert_eq!(store.delete_edge(Some(1), Some(3)).unwrap(), 1);
        assert_eq!(store.delete_edge(None, Some(3)).unwrap(), 1);
        assert_eq!(store.delete_edge(Some(1), None).unwrap(), 1);
        assert!(store.all_edges().unwrap().is_empty());
    }

    #[test]
    fn test_delete_edge_requires_endpoint() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(
            store.delete_edge(None, None),
            Err(JotError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_writes_are_durable_across_reopen() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("jot.sqlite");

        let id = {
            let store = Store::open_path(&path).unwrap();
            let id = store.insert_note("persist me", Status::Plain, None).unwrap();
            store.insert_edge(id, id + 1).unwrap();
            id
        };

        let store = Store::open_path(&path).unwrap();
        assert_eq!(store.get_note(id).unwrap().unwrap().description, "persist me");
        assert_eq!(store.all_edges().unwrap(), vec![Edge::new(id, id + 1)]);
        assert!(path.is_file());
    }

    #[test]
    fn test_unreachable_directory_is_store_unavailable() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("missing").join("jot.sqlite");
        assert!(matches!(
            Store::open_path(&path),
            Err(JotError::StoreUnavailable { .. })
        ));
    }
}
