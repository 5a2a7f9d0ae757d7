//! Shared types for jot.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primary key of a note, assigned by the store on insert.
pub type NoteId = i64;

/// Date format accepted on the command line and stored for due dates.
pub const DATE_FMT: &str = "%Y-%m-%d";

/// Timestamp format stored for `created_at` / `modified_at`.
pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Status vocabulary. The discriminants are the `status_id` values stored
/// in the `Notes` and `Status` tables.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Plain = 1,
    Unchecked = 2,
    Checked = 3,
    Cancelled = 4,
    Partial = 5,
}

impl Status {
    /// All statuses in id order.
    pub fn all() -> &'static [Status] {
        &[
            Status::Plain,
            Status::Unchecked,
            Status::Checked,
            Status::Cancelled,
            Status::Partial,
        ]
    }

    /// The stored `status_id`.
    pub fn id(self) -> i64 {
        self as i64
    }

    /// Look up a status by its stored id.
    pub fn from_id(id: i64) -> Option<Status> {
        Status::all().iter().copied().find(|s| s.id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Plain => "plain",
            Status::Unchecked => "unchecked",
            Status::Checked => "checked",
            Status::Cancelled => "cancelled",
            Status::Partial => "partial",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = String;

    /// Accepts either the numeric id (`1`..`5`) or the label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Status::from_id(id)
                .ok_or_else(|| format!("status must be between 1 and 5, got {}", id));
        }
        Status::all()
            .iter()
            .copied()
            .find(|st| st.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown status: {}", s))
    }
}

/// A stored note, joined with its status glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub status_id: i64,

    /// Display glyph from the `Status` table; `None` when the note's
    /// `status_id` has no matching row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<NaiveDate>,

    pub description: String,
    pub created_at: NaiveDateTime,
    pub modified_at: NaiveDateTime,
}

impl Note {
    pub fn status(&self) -> Option<Status> {
        Status::from_id(self.status_id)
    }

    /// First line of the description.
    pub fn summary_line(&self) -> &str {
        self.description.lines().next().unwrap_or("")
    }

    /// Whether the description spans more than one line.
    pub fn is_multiline(&self) -> bool {
        self.description.contains('\n')
    }
}

/// A directed parent -> child relationship (a row of the `Nest` table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub parent: NoteId,
    pub child: NoteId,
}

impl Edge {
    pub fn new(parent: NoteId, child: NoteId) -> Self {
        Self { parent, child }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.parent, self.child)
    }
}

/// Where a note sits in a rendered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Generation {
    /// Distance from the tree root; free-standing notes and roots are 0.
    Depth(usize),
    /// Carries edges but is not reachable from any root (cycle member or
    /// hanging off a cycle). Always rendered at top level.
    Unresolved,
}

impl Generation {
    pub const TOP: Generation = Generation::Depth(0);

    /// Numeric depth, with -1 standing for unresolved.
    pub fn as_i64(self) -> i64 {
        match self {
            Generation::Depth(d) => d as i64,
            Generation::Unresolved => -1,
        }
    }
}

/// Parse a `YYYY-MM-DD` date, normalising it on the way.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), DATE_FMT)
        .map_err(|_| format!("not a valid date: '{}' (expected YYYY-MM-DD)", s))
}
