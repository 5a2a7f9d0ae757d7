//! CLI argument definitions using clap.
//!
//! jot is driven by flags rather than subcommands; [`Cli::action`] reduces
//! whatever combination was given to the single operation that runs.

use crate::error::{JotError, Result};
use crate::filter::View;
use crate::types::{NoteId, Status, parse_date};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jot")]
#[command(author, version, about = "Notes and nested tasks on the command line", long_about = None)]
pub struct Cli {
    /// Show notes of every status
    #[arg(short, long)]
    pub verbose: bool,

    /// Show checked and cancelled notes
    #[arg(short, long)]
    pub review: bool,

    /// Add a note (or new text for --edit); bare flag opens the editor
    #[arg(short, long, value_name = "TEXT")]
    pub note: Option<Option<String>>,

    /// Edit the note with this id
    #[arg(short, long, value_name = "ID")]
    pub edit: Option<NoteId>,

    /// Mark a note as unchecked
    #[arg(short, long, value_name = "ID")]
    pub uncheck: Option<NoteId>,

    /// Mark a note as checked
    #[arg(short, long, value_name = "ID")]
    pub check: Option<NoteId>,

    /// Show one note in full through the pager
    #[arg(short, long, value_name = "ID")]
    pub less: Option<NoteId>,

    /// Listing order
    #[arg(short, long, value_enum, default_value = "nested")]
    pub order: Order,

    /// Status for a new or edited note (1-5 or plain/unchecked/checked/cancelled/partial)
    #[arg(short, long)]
    pub status: Option<Status>,

    /// Only list notes containing TEXT
    #[arg(short, long, value_name = "TEXT")]
    pub find: Option<String>,

    /// Due date (YYYY-MM-DD); bare flag clears it
    #[arg(short, long, value_name = "DATE", value_parser = parse_date)]
    pub date: Option<Option<NaiveDate>>,

    /// Delete a note; its children move to its parents
    #[arg(long, value_name = "ID")]
    pub rm: Option<NoteId>,

    /// Nest under ID; negative ID removes that parent; bare flag removes all
    #[arg(short, long, value_name = "ID", allow_negative_numbers = true)]
    pub parent: Option<Option<i64>>,

    /// Set (or with no value, reset) the database directory
    #[arg(long, value_name = "PATH")]
    pub dir: Option<Option<PathBuf>>,

    /// Set (or with no value, reset) the database filename
    #[arg(long, value_name = "NAME")]
    pub dbname: Option<Option<String>>,

    /// Open the config file in the editor
    #[arg(long)]
    pub code: bool,

    /// Show the README
    #[arg(long)]
    pub readme: bool,

    /// Send the listing through the pager
    #[arg(long)]
    pub page: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Order {
    /// Depth-first with generation markers
    #[default]
    Nested,
    /// Store order, no nesting
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Where a note's description comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Leave the current description alone.
    Keep,
    Text(String),
    /// Compose in the editor.
    Editor,
}

/// Change to a note's parent links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentChange {
    Attach(NoteId),
    Detach(NoteId),
    DetachAll,
}

impl ParentChange {
    /// `None` or `0` clears every parent, a negative id removes one link.
    pub fn from_arg(arg: Option<i64>) -> Self {
        match arg {
            None | Some(0) => ParentChange::DetachAll,
            Some(id) if id < 0 => ParentChange::Detach(-id),
            Some(id) => ParentChange::Attach(id),
        }
    }
}

/// Field updates for add and edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteInput {
    pub body: Body,
    pub status: Option<Status>,
    /// `Some(None)` clears the due date.
    pub due: Option<Option<NaiveDate>>,
    pub parent: Option<ParentChange>,
}

/// Listing options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub view: View,
    pub order: Order,
    pub find: Option<String>,
    pub page: bool,
}

/// The one operation an invocation performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetDir(Option<PathBuf>),
    SetDbName(Option<String>),
    Readme,
    Code,
    Add(NoteInput),
    Edit(NoteId, NoteInput),
    Uncheck(NoteId),
    Check(NoteId),
    Remove(NoteId),
    Less(NoteId),
    List(ListRequest),
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// Resolve the flags to a single action, first match wins.
    pub fn action(&self) -> Result<Action> {
        if self.parent.is_some() && self.note.is_none() && self.edit.is_none() {
            return Err(JotError::InvalidArgument(
                "--parent needs --note or --edit".to_string(),
            ));
        }

        if let Some(dir) = &self.dir {
            return Ok(Action::SetDir(dir.clone()));
        }
        if let Some(name) = &self.dbname {
            return Ok(Action::SetDbName(name.clone()));
        }
        if self.readme {
            return Ok(Action::Readme);
        }
        if self.code {
            return Ok(Action::Code);
        }

        if let Some(id) = self.edit {
            let body = match &self.note {
                None => Body::Keep,
                Some(None) => Body::Editor,
                Some(Some(text)) => Body::Text(text.clone()),
            };
            return Ok(Action::Edit(id, self.note_input(body)));
        }
        if self.note.is_some() || self.status.is_some() || self.date.is_some() {
            let body = match &self.note {
                Some(Some(text)) => Body::Text(text.clone()),
                _ => Body::Editor,
            };
            return Ok(Action::Add(self.note_input(body)));
        }

        if let Some(id) = self.uncheck {
            return Ok(Action::Uncheck(id));
        }
        if let Some(id) = self.check {
            return Ok(Action::Check(id));
        }
        if let Some(id) = self.rm {
            return Ok(Action::Remove(id));
        }
        if let Some(id) = self.less {
            return Ok(Action::Less(id));
        }

        let view = if self.verbose {
            View::Verbose
        } else if self.review {
            View::Review
        } else {
            View::Active
        };
        Ok(Action::List(ListRequest {
            view,
            order: self.order,
            find: self.find.clone(),
            page: self.page,
        }))
    }

    fn note_input(&self, body: Body) -> NoteInput {
        NoteInput {
            body,
            status: self.status,
            due: self.date,
            parent: self.parent.map(ParentChange::from_arg),
        }
    }
}
