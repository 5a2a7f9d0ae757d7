//! Database location overrides, config editing and the bundled README.

use crate::cli::output::Output;
use crate::config::Config;
use crate::editor;
use crate::error::Result;
use crate::pager;
use serde::Serialize;
use std::path::PathBuf;

/// The bundled README shown by `--readme`.
pub const README: &str = include_str!("../../README.md");

#[derive(Debug, Serialize)]
pub struct DatabaseLocation {
    pub config: PathBuf,
    pub database: PathBuf,
}

/// Set or clear the database directory override and persist the config.
pub fn set_dir(config: &mut Config, dir: Option<PathBuf>, output: &Output) -> Result<()> {
    config.db_dir = match dir {
        Some(dir) if dir.is_relative() => Some(std::env::current_dir()?.join(dir)),
        other => other,
    };
    if let Some(dir) = &config.db_dir {
        if !dir.is_dir() {
            output.warn(&format!("{} is not a directory yet", dir.display()));
        }
    }
    save_and_report(config, output)
}

/// Set or clear the database filename override and persist the config.
pub fn set_db_name(config: &mut Config, name: Option<String>, output: &Output) -> Result<()> {
    config.db_name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    save_and_report(config, output)
}

fn save_and_report(config: &Config, output: &Output) -> Result<()> {
    let location = DatabaseLocation {
        config: config.save()?,
        database: config.db_path(),
    };
    output.report(&location, || location.database.display().to_string())
}

/// Open the config file in the editor, writing defaults first if missing.
pub fn edit_config(config: &Config) -> Result<()> {
    let path = config.path()?;
    if !path.exists() {
        config.save()?;
    }
    editor::edit_file(&config.editor_command(), &path)
}

pub fn readme(config: &Config) -> Result<()> {
    pager::page(&config.pager_command(), README)
}
