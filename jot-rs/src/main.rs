//! jot CLI entry point.

use clap::Parser;
use env_logger::Env;
use jot::cli::args::{Action, Cli};
use jot::cli::output::Output;
use jot::cli::{list, note, remove, settings, view};
use jot::config::Config;
use jot::editor;
use jot::error::Result;
use jot::store::Store;
use jot::types::Status;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let action = cli.action()?;
    let mut config = Config::load()?;
    let output = Output::new(cli.output_format(), cli.quiet);

    // Settings never touch the database.
    match &action {
        Action::SetDir(dir) => return settings::set_dir(&mut config, dir.clone(), &output),
        Action::SetDbName(name) => {
            return settings::set_db_name(&mut config, name.clone(), &output);
        }
        Action::Readme => return settings::readme(&config),
        Action::Code => return settings::edit_config(&config),
        _ => {}
    }

    let store = Store::open(&config)?;
    let renderer = jot::cli::renderer(&config, cli);
    let editor_command = config.editor_command();
    let pager_command = config.pager_command();
    let compose = |initial: &str| editor::compose(&editor_command, initial);

    match action {
        Action::Add(input) => {
            let note = note::add(&store, &input, compose)?;
            output.report(&note, || format!("Added note {}", note.id))
        }
        Action::Edit(id, input) => {
            let note = note::edit(&store, id, &input, compose)?;
            output.report(&note, || format!("Updated note {}", note.id))
        }
        Action::Uncheck(id) => {
            let note = note::set_status(&store, id, Status::Unchecked)?;
            output.report(&note, || format!("Unchecked note {}", note.id))
        }
        Action::Check(id) => {
            let note = note::set_status(&store, id, Status::Checked)?;
            output.report(&note, || format!("Checked note {}", note.id))
        }
        Action::Remove(id) => {
            let removal = remove::remove(&store, id)?;
            output.report(&removal, || format!("Removed note {}", removal.id))
        }
        Action::Less(id) => view::run(&store, id, &renderer, &pager_command, &output),
        Action::List(request) => list::run(&store, &request, &renderer, &pager_command, &output),
        Action::SetDir(_) | Action::SetDbName(_) | Action::Readme | Action::Code => Ok(()),
    }
}
