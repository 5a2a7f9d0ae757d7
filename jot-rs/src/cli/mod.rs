//! CLI command implementations.

pub mod args;
pub mod output;

pub mod list;
pub mod note;
pub mod remove;
pub mod settings;
pub mod view;

pub use args::{Action, Cli};
pub use output::Output;

use crate::config::Config;
use crate::render::Renderer;

/// Renderer for this invocation. Color is dropped for JSON output,
/// `--no-color` and a set `NO_COLOR`.
pub fn renderer(config: &Config, cli: &Cli) -> Renderer {
    let colorize = config.colorize
        && !cli.no_color
        && !cli.json
        && std::env::var_os("NO_COLOR").is_none_or(|v| v.is_empty());
    Renderer::new(config.summary_width, colorize)
}
