//! External text editor for long-form note bodies.

use crate::error::{JotError, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Split a configured command line into program and leading arguments.
pub(crate) fn split_command(command: &str) -> Result<(&str, Vec<&str>)> {
    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| JotError::InvalidArgument("empty external command".to_string()))?;
    Ok((program, parts.collect()))
}

/// Open `command` on `path` and wait for it to exit.
pub fn edit_file(command: &str, path: &Path) -> Result<()> {
    let (program, args) = split_command(command)?;
    let failed = |message: String| JotError::EditorFailed {
        command: command.to_string(),
        message,
    };

    log::debug!("launching editor {} on {}", command, path.display());
    let status = Command::new(program)
        .args(args)
        .arg(path)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| failed(e.to_string()))?;

    if !status.success() {
        return Err(failed(format!("exited with {}", status)));
    }
    Ok(())
}

/// Compose text in the editor, starting from `initial`.
///
/// Trailing whitespace is dropped; an empty buffer is
/// [`JotError::NoContentProvided`].
pub fn compose(command: &str, initial: &str) -> Result<String> {
    let mut file = tempfile::Builder::new()
        .prefix("jot-")
        .suffix(".txt")
        .tempfile()?;
    file.write_all(initial.as_bytes())?;
    file.flush()?;

    edit_file(command, file.path())?;

    let text = std::fs::read_to_string(file.path())?;
    let text = text.trim_end();
    if text.trim().is_empty() {
        return Err(JotError::NoContentProvided);
    }
    Ok(text.to_string())
}
