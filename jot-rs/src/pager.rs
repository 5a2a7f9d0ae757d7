//! External pager for single-note views and paged listings.

use crate::editor::split_command;
use crate::error::{JotError, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// Pipe `content` through `command`. When the pager cannot be started the
/// content goes to stdout instead.
pub fn page(command: &str, content: &str) -> Result<()> {
    let (program, args) = split_command(command)?;

    let mut child = match Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            log::warn!("could not start pager '{}': {}", command, e);
            println!("{}", content);
            return Ok(());
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        // The pager may quit before reading everything.
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(JotError::PagerFailed {
            command: command.to_string(),
            message: format!("exited with {}", status),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_page_through_cat() {
        assert!(page("cat", "hello").is_ok());
    }

    #[test]
    fn test_missing_pager_falls_back() {
        assert!(page("jot-no-such-pager-binary", "hello").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_pager() {
        assert!(matches!(page("false", "x"), Err(JotError::PagerFailed { .. })));
    }
}
