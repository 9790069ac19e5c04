//! Post-render formatting of generated files.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::core::config::Config;
use crate::core::error::{Error, Result};

/// Rewrites rendered content before it is saved
pub trait Formatter {
    fn format(&self, path: &Path, content: String) -> Result<String>;
}

/// Pipes content through an external command chosen by file extension.
///
/// The command reads the source on stdin and prints the formatted source on
/// stdout, the way `gofmt` does. Files whose extension has no command pass
/// through unchanged.
///
/// Input is written in full before output is read, on the calling thread, so
/// a formatter must not fill its stdout pipe before it has consumed stdin.
/// `gofmt` reads all of its input before writing.
#[derive(Debug, Clone, Default)]
pub struct CommandFormatter {
    commands: BTreeMap<String, Vec<String>>,
}

impl CommandFormatter {
    pub fn new(commands: BTreeMap<String, Vec<String>>) -> Self {
        Self { commands }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.formatters.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn command_for(&self, path: &Path) -> Option<&[String]> {
        let extension = path.extension()?.to_str()?;
        self.commands.get(extension).map(Vec::as_slice)
    }
}

impl Formatter for CommandFormatter {
    fn format(&self, path: &Path, content: String) -> Result<String> {
        let Some((program, args)) = self.command_for(path).and_then(|c| c.split_first()) else {
            return Ok(content);
        };

        debug!(path = %path.display(), program = %program, "Formatting output");
        let format_error = |message: String| Error::Format {
            path: path.to_path_buf(),
            message,
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format_error(format!("failed to run '{program}': {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| format_error("stdin of formatter unavailable".to_string()))?;
        let written = stdin.write_all(content.as_bytes());
        // Closing stdin signals end of input
        drop(stdin);

        let output = child
            .wait_with_output()
            .map_err(|e| format_error(format!("failed to wait for '{program}': {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format_error(format!(
                "'{program}' exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        written.map_err(|e| format_error(format!("failed to write to '{program}': {e}")))?;

        String::from_utf8(output.stdout)
            .map_err(|e| format_error(format!("'{program}' produced invalid UTF-8: {e}")))
    }
}
