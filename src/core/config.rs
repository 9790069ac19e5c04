//! Configuration management for svcgen.
//!
//! Settings come from three places, highest precedence first: command-line
//! flags, an optional `svcgen.toml`, and built-in defaults.
//!
//! ```toml
//! style = "go_zero"
//! home = "/opt/svcgen-templates"
//!
//! [formatters]
//! go = ["gofmt"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{Error, Result};
use crate::core::naming::NamingStyle;

/// File name looked up in the working directory when no `--config` is given
pub const CONFIG_FILE_NAME: &str = "svcgen.toml";

/// Project-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// File naming style, e.g. `go_zero`
    #[serde(default)]
    pub style: Option<String>,

    /// Template home overriding `SVCGEN_HOME` and `~/.svcgen`
    #[serde(default)]
    pub home: Option<PathBuf>,

    /// Formatter command line per file extension, e.g. `go = ["gofmt"]`
    #[serde(default)]
    pub formatters: BTreeMap<String, Vec<String>>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            Error::config(format!("Failed to parse {}: {e}", path.display()))
        })?;

        for (extension, command) in &config.formatters {
            if command.is_empty() {
                return Err(Error::config(format!(
                    "Formatter for '.{extension}' files has an empty command"
                )));
            }
        }

        Ok(config)
    }

    /// Load an explicitly requested file, or `svcgen.toml` from `dir` if present.
    ///
    /// An explicit path that does not exist is an error; a missing default file
    /// simply yields the default configuration.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            debug!(path = %candidate.display(), "Using project config file");
            Self::from_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the naming style: the flag wins over the file, the file over the default
    pub fn naming_style(&self, flag: Option<&str>) -> Result<NamingStyle> {
        match flag.or(self.style.as_deref()) {
            Some(style) => style.parse(),
            None => Ok(NamingStyle::default()),
        }
    }

    /// Resolve the template home: the flag wins over the file
    pub fn template_home(&self, flag: Option<&Path>) -> Option<PathBuf> {
        flag.map(Path::to_path_buf).or_else(|| self.home.clone())
    }
}
