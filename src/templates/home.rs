//! Location of the template home, the root of all on-disk template overrides.
//!
//! The home is process-wide: it is registered once (usually from `--home`)
//! before any repository operation and cannot change afterwards. Without a
//! registration it resolves, in order, from:
//! 1. the `SVCGEN_HOME` environment variable
//! 2. `~/.svcgen` in the user's home directory

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::core::error::{Error, Result};

/// Environment variable overriding the default template home
pub const HOME_ENV: &str = "SVCGEN_HOME";

/// Directory created under the user's home when nothing else is configured
pub const DEFAULT_HOME_DIR: &str = ".svcgen";

static HOME: OnceCell<PathBuf> = OnceCell::new();

/// Trait for reading home configuration, allowing dependency injection for testing
pub trait HomeConfigReader {
    fn home_override(&self) -> Option<String>;
    fn user_home(&self) -> Option<PathBuf>;
}

/// Production implementation that reads the environment and the user's home directory
pub struct EnvHomeConfigReader;

impl HomeConfigReader for EnvHomeConfigReader {
    fn home_override(&self) -> Option<String> {
        std::env::var(HOME_ENV).ok().filter(|v| !v.trim().is_empty())
    }

    fn user_home(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// Fix the process-wide template home.
///
/// Registering the same path twice is allowed; registering a different path
/// once the home is fixed is a configuration error.
pub fn register_home(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_path_buf();
    let registered = HOME.get_or_init(|| {
        info!(home = %path.display(), "Registered template home");
        path.clone()
    });

    if *registered != path {
        return Err(Error::config(format!(
            "template home already set to {}, cannot change it to {}",
            registered.display(),
            path.display()
        )));
    }
    Ok(())
}

/// The process-wide template home, resolving the default on first use
pub fn template_home() -> Result<PathBuf> {
    HOME.get_or_try_init(|| resolve_default_home(&EnvHomeConfigReader))
        .cloned()
}

/// Resolve the home when nothing was registered
pub fn resolve_default_home(reader: &dyn HomeConfigReader) -> Result<PathBuf> {
    if let Some(dir) = reader.home_override() {
        debug!(home = %dir, "Using template home from {}", HOME_ENV);
        return Ok(PathBuf::from(dir));
    }

    let user_home = reader.user_home().ok_or_else(|| {
        Error::config(format!(
            "cannot determine the user's home directory; pass --home or set {HOME_ENV}"
        ))
    })?;
    Ok(user_home.join(DEFAULT_HOME_DIR))
}

#[cfg(test)]
pub struct MockHomeConfigReader {
    pub home_override: Option<String>,
    pub user_home: Option<PathBuf>,
}

#[cfg(test)]
impl HomeConfigReader for MockHomeConfigReader {
    fn home_override(&self) -> Option<String> {
        self.home_override.clone()
    }

    fn user_home(&self) -> Option<PathBuf> {
        self.user_home.clone()
    }
}
