//! Write rules for generated files.

use std::path::Path;

use crate::core::error::{Error, Result};

/// How to handle a destination that already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    /// Always overwrite (scaffolding regenerated from the specification)
    Always,
    /// Only create if the file doesn't exist (business logic the user edits)
    IfMissing,
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File was skipped (already exists)
    Skipped,
}

/// Write `content` to `path`, creating missing parent directories
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| Error::io(path, e))
}
