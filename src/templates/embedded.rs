//! Builtin templates embedded in the binary at compile time.
//!
//! The module uses the `rust-embed` crate to include every file under the
//! crate's `templates/` directory. The directory layout mirrors the overlay
//! layout, `{category}/{name}`, so a builtin and its override share one
//! relative path.

use rust_embed::RustEmbed;

use super::{TemplateKey, TemplateStore};
use crate::core::error::Result;

/// Container for all builtin templates embedded at compile time.
#[derive(RustEmbed)]
#[folder = "templates/"]
struct BuiltinAssets;

/// Read-only store of the templates shipped with this build
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinStore;

impl BuiltinStore {
    pub fn new() -> Self {
        Self
    }

    /// Builtin text for a key, if the key is a known builtin
    pub fn text(&self, key: &TemplateKey) -> Option<String> {
        if !key.is_builtin() {
            return None;
        }
        BuiltinAssets::get(&key.relative_path())
            .map(|file| String::from_utf8_lossy(file.data.as_ref()).into_owned())
    }
}

impl TemplateStore for BuiltinStore {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn get(&self, key: &TemplateKey) -> Result<Option<String>> {
        Ok(self.text(key))
    }
}
