//! On-disk template overrides.

use std::path::{Path, PathBuf};

use tracing::trace;

use super::{TemplateKey, TemplateStore};
use crate::core::error::{Error, Result};

/// Store backed by `{root}/{category}/{name}` files
#[derive(Debug, Clone)]
pub struct OverlayStore {
    root: PathBuf,
}

impl OverlayStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the override for `key` lives, whether or not it exists
    pub fn path_for(&self, key: &TemplateKey) -> PathBuf {
        self.root.join(key.category.as_str()).join(&key.name)
    }

    pub fn contains(&self, key: &TemplateKey) -> bool {
        self.path_for(key).is_file()
    }
}

impl TemplateStore for OverlayStore {
    fn name(&self) -> &'static str {
        "overlay"
    }

    fn get(&self, key: &TemplateKey) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.is_file() {
            trace!(path = %path.display(), "No override on disk");
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| Error::io(&path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::Category;
    use tempfile::TempDir;

    #[test]
    fn test_reads_existing_override() {
        let temp_dir = TempDir::new().unwrap();
        let store = OverlayStore::new(temp_dir.path());
        let key = TemplateKey::new(Category::Api, "handler.tpl");

        assert!(store.get(&key).unwrap().is_none());

        std::fs::create_dir_all(temp_dir.path().join("api")).unwrap();
        std::fs::write(store.path_for(&key), "custom").unwrap();

        assert!(store.contains(&key));
        assert_eq!(store.get(&key).unwrap().as_deref(), Some("custom"));
    }

    #[test]
    fn test_directory_in_place_of_file_is_not_an_override() {
        let temp_dir = TempDir::new().unwrap();
        let store = OverlayStore::new(temp_dir.path());
        let key = TemplateKey::new(Category::Rpc, "etc.tpl");
        std::fs::create_dir_all(store.path_for(&key)).unwrap();

        assert!(store.get(&key).unwrap().is_none());
    }
}
