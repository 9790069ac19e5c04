//! Template lookup and lifecycle.
//!
//! Lookup walks a fixed chain: the overlay under
//! `{home}/{tool_version}/` first, then the builtin store. A custom file
//! therefore always shadows the builtin with the same key.
//!
//! Lifecycle operations only ever touch the overlay:
//!
//! | operation | effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `init`    | writes builtins that are missing on disk, never overwrites |
//! | `clean`   | removes category directories                               |
//! | `update`  | overwrites every key of a category with the builtin        |
//! | `revert`  | overwrites one key with the builtin                        |
//!
//! `update` discards local edits without merging.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::embedded::BuiltinStore;
use super::home::template_home;
use super::overlay::OverlayStore;
use super::{Category, TemplateKey, TemplateStore};
use crate::core::error::{Error, Result};
use crate::core::version::TOOL_VERSION;

/// Where the effective text of a template comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateOrigin {
    Builtin,
    Custom,
}

impl fmt::Display for TemplateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => f.write_str("builtin"),
            Self::Custom => f.write_str("custom"),
        }
    }
}

/// Resolved template text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRecord {
    pub key: TemplateKey,
    pub text: String,
    pub origin: TemplateOrigin,
}

/// One row of `list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateListing {
    pub category: Category,
    pub name: String,
    pub origin: TemplateOrigin,
    pub path: PathBuf,
}

/// Template repository rooted at one template home
#[derive(Debug, Clone)]
pub struct TemplateRepository {
    home: PathBuf,
    overlay: OverlayStore,
    builtin: BuiltinStore,
}

impl TemplateRepository {
    /// Repository whose overlay lives under `home/{tool_version}`
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let overlay = OverlayStore::new(home.join(TOOL_VERSION));
        Self {
            home,
            overlay,
            builtin: BuiltinStore::new(),
        }
    }

    /// Repository over the process-wide template home
    pub fn from_registered_home() -> Result<Self> {
        Ok(Self::new(template_home()?))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Versioned overlay root, `{home}/{tool_version}`
    pub fn overlay_root(&self) -> &Path {
        self.overlay.root()
    }

    /// Path of the override for a key
    pub fn overlay_path(&self, key: &TemplateKey) -> PathBuf {
        self.overlay.path_for(key)
    }

    /// Resolve a key through the overlay, then the builtin store.
    pub fn load_template(&self, key: &TemplateKey) -> Result<TemplateRecord> {
        let chain: [(&dyn TemplateStore, TemplateOrigin); 2] = [
            (&self.overlay, TemplateOrigin::Custom),
            (&self.builtin, TemplateOrigin::Builtin),
        ];

        for (store, origin) in chain {
            if let Some(text) = store.get(key)? {
                debug!(template = %key, store = store.name(), "Resolved template");
                return Ok(TemplateRecord {
                    key: key.clone(),
                    text,
                    origin,
                });
            }
        }

        Err(unknown(key))
    }

    /// Write builtin content for every key of `categories` that is not on disk.
    ///
    /// Returns the number of files written.
    pub fn init(&self, categories: &[Category]) -> Result<usize> {
        let mut written = 0;
        for category in categories {
            for key in category.keys() {
                if self.overlay.contains(&key) {
                    debug!(template = %key, "Template already initialized, keeping it");
                    continue;
                }
                self.write_builtin(&key)?;
                written += 1;
            }
        }

        info!(
            written,
            root = %self.overlay.root().display(),
            "Initialized templates"
        );
        Ok(written)
    }

    /// Remove the overlay directory of one category, or of all of them.
    ///
    /// Missing directories are not an error.
    pub fn clean(&self, category: Option<Category>) -> Result<()> {
        let categories = match category {
            Some(category) => vec![category],
            None => Category::ALL.to_vec(),
        };

        for category in categories {
            let dir = self.overlay.root().join(category.as_str());
            if !dir.exists() {
                continue;
            }
            std::fs::remove_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
            info!(category = %category, dir = %dir.display(), "Removed custom templates");
        }
        Ok(())
    }

    /// Overwrite every key of `category` with builtin content.
    ///
    /// Local modifications are lost. Returns the number of files written.
    pub fn update(&self, category: Category) -> Result<usize> {
        let mut written = 0;
        for key in category.keys() {
            if self.overlay.contains(&key) {
                warn!(template = %key, "Overwriting custom template with builtin");
            }
            self.write_builtin(&key)?;
            written += 1;
        }
        info!(category = %category, written, "Updated templates");
        Ok(written)
    }

    /// Restore one key to its builtin content.
    ///
    /// Returns `false` when the file on disk already matched the builtin and
    /// nothing was written.
    pub fn revert(&self, category: Category, name: &str) -> Result<bool> {
        let key = TemplateKey::new(category, name);
        let builtin = self.builtin.text(&key).ok_or_else(|| unknown(&key))?;

        if self.overlay.get(&key)?.as_deref() == Some(builtin.as_str()) {
            debug!(template = %key, "Template already matches builtin");
            return Ok(false);
        }

        self.write_text(&key, &builtin)?;
        info!(template = %key, "Reverted template to builtin");
        Ok(true)
    }

    /// Every builtin key of one or all categories with its effective origin
    pub fn list(&self, category: Option<Category>) -> Vec<TemplateListing> {
        let categories = match category {
            Some(category) => vec![category],
            None => Category::ALL.to_vec(),
        };

        categories
            .into_iter()
            .flat_map(|category| category.keys())
            .map(|key| {
                let path = self.overlay.path_for(&key);
                let origin = if path.is_file() {
                    TemplateOrigin::Custom
                } else {
                    TemplateOrigin::Builtin
                };
                TemplateListing {
                    category: key.category,
                    name: key.name,
                    origin,
                    path,
                }
            })
            .collect()
    }

    fn write_builtin(&self, key: &TemplateKey) -> Result<()> {
        let text = self.builtin.text(key).ok_or_else(|| unknown(key))?;
        self.write_text(key, &text)
    }

    fn write_text(&self, key: &TemplateKey, text: &str) -> Result<()> {
        let path = self.overlay.path_for(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        std::fs::write(&path, text).map_err(|e| Error::io(&path, e))?;
        debug!(template = %key, path = %path.display(), "Wrote template");
        Ok(())
    }
}

fn unknown(key: &TemplateKey) -> Error {
    Error::UnknownTemplate {
        category: key.category.to_string(),
        name: key.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repository() -> (TempDir, TemplateRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = TemplateRepository::new(temp_dir.path());
        (temp_dir, repo)
    }

    #[test]
    fn test_overlay_root_is_versioned() {
        let (temp_dir, repo) = repository();
        assert_eq!(repo.overlay_root(), temp_dir.path().join(TOOL_VERSION));
        assert_eq!(
            repo.overlay_path(&TemplateKey::new(Category::Api, "handler.tpl")),
            temp_dir
                .path()
                .join(TOOL_VERSION)
                .join("api")
                .join("handler.tpl")
        );
    }

    #[test]
    fn test_load_falls_back_to_builtin() {
        let (_temp_dir, repo) = repository();
        let record = repo
            .load_template(&TemplateKey::new(Category::Rpc, "etc.tpl"))
            .unwrap();
        assert_eq!(record.origin, TemplateOrigin::Builtin);
        assert!(record.text.contains("service_name"));
    }

    #[test]
    fn test_custom_shadows_builtin() {
        let (_temp_dir, repo) = repository();
        let key = TemplateKey::new(Category::Api, "handler.tpl");
        repo.write_text(&key, "custom handler").unwrap();

        let record = repo.load_template(&key).unwrap();
        assert_eq!(record.origin, TemplateOrigin::Custom);
        assert_eq!(record.text, "custom handler");
    }

    #[test]
    fn test_custom_only_key_resolves_from_overlay() {
        let (_temp_dir, repo) = repository();
        let key = TemplateKey::new(Category::Api, "extra.tpl");
        assert!(matches!(
            repo.load_template(&key),
            Err(Error::UnknownTemplate { name, .. }) if name == "extra.tpl"
        ));

        repo.write_text(&key, "extra").unwrap();
        assert_eq!(repo.load_template(&key).unwrap().origin, TemplateOrigin::Custom);
    }

    #[test]
    fn test_init_never_overwrites() {
        let (_temp_dir, repo) = repository();
        let key = TemplateKey::new(Category::Api, "logic.tpl");
        repo.write_text(&key, "mine").unwrap();

        let written = repo.init(&[Category::Api]).unwrap();
        assert_eq!(written, Category::Api.builtin_templates().len() - 1);
        assert_eq!(repo.load_template(&key).unwrap().text, "mine");

        assert_eq!(repo.init(&[Category::Api]).unwrap(), 0);
    }

    #[test]
    fn test_init_reports_unwritable_home() {
        let (temp_dir, repo) = repository();
        std::fs::write(temp_dir.path().join(TOOL_VERSION), "not a directory").unwrap();

        let err = repo.init(&[Category::Rpc]).unwrap_err();
        match err {
            Error::Io { path, .. } => assert!(path.starts_with(repo.overlay_root())),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_clean_is_idempotent() {
        let (_temp_dir, repo) = repository();
        repo.init(&Category::ALL).unwrap();

        repo.clean(Some(Category::Model)).unwrap();
        assert!(!repo.overlay_root().join("model").exists());
        assert!(repo.overlay_root().join("api").exists());

        repo.clean(None).unwrap();
        repo.clean(None).unwrap();
        assert!(!repo.overlay_root().join("api").exists());
    }

    #[test]
    fn test_update_discards_local_edits() {
        let (_temp_dir, repo) = repository();
        let key = TemplateKey::new(Category::Mongo, "error.tpl");
        repo.write_text(&key, "edited").unwrap();

        let written = repo.update(Category::Mongo).unwrap();
        assert_eq!(written, 2);

        let record = repo.load_template(&key).unwrap();
        assert_eq!(record.origin, TemplateOrigin::Custom);
        assert_eq!(Some(record.text), BuiltinStore::new().text(&key));
    }

    #[test]
    fn test_revert() {
        let (_temp_dir, repo) = repository();
        let key = TemplateKey::new(Category::Rpc, "etc.tpl");
        repo.write_text(&key, "edited").unwrap();

        assert!(repo.revert(Category::Rpc, "etc.tpl").unwrap());
        assert!(!repo.revert(Category::Rpc, "etc.tpl").unwrap());
        assert_eq!(
            Some(repo.load_template(&key).unwrap().text),
            BuiltinStore::new().text(&key)
        );
    }

    #[test]
    fn test_revert_unknown_key() {
        let (_temp_dir, repo) = repository();
        let err = repo.revert(Category::Api, "nope.tpl").unwrap_err();
        assert_eq!(err.to_string(), "Unknown template: api/nope.tpl");
        assert!(!repo.overlay_root().join("api").exists());
    }

    #[test]
    fn test_list_reports_effective_origin() {
        let (_temp_dir, repo) = repository();
        repo.write_text(&TemplateKey::new(Category::Docker, "docker.tpl"), "x")
            .unwrap();

        let all = repo.list(None);
        let expected: usize = Category::ALL
            .iter()
            .map(|c| c.builtin_templates().len())
            .sum();
        assert_eq!(all.len(), expected);

        let docker = repo.list(Some(Category::Docker));
        assert_eq!(docker.len(), 1);
        assert_eq!(docker[0].origin, TemplateOrigin::Custom);
        assert!(
            repo.list(Some(Category::Kube))
                .iter()
                .all(|l| l.origin == TemplateOrigin::Builtin)
        );
    }
}
