//! One planned output file.

use std::path::{Component, PathBuf};

use crate::core::error::{Error, Result};
use crate::render::{Overwrite, RenderContext};
use crate::templates::{Category, TemplateKey};

/// Everything needed to produce one file
#[derive(Debug, Clone)]
pub struct GenerationTarget {
    /// Slash-separated directory relative to the output root, empty for the root
    pub subdir: String,
    pub filename: String,
    pub template: TemplateKey,
    pub context: RenderContext,
    pub overwrite: Overwrite,
    /// Specification node the file is generated for, used in diagnostics
    pub node: String,
}

impl GenerationTarget {
    /// A target that is rewritten on every run
    pub fn new(
        template: TemplateKey,
        subdir: impl Into<String>,
        filename: impl Into<String>,
        context: RenderContext,
        node: impl Into<String>,
    ) -> Self {
        Self {
            subdir: subdir.into(),
            filename: filename.into(),
            template,
            context,
            overwrite: Overwrite::Always,
            node: node.into(),
        }
    }

    /// Only write the file when it does not exist yet
    pub fn if_missing(mut self) -> Self {
        self.overwrite = Overwrite::IfMissing;
        self
    }

    pub fn category(&self) -> Category {
        self.template.category
    }

    /// Path relative to the output root.
    ///
    /// Every subdirectory segment and the file name must stay inside the
    /// output root: `..`, `.`, backslashes, drive prefixes and a file name
    /// containing a separator are `Config` errors naming the node.
    pub fn relative_path(&self) -> Result<PathBuf> {
        let escapes = |what: &str| {
            Error::config(format!(
                "{}: {what} '{}' would be written outside the output directory",
                self.node,
                self.display_path()
            ))
        };

        let mut path = PathBuf::new();
        for segment in self.subdir.split('/').filter(|s| !s.is_empty()) {
            if segment == ".." || segment == "." || segment.contains('\\') {
                return Err(escapes("directory"));
            }
            path.push(segment);
        }

        let filename = self.filename.as_str();
        if filename.is_empty()
            || filename == ".."
            || filename == "."
            || filename.contains(['/', '\\'])
        {
            return Err(escapes("file"));
        }
        path.push(filename);

        if !path.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(escapes("path"));
        }
        Ok(path)
    }

    fn display_path(&self) -> String {
        match self.subdir.trim_matches('/') {
            "" => self.filename.clone(),
            subdir => format!("{subdir}/{}", self.filename),
        }
    }
}
