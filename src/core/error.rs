//! Error handling for the svcgen generator.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for the
//! `Display` implementations and keeps enough structure on each variant for
//! callers to tell template problems apart from filesystem or configuration ones.
//!
//! # Examples
//!
//! ```
//! use svcgen::core::error::{Error, Result};
//!
//! fn needs_style(style: Option<&str>) -> Result<&str> {
//!     style.ok_or_else(|| Error::config("missing --style"))
//! }
//!
//! assert!(needs_style(None).is_err());
//! ```

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::templates::Category;

/// Result type for svcgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for svcgen operations
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or missing required parameter
    #[error("Configuration error: {0}")]
    Config(String),

    /// Template text could not be compiled
    #[error("Template syntax error in '{template}': {message}")]
    TemplateSyntax { template: String, message: String },

    /// The render context did not supply a variable the template needs
    #[error("Missing context key '{key}' while rendering '{template}'")]
    MissingContextKey { template: String, key: String },

    /// Neither an override nor a builtin exists for the key
    #[error("Unknown template: {category}/{name}")]
    UnknownTemplate { category: String, name: String },

    /// Filesystem read/write failure
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed version string. Comparisons fail closed on this error.
    #[error("Invalid version string: {0}")]
    VersionParse(String),

    /// Naming style not expressible with the go/zero markers
    #[error("Invalid naming style '{0}', expected a combination of 'go' and 'zero' such as go_zero")]
    InvalidStyle(String),

    /// External formatter rejected the rendered output
    #[error("Formatter failed for {}: {message}", path.display())]
    Format { path: PathBuf, message: String },

    /// Any other template engine failure during execution
    #[error("Failed to render '{template}': {message}")]
    Render { template: String, message: String },

    /// Two targets of one run resolved to the same file
    #[error("Duplicate output path in one generation run: {}", .0.display())]
    DuplicatePath(PathBuf),

    /// Specification document could not be read or parsed
    #[error("Failed to load specification {}: {message}", path.display())]
    SpecLoad { path: PathBuf, message: String },

    /// Failure of one generation step, annotated with what was being generated.
    /// `template` is empty when the step failed before any template was chosen.
    #[error("{category} generation failed for {node}{}: {source}", template_suffix(.template))]
    Generation {
        category: Category,
        template: String,
        node: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Attach a path to an I/O error
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wrap an error with the category, template and specification node it came from
    pub fn generation(
        category: Category,
        template: impl Into<String>,
        node: impl Into<String>,
        source: Error,
    ) -> Self {
        Self::Generation {
            category,
            template: template.into(),
            node: node.into(),
            source: Box::new(source),
        }
    }

    /// The innermost error, skipping `Generation` wrappers
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::Generation { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

fn template_suffix(template: &str) -> String {
    if template.is_empty() {
        String::new()
    } else {
        format!(" (template {template})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_config_creation() {
        let error = Error::config("missing --dir");
        assert!(matches!(error, Error::Config(_)));
        assert_eq!(error.to_string(), "Configuration error: missing --dir");
    }

    #[test]
    fn test_io_error_mentions_path() {
        let error = Error::io(
            "/tmp/out/handler.go",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = error.to_string();
        assert!(message.contains("/tmp/out/handler.go"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_generation_error_carries_diagnostics() {
        let inner = Error::MissingContextKey {
            template: "api/handler.tpl".to_string(),
            key: "pkg_name".to_string(),
        };
        let error = Error::generation(Category::Api, "handler.tpl", "route GET /ping", inner);

        let message = error.to_string();
        assert!(message.starts_with("api generation failed for route GET /ping"));
        assert!(message.contains("handler.tpl"));
        assert!(message.contains("pkg_name"));
        assert!(matches!(
            error.root_cause(),
            Error::MissingContextKey { key, .. } if key == "pkg_name"
        ));
    }

    #[test]
    fn test_generation_error_without_template() {
        let error = Error::generation(
            Category::Mongo,
            "",
            "mongo specification",
            Error::config("missing type"),
        );
        assert_eq!(
            error.to_string(),
            "mongo generation failed for mongo specification: Configuration error: missing type"
        );
    }

    #[test]
    fn test_invalid_style_message() {
        let error = Error::InvalidStyle("foo".to_string());
        assert!(error.to_string().contains("'foo'"));
    }
}
