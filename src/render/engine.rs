//! Tera-based template engine.
//!
//! Every template is compiled into its own [`tera::Tera`] instance with
//! autoescaping disabled, since the output is source code rather than HTML.
//!
//! Tera treats an undefined variable inside `{% if %}` as false. To keep a
//! missing variable a hard error, a compiled template may declare the
//! variables it requires, and the names its `if` conditions and `for` loops
//! read are collected at compile time; both are checked before rendering.
//! Undefined variables that tera itself reports during rendering map to the
//! same [`Error::MissingContextKey`].

use std::error::Error as StdError;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tera::Tera;
use tracing::{debug, trace};

use super::context::RenderContext;
use super::formatter::Formatter;
use super::output::{Overwrite, WriteResult, write_file};
use super::variables::condition_variables;
use crate::core::error::{Error, Result};

static MISSING_VARIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Variable `([^`]+)` not found in context").expect("valid regex literal")
});

/// A parsed template ready to execute
pub struct CompiledTemplate {
    name: String,
    tera: Tera,
    required: Vec<String>,
    conditions: Vec<String>,
}

impl CompiledTemplate {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare variables the context must supply, checked in the given order
    pub fn with_required(mut self, required: &[&str]) -> Self {
        self.required = required.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Context names read by `if` conditions and `for` containers
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }
}

impl std::fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("conditions", &self.conditions)
            .finish()
    }
}

/// Compiles, executes and saves templates
#[derive(Default)]
pub struct RenderEngine {
    formatter: Option<Box<dyn Formatter>>,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every saved file through `formatter` before writing it
    pub fn with_formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Parse template text.
    ///
    /// Fails with [`Error::TemplateSyntax`] on malformed directives.
    pub fn compile(&self, name: &str, text: &str) -> Result<CompiledTemplate> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        let syntax_error = |e: tera::Error| Error::TemplateSyntax {
            template: name.to_string(),
            message: error_chain(&e),
        };
        tera.add_raw_template(name, text).map_err(syntax_error)?;
        let conditions: Vec<String> = tera
            .get_template(name)
            .map(|parsed| condition_variables(&parsed.ast).into_iter().collect())
            .map_err(syntax_error)?;

        trace!(template = name, ?conditions, "Compiled template");
        Ok(CompiledTemplate {
            name: name.to_string(),
            tera,
            required: Vec::new(),
            conditions,
        })
    }

    /// Render a compiled template against `context`.
    pub fn execute(&self, template: &CompiledTemplate, context: &RenderContext) -> Result<String> {
        let mut expected = template.required.iter().chain(&template.conditions);
        if let Some(key) = expected.find(|key| !context.contains(key)) {
            return Err(Error::MissingContextKey {
                template: template.name.clone(),
                key: key.clone(),
            });
        }

        template
            .tera
            .render(&template.name, &context.to_tera())
            .map_err(|e| render_error(&template.name, &e))
    }

    /// Execute, format and write to `dest` according to `overwrite`.
    ///
    /// With [`Overwrite::IfMissing`] an existing destination is left untouched
    /// and nothing is rendered.
    pub fn save_to(
        &self,
        template: &CompiledTemplate,
        context: &RenderContext,
        dest: &Path,
        overwrite: Overwrite,
    ) -> Result<WriteResult> {
        if overwrite == Overwrite::IfMissing && dest.exists() {
            debug!(path = %dest.display(), "File exists, skipping");
            return Ok(WriteResult::Skipped);
        }

        let mut content = self.execute(template, context)?;
        if let Some(formatter) = &self.formatter {
            content = formatter.format(dest, content)?;
        }

        write_file(dest, &content)?;
        debug!(path = %dest.display(), template = %template.name, "Wrote file");
        Ok(WriteResult::Written)
    }
}

fn render_error(template: &str, error: &tera::Error) -> Error {
    let message = error_chain(error);
    match MISSING_VARIABLE.captures(&message) {
        Some(caps) => Error::MissingContextKey {
            template: template.to_string(),
            key: caps[1].to_string(),
        },
        None => Error::Render {
            template: template.to_string(),
            message,
        },
    }
}

/// Tera keeps the useful detail in the source chain, so flatten it
fn error_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
