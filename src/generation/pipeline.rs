//! The shared generation driver.
//!
//! A [`Backend`] turns a specification into a list of [`GenerationTarget`]s.
//! [`GenerationPipeline::run`] then loads each target's template, renders it
//! and saves it under the output directory. Targets are processed in plan
//! order and the first failure aborts the run; files already written stay in
//! place. Every output path is checked before the first write: it must stay
//! under the output directory and be unique within the run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::target::GenerationTarget;
use crate::core::error::{Error, Result};
use crate::core::naming::NamingStyle;
use crate::core::version::VersionGate;
use crate::render::{CompiledTemplate, RenderContext, RenderEngine, WriteResult};
use crate::templates::{Category, TemplateKey, TemplateRepository};

/// Plans the files for one generation target
pub trait Backend {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Category whose templates this backend renders
    fn category(&self) -> Category;

    /// Every file this backend produces, in specification order.
    ///
    /// Nested fragments may be rendered while planning through
    /// [`GenerationPipeline::render_fragment`].
    fn plan(&self, pipeline: &GenerationPipeline) -> Result<Vec<GenerationTarget>>;
}

/// Outcome of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

impl GenerationReport {
    /// Every path the run touched or would have touched, in plan order
    pub fn total(&self) -> usize {
        self.written.len() + self.skipped.len()
    }
}

/// Loads, renders, formats and saves the targets a backend plans
pub struct GenerationPipeline {
    repository: TemplateRepository,
    engine: RenderEngine,
    style: NamingStyle,
    gate: VersionGate,
}

impl GenerationPipeline {
    pub fn new(repository: TemplateRepository) -> Self {
        Self {
            repository,
            engine: RenderEngine::new(),
            style: NamingStyle::default(),
            gate: VersionGate::default(),
        }
    }

    pub fn with_engine(mut self, engine: RenderEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_style(mut self, style: NamingStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_gate(mut self, gate: VersionGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn repository(&self) -> &TemplateRepository {
        &self.repository
    }

    pub fn style(&self) -> &NamingStyle {
        &self.style
    }

    pub fn gate(&self) -> &VersionGate {
        &self.gate
    }

    /// File name for `identifier` in the configured style, plus `extension`
    pub fn file_name(&self, identifier: &str, extension: &str) -> String {
        format!("{}{extension}", self.style.format(identifier))
    }

    /// Resolve and compile the effective template for `key`
    pub fn compile(&self, key: &TemplateKey) -> Result<CompiledTemplate> {
        let record = self.repository.load_template(key)?;
        debug!(template = %key, origin = %record.origin, "Compiling template");
        Ok(self
            .engine
            .compile(&key.to_string(), &record.text)?
            .with_required(key.required_variables()))
    }

    /// Render a template to a string instead of a file, for nested fragments.
    ///
    /// Errors are attributed to `node`.
    pub fn render_fragment(
        &self,
        key: &TemplateKey,
        context: &RenderContext,
        node: &str,
    ) -> Result<String> {
        self.compile(key)
            .and_then(|template| self.engine.execute(&template, context))
            .map_err(|e| Error::generation(key.category, &key.name, node, e))
    }

    /// Plan and write every target of `backend` under `output_dir`
    pub fn run(&self, backend: &dyn Backend, output_dir: &Path) -> Result<GenerationReport> {
        info!(
            backend = backend.name(),
            dir = %output_dir.display(),
            style = %self.style,
            version = self.gate.current(),
            "Starting generation"
        );

        let targets = backend.plan(self).map_err(|e| match e {
            e @ Error::Generation { .. } => e,
            e => Error::generation(
                backend.category(),
                "",
                format!("{} specification", backend.name()),
                e,
            ),
        })?;

        let mut seen = HashSet::with_capacity(targets.len());
        let mut planned = Vec::with_capacity(targets.len());
        for target in &targets {
            let wrap = |e| {
                Error::generation(target.category(), &target.template.name, &target.node, e)
            };
            let path = output_dir.join(target.relative_path().map_err(wrap)?);
            if !seen.insert(path.clone()) {
                return Err(wrap(Error::DuplicatePath(path)));
            }
            planned.push((target, path));
        }

        let mut report = GenerationReport::default();
        for (target, dest) in planned {
            let result = self
                .compile(&target.template)
                .and_then(|template| {
                    self.engine
                        .save_to(&template, &target.context, &dest, target.overwrite)
                })
                .map_err(|e| {
                    Error::generation(target.category(), &target.template.name, &target.node, e)
                })?;

            match result {
                WriteResult::Written => report.written.push(dest),
                WriteResult::Skipped => report.skipped.push(dest),
            }
        }

        info!(
            backend = backend.name(),
            written = report.written.len(),
            skipped = report.skipped.len(),
            "Generation complete"
        );
        Ok(report)
    }
}
