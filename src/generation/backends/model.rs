//! SQL model backend: one model per table plus shared error variables.

use serde_json::json;

use crate::core::error::{Error, Result};
use crate::core::naming::{to_camel_case, untitle};
use crate::generation::pipeline::{Backend, GenerationPipeline};
use crate::generation::target::GenerationTarget;
use crate::render::RenderContext;
use crate::spec::{ModelSpec, Table};
use crate::templates::{Category, TemplateKey};

pub struct ModelBackend<'a> {
    spec: &'a ModelSpec,
}

impl<'a> ModelBackend<'a> {
    pub fn new(spec: &'a ModelSpec) -> Self {
        Self { spec }
    }

    /// The import block, rendered from the cached or uncached import template
    fn imports(&self, pipeline: &GenerationPipeline, table: &Table, node: &str) -> Result<String> {
        let name = if self.spec.cache {
            "import.tpl"
        } else {
            "import-no-cache.tpl"
        };
        pipeline.render_fragment(
            &TemplateKey::new(Category::Model, name),
            &RenderContext::new().with("time", table.uses_time()),
            node,
        )
    }

    fn table_target(&self, pipeline: &GenerationPipeline, table: &Table) -> Result<GenerationTarget> {
        let node = format!("table {}", table.name);
        let upper = to_camel_case(&table.name);
        let fields: Vec<_> = table
            .fields
            .iter()
            .map(|field| {
                json!({
                    "name": to_camel_case(&field.name),
                    "type_name": field.type_name.trim(),
                    "column": field.name,
                    "comment": field.comment.as_deref().map(str::trim).unwrap_or_default(),
                })
            })
            .collect();

        let context = RenderContext::new()
            .with("pkg", self.spec.package.as_str())
            .with("imports", self.imports(pipeline, table, &node)?)
            .with("table", table.name.as_str())
            .with("upper_table", upper.as_str())
            .with("lower_table", untitle(&upper))
            .with("fields", fields)
            .with("with_cache", self.spec.cache);

        Ok(GenerationTarget::new(
            TemplateKey::new(Category::Model, "model.tpl"),
            "",
            pipeline.file_name(&format!("{}_model", table.name), ".go"),
            context,
            node,
        ))
    }
}

impl Backend for ModelBackend<'_> {
    fn name(&self) -> &'static str {
        "model"
    }

    fn category(&self) -> Category {
        Category::Model
    }

    fn plan(&self, pipeline: &GenerationPipeline) -> Result<Vec<GenerationTarget>> {
        if self.spec.tables.is_empty() {
            return Err(Error::config("no tables to generate models for"));
        }

        let mut targets = self
            .spec
            .tables
            .iter()
            .map(|table| self.table_target(pipeline, table))
            .collect::<Result<Vec<_>>>()?;

        targets.push(
            GenerationTarget::new(
                TemplateKey::new(Category::Model, "vars.tpl"),
                "",
                pipeline.file_name("vars", ".go"),
                RenderContext::new().with("pkg", self.spec.package.as_str()),
                format!("package {}", self.spec.package),
            )
            .if_missing(),
        );
        Ok(targets)
    }
}
