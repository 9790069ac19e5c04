//! Mongo model backend: one model per document type plus shared errors.

use crate::core::error::{Error, Result};
use crate::core::naming::{title, untitle};
use crate::generation::pipeline::{Backend, GenerationPipeline};
use crate::generation::target::GenerationTarget;
use crate::render::RenderContext;
use crate::spec::MongoSpec;
use crate::templates::{Category, TemplateKey};

pub struct MongoBackend<'a> {
    spec: &'a MongoSpec,
}

impl<'a> MongoBackend<'a> {
    pub fn new(spec: &'a MongoSpec) -> Self {
        Self { spec }
    }
}

impl Backend for MongoBackend<'_> {
    fn name(&self) -> &'static str {
        "mongo"
    }

    fn category(&self) -> Category {
        Category::Mongo
    }

    fn plan(&self, pipeline: &GenerationPipeline) -> Result<Vec<GenerationTarget>> {
        let types: Vec<&str> = self
            .spec
            .types
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if types.is_empty() {
            return Err(Error::config("missing type"));
        }

        let mut targets: Vec<_> = types
            .into_iter()
            .map(|raw| {
                let type_name = title(raw);
                let context = RenderContext::new()
                    .with("type_name", type_name.as_str())
                    .with("lower_type", untitle(&type_name))
                    .with("cache", self.spec.cache);
                GenerationTarget::new(
                    TemplateKey::new(Category::Mongo, "model.tpl"),
                    "",
                    pipeline.file_name(&format!("{type_name}_model"), ".go"),
                    context,
                    format!("type {type_name}"),
                )
            })
            .collect();

        targets.push(
            GenerationTarget::new(
                TemplateKey::new(Category::Mongo, "error.tpl"),
                "",
                pipeline.file_name("error", ".go"),
                RenderContext::new(),
                "errors",
            )
            .if_missing(),
        );
        Ok(targets)
    }
}
