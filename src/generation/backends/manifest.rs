//! Deployment scaffolding: a Dockerfile and a Kubernetes manifest.

use serde_json::Value as JsonValue;

use crate::core::error::Result;
use crate::generation::pipeline::{Backend, GenerationPipeline};
use crate::generation::target::GenerationTarget;
use crate::render::RenderContext;
use crate::spec::ManifestSpec;
use crate::templates::{Category, TemplateKey};

pub struct ManifestBackend<'a> {
    spec: &'a ManifestSpec,
}

impl<'a> ManifestBackend<'a> {
    pub fn new(spec: &'a ManifestSpec) -> Self {
        Self { spec }
    }

    fn port(&self) -> JsonValue {
        self.spec.port.map(JsonValue::from).unwrap_or(JsonValue::Null)
    }
}

impl Backend for ManifestBackend<'_> {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn category(&self) -> Category {
        Category::Kube
    }

    fn plan(&self, pipeline: &GenerationPipeline) -> Result<Vec<GenerationTarget>> {
        let spec = self.spec;
        let node = format!("service {}", spec.name);

        let docker = RenderContext::new()
            .with("go_version", spec.go_version.as_str())
            .with("exe_file", spec.name.as_str())
            .with("go_main", spec.main.as_str())
            .with("has_port", spec.port.is_some())
            .with("port", self.port());

        let kube = RenderContext::new()
            .with("name", spec.name.as_str())
            .with("namespace", spec.namespace.as_str())
            .with("replicas", spec.replicas)
            .with("image", spec.image.as_str())
            .with("port", self.port());

        Ok(vec![
            GenerationTarget::new(
                TemplateKey::new(Category::Docker, "docker.tpl"),
                "",
                "Dockerfile",
                docker,
                node.clone(),
            )
            .if_missing(),
            GenerationTarget::new(
                TemplateKey::new(Category::Kube, "deployment.tpl"),
                "",
                pipeline.file_name(&spec.name, ".yaml"),
                kube,
                node,
            ),
        ])
    }
}
