//! RPC backend: a logic file per method plus the service configuration.

use crate::core::error::Result;
use crate::core::naming::to_camel_case;
use crate::generation::imports::{ImportSet, join_package};
use crate::generation::pipeline::{Backend, GenerationPipeline};
use crate::generation::target::GenerationTarget;
use crate::render::RenderContext;
use crate::spec::{RpcMethod, RpcSpec};
use crate::templates::{Category, TemplateKey};

pub const LOGIC_DIR: &str = "internal/logic";
pub const CONTEXT_DIR: &str = "internal/svc";
pub const ETC_DIR: &str = "etc";

pub struct RpcBackend<'a> {
    spec: &'a RpcSpec,
}

impl<'a> RpcBackend<'a> {
    pub fn new(spec: &'a RpcSpec) -> Self {
        Self { spec }
    }

    fn logic_target(
        &self,
        pipeline: &GenerationPipeline,
        method: &RpcMethod,
    ) -> Result<GenerationTarget> {
        let service = &self.spec.service;
        let pb = service.pb_name();
        let logic_name = to_camel_case(&format!("{}_logic", method.name));
        let node = format!("rpc {}", method.name);
        let comment = doc_comment(method.doc.as_deref());
        let has_reply = !method.streams_request && !method.streams_response;

        let function_context = RenderContext::new()
            .with("has_comment", !comment.is_empty())
            .with("comment", comment)
            .with("logic_name", logic_name.as_str())
            .with("method", to_camel_case(&method.name))
            .with("has_req", !method.streams_request)
            .with("request", format!("*{pb}.{}", to_camel_case(&method.request_type)))
            .with("stream", method.streams_request || method.streams_response)
            .with(
                "stream_body",
                format!(
                    "{pb}.{}_{}Server",
                    to_camel_case(&service.name),
                    to_camel_case(&method.name)
                ),
            )
            .with("has_reply", has_reply)
            .with("response", format!("*{pb}.{}", to_camel_case(&method.response_type)))
            .with("response_type", format!("{pb}.{}", to_camel_case(&method.response_type)));

        let functions = pipeline.render_fragment(
            &TemplateKey::new(Category::Rpc, "logic-func.tpl"),
            &function_context,
            &node,
        )?;

        let mut imports = ImportSet::new();
        imports
            .add(join_package(&self.spec.module, CONTEXT_DIR))
            .add(service.go_package.trim());

        let context = RenderContext::new()
            .with("imports", imports.quoted())
            .with("logic_name", logic_name.as_str())
            .with("functions", functions);

        Ok(GenerationTarget::new(
            TemplateKey::new(Category::Rpc, "logic.tpl"),
            LOGIC_DIR,
            pipeline.file_name(&format!("{}_logic", method.name), ".go"),
            context,
            node,
        )
        .if_missing())
    }

    fn etc_target(&self, pipeline: &GenerationPipeline) -> GenerationTarget {
        let name = &self.spec.service.name;
        GenerationTarget::new(
            TemplateKey::new(Category::Rpc, "etc.tpl"),
            ETC_DIR,
            pipeline.file_name(name, ".yaml"),
            RenderContext::new().with("service_name", etc_service_name(name)),
            format!("service {name}"),
        )
    }
}

impl Backend for RpcBackend<'_> {
    fn name(&self) -> &'static str {
        "rpc"
    }

    fn category(&self) -> Category {
        Category::Rpc
    }

    fn plan(&self, pipeline: &GenerationPipeline) -> Result<Vec<GenerationTarget>> {
        let mut targets = self
            .spec
            .service
            .methods
            .iter()
            .map(|method| self.logic_target(pipeline, method))
            .collect::<Result<Vec<_>>>()?;
        targets.push(self.etc_target(pipeline));
        Ok(targets)
    }
}

/// Lowercased service name with any `service` suffix removed:
/// `greet-service` becomes `greet`
pub fn etc_service_name(name: &str) -> String {
    let name = to_camel_case(name).to_lowercase();
    match name.find("service") {
        Some(i) if i > 0 => name[..i].trim_end_matches('-').to_string(),
        _ => name,
    }
}

/// Doc text as Go `//` comment lines
fn doc_comment(doc: Option<&str>) -> String {
    doc.map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| {
            d.lines()
                .map(|line| format!("// {}", line.trim()))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}
