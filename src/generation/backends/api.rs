//! HTTP API backend: one handler and one logic file per route.

use crate::core::error::{Error, Result};
use crate::core::naming::title;
use crate::generation::annotation::{lookup, resolve_folder};
use crate::generation::imports::{ImportSet, join_package};
use crate::generation::pipeline::{Backend, GenerationPipeline};
use crate::generation::target::GenerationTarget;
use crate::render::RenderContext;
use crate::spec::{ApiSpec, Group, Route};
use crate::templates::{Category, TemplateKey};

pub const HANDLER_DIR: &str = "internal/handler";
pub const LOGIC_DIR: &str = "internal/logic";
pub const CONTEXT_DIR: &str = "internal/svc";
pub const TYPES_DIR: &str = "internal/types";

const TYPES_PACKAGE: &str = "types";
const HTTPX_IMPORT: &str = "github.com/zeromicro/go-zero/rest/httpx";
const LOGX_IMPORT: &str = "github.com/zeromicro/go-zero/core/logx";

const DEFAULT_TAG: &str = "Tag";
const DEFAULT_SUMMARY: &str = "Summary";
const DEFAULT_LOGIC_SUMMARY: &str = "Business logic";

pub struct ApiBackend<'a> {
    spec: &'a ApiSpec,
}

impl<'a> ApiBackend<'a> {
    pub fn new(spec: &'a ApiSpec) -> Self {
        Self { spec }
    }

    fn handler_target(
        &self,
        pipeline: &GenerationPipeline,
        group: &Group,
        route: &Route,
        base: &str,
    ) -> GenerationTarget {
        let chain = [&route.annotations, &group.annotations];
        let handler_dir = resolve_folder(HANDLER_DIR, &chain);
        let logic_dir = resolve_folder(LOGIC_DIR, &chain);
        let after_1_1_10 = pipeline.gate().after_1_1_10();
        let request_type = route.request_type_name().map(title);

        let mut imports = ImportSet::new();
        imports
            .add(join_package(&self.spec.module, &logic_dir))
            .add(join_package(&self.spec.module, CONTEXT_DIR));
        if request_type.is_some() {
            imports.add(join_package(&self.spec.module, TYPES_DIR));
        }
        if !after_1_1_10 {
            imports.add(HTTPX_IMPORT);
        }

        let handler_name = format!("{base}Handler");
        let context = RenderContext::new()
            .with("pkg_name", last_segment(&handler_dir))
            .with("imports", imports.quoted())
            .with("handler_name", handler_name.as_str())
            .with(
                "summary",
                lookup("summary", &[&route.annotations]).unwrap_or(DEFAULT_SUMMARY),
            )
            .with("tag", lookup("tag", &chain).unwrap_or(DEFAULT_TAG))
            .with("method", route.method.trim().to_lowercase())
            .with("path", route.path.trim())
            .with("has_security", has_security(group))
            .with("has_request", request_type.is_some())
            .with("request_type", request_type.unwrap_or_default())
            .with("logic_pkg", last_segment(&logic_dir))
            .with("logic_type", format!("{base}Logic"))
            .with("has_response", route.response_type_name().is_some())
            .with("call", base)
            .with("after_1_1_10", after_1_1_10);

        GenerationTarget::new(
            TemplateKey::new(Category::Api, "handler.tpl"),
            handler_dir,
            pipeline.file_name(&handler_name, ".go"),
            context,
            route.describe(),
        )
    }

    fn logic_target(
        &self,
        pipeline: &GenerationPipeline,
        group: &Group,
        route: &Route,
        base: &str,
    ) -> GenerationTarget {
        let logic_dir = resolve_folder(LOGIC_DIR, &[&route.annotations, &group.annotations]);
        let request_type = route.request_type_name().map(title);
        let response_type = route.response_type_name().map(title);

        let mut imports = ImportSet::new();
        imports
            .add("context")
            .add(LOGX_IMPORT)
            .add(join_package(&self.spec.module, CONTEXT_DIR));
        if request_type.is_some() || response_type.is_some() {
            imports.add(join_package(&self.spec.module, TYPES_DIR));
        }

        let (signature, return_string) = match &response_type {
            Some(resp) => (
                format!("(*{TYPES_PACKAGE}.{resp}, error)"),
                format!("return &{TYPES_PACKAGE}.{resp}{{}}, nil"),
            ),
            None => ("error".to_string(), "return nil".to_string()),
        };
        let request = request_type
            .map(|req| format!("req {TYPES_PACKAGE}.{req}"))
            .unwrap_or_default();

        let logic_name = format!("{base}Logic");
        let context = RenderContext::new()
            .with("pkg_name", last_segment(&logic_dir))
            .with("imports", imports.quoted())
            .with("logic", logic_name.as_str())
            .with("function", base)
            .with(
                "summary",
                lookup("summary", &[&route.annotations]).unwrap_or(DEFAULT_LOGIC_SUMMARY),
            )
            .with("request", request)
            .with("response_type", signature)
            .with("return_string", return_string);

        GenerationTarget::new(
            TemplateKey::new(Category::Api, "logic.tpl"),
            logic_dir,
            pipeline.file_name(&logic_name, ".go"),
            context,
            route.describe(),
        )
        .if_missing()
    }
}

impl Backend for ApiBackend<'_> {
    fn name(&self) -> &'static str {
        "api"
    }

    fn category(&self) -> Category {
        Category::Api
    }

    fn plan(&self, pipeline: &GenerationPipeline) -> Result<Vec<GenerationTarget>> {
        let mut targets = Vec::new();
        for group in &self.spec.service.groups {
            for route in &group.routes {
                let base = handler_base_name(route)?;
                targets.push(self.handler_target(pipeline, group, route, &base));
                targets.push(self.logic_target(pipeline, group, route, &base));
            }
        }
        Ok(targets)
    }
}

/// Route handler with a trailing `handler`/`Handler` removed, title-cased
pub fn handler_base_name(route: &Route) -> Result<String> {
    let handler = route.handler.trim();
    let handler = handler.strip_suffix("handler").unwrap_or(handler);
    let handler = handler.strip_suffix("Handler").unwrap_or(handler);
    if handler.is_empty() {
        return Err(Error::config(format!(
            "{} has no usable handler name: '{}'",
            route.describe(),
            route.handler
        )));
    }
    Ok(title(handler))
}

/// A group is secured by `jwt`, or by a `middleware` mentioning jwt or auth
fn has_security(group: &Group) -> bool {
    if lookup("jwt", &[&group.annotations]).is_some() {
        return true;
    }
    lookup("middleware", &[&group.annotations])
        .map(str::to_lowercase)
        .is_some_and(|m| m.contains("jwt") || m.contains("auth"))
}

fn last_segment(dir: &str) -> &str {
    dir.rsplit('/').next().unwrap_or(dir)
}
