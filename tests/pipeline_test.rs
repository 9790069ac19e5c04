//! End-to-end generation tests against isolated template homes

use std::fs;
use std::path::{Path, PathBuf};

use svcgen::core::error::Error;
use svcgen::core::version::VersionGate;
use svcgen::generation::GenerationPipeline;
use svcgen::generation::backends::{ApiBackend, ModelBackend, MongoBackend, RpcBackend};
use svcgen::spec::{ApiSpec, ModelSpec, MongoSpec, RpcSpec};
use svcgen::templates::{Category, TemplateKey, TemplateRepository};
use tempfile::TempDir;

fn api_spec(group: Option<&str>) -> ApiSpec {
    let annotations = group
        .map(|g| format!("\n      annotations:\n        group: {g}"))
        .unwrap_or_default();
    serde_yaml::from_str(&format!(
        r#"
module: greet
service:
  name: greet-api
  groups:
    - routes:
        - method: get
          path: /ping
          handler: PingHandler{annotations}
"#
    ))
    .unwrap()
}

/// Every file under `root`, relative and sorted
fn files_under(root: &Path) -> Vec<PathBuf> {
    fn walk(dir: &Path, root: &Path, out: &mut Vec<PathBuf>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, root, out);
            } else {
                out.push(path.strip_prefix(root).unwrap().to_path_buf());
            }
        }
    }
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}

fn pipeline(home: &TempDir) -> GenerationPipeline {
    GenerationPipeline::new(TemplateRepository::new(home.path()))
}

#[test]
fn test_ping_route_yields_handler_and_logic() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let spec = api_spec(None);

    let report = pipeline(&home)
        .run(&ApiBackend::new(&spec), out.path())
        .unwrap();

    assert_eq!(report.written.len(), 2);
    assert_eq!(
        files_under(out.path()),
        vec![
            PathBuf::from("internal/handler/pinghandler.go"),
            PathBuf::from("internal/logic/pinglogic.go"),
        ]
    );

    let handler = fs::read_to_string(out.path().join("internal/handler/pinghandler.go")).unwrap();
    assert!(handler.starts_with("package handler\n"));
    assert!(handler.contains("func PingHandler(svcCtx *svc.ServiceContext) http.HandlerFunc {"));
    assert!(handler.contains("l := logic.NewPingLogic(r.Context(), svcCtx)"));
    assert!(handler.contains("err := l.Ping()"));
    assert!(handler.contains("httpx.Ok(w)"));
    assert!(!handler.contains("var req"));

    let logic = fs::read_to_string(out.path().join("internal/logic/pinglogic.go")).unwrap();
    assert!(logic.contains("func (l *PingLogic) Ping() error {"));
    assert!(logic.contains("return nil"));
    assert!(logic.contains("// Ping Business logic"));
}

#[test]
fn test_group_annotation_places_files_in_subdirectories() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let spec = api_spec(Some("user"));

    pipeline(&home)
        .run(&ApiBackend::new(&spec), out.path())
        .unwrap();

    assert_eq!(
        files_under(out.path()),
        vec![
            PathBuf::from("internal/handler/user/pinghandler.go"),
            PathBuf::from("internal/logic/user/pinglogic.go"),
        ]
    );
    let handler =
        fs::read_to_string(out.path().join("internal/handler/user/pinghandler.go")).unwrap();
    assert!(handler.starts_with("package user\n"));
    assert!(handler.contains("\"greet/internal/logic/user\""));
}

#[test]
fn test_regeneration_keeps_logic_and_rewrites_handlers() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let spec = api_spec(None);
    let pipeline = pipeline(&home);
    let handler_path = out.path().join("internal/handler/pinghandler.go");
    let logic_path = out.path().join("internal/logic/pinglogic.go");

    pipeline.run(&ApiBackend::new(&spec), out.path()).unwrap();
    let first_handler = fs::read(&handler_path).unwrap();

    fs::write(&logic_path, "// hand written logic\n").unwrap();
    fs::write(&handler_path, "// stale handler\n").unwrap();

    let report = pipeline.run(&ApiBackend::new(&spec), out.path()).unwrap();
    assert_eq!(report.written, vec![handler_path.clone()]);
    assert_eq!(report.skipped, vec![logic_path.clone()]);

    assert_eq!(fs::read(&handler_path).unwrap(), first_handler);
    assert_eq!(
        fs::read_to_string(&logic_path).unwrap(),
        "// hand written logic\n"
    );
}

#[test]
fn test_custom_template_overrides_builtin() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let repository = TemplateRepository::new(home.path());
    let custom = repository.overlay_path(&TemplateKey::new(Category::Api, "handler.tpl"));
    fs::create_dir_all(custom.parent().unwrap()).unwrap();
    fs::write(&custom, "// custom {{ handler_name }} in {{ pkg_name }}\n").unwrap();

    let spec = api_spec(None);
    GenerationPipeline::new(repository)
        .run(&ApiBackend::new(&spec), out.path())
        .unwrap();

    assert_eq!(
        fs::read_to_string(out.path().join("internal/handler/pinghandler.go")).unwrap(),
        "// custom PingHandler in handler\n"
    );
}

#[test]
fn test_old_version_imports_httpx_once_from_import_list() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let spec = api_spec(None);

    pipeline(&home)
        .with_gate(VersionGate::new("1.1.10"))
        .run(&ApiBackend::new(&spec), out.path())
        .unwrap();

    let handler = fs::read_to_string(out.path().join("internal/handler/pinghandler.go")).unwrap();
    assert_eq!(handler.matches("go-zero/rest/httpx").count(), 1);
    let svc_at = handler.find("greet/internal/svc").unwrap();
    let httpx_at = handler.find("go-zero/rest/httpx").unwrap();
    assert!(httpx_at > svc_at, "legacy httpx import follows the import list");
}

#[test]
fn test_naming_style_applies_to_every_file() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let spec = api_spec(None);

    pipeline(&home)
        .with_style("go_zero".parse().unwrap())
        .run(&ApiBackend::new(&spec), out.path())
        .unwrap();

    assert!(out.path().join("internal/handler/ping_handler.go").exists());
    assert!(out.path().join("internal/logic/ping_logic.go").exists());
}

#[test]
fn test_rpc_service() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let spec: RpcSpec = serde_yaml::from_str(
        r#"
module: greet
service:
  name: greet-service
  go_package: greet/pb
  methods:
    - name: Ping
      request_type: Request
      response_type: Response
"#,
    )
    .unwrap();

    pipeline(&home)
        .run(&RpcBackend::new(&spec), out.path())
        .unwrap();

    let logic = fs::read_to_string(out.path().join("internal/logic/pinglogic.go")).unwrap();
    assert!(logic.starts_with("package logic\n"));
    assert!(logic.contains("\"greet/internal/svc\""));
    assert!(logic.contains("func (l *PingLogic) Ping(in *pb.Request) (*pb.Response, error) {"));

    let etc = fs::read_to_string(out.path().join("etc/greetservice.yaml")).unwrap();
    assert!(etc.starts_with("Name: greet.rpc\n"));
    assert!(etc.contains("Key: greet.rpc"));
}

#[test]
fn test_model_with_cache() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let spec: ModelSpec = serde_yaml::from_str(
        r#"
cache: true
tables:
  - name: user
    fields:
      - {name: id, type_name: int64}
      - {name: name, type_name: string, comment: display name}
"#,
    )
    .unwrap();

    pipeline(&home)
        .run(&ModelBackend::new(&spec), out.path())
        .unwrap();

    assert_eq!(
        files_under(out.path()),
        vec![PathBuf::from("usermodel.go"), PathBuf::from("vars.go")]
    );
    let model = fs::read_to_string(out.path().join("usermodel.go")).unwrap();
    assert!(model.starts_with("package model\n\nimport ("));
    assert!(model.contains("stores/cache\""));
    assert!(!model.contains("\"time\""));
    assert!(model.contains("Name string `db:\"name\"` // display name"));
    assert!(model.contains("cacheUserIdPrefix"));
}

#[test]
fn test_duplicate_paths_are_rejected() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let spec = MongoSpec {
        types: vec!["user".into(), "User".into()],
        cache: false,
    };

    let err = pipeline(&home)
        .run(&MongoBackend::new(&spec), out.path())
        .unwrap_err();

    assert!(matches!(err.root_cause(), Error::DuplicatePath(_)));
    assert!(files_under(out.path()).is_empty());
}

#[test]
fn test_broken_custom_template_reports_syntax_error() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let repository = TemplateRepository::new(home.path());
    let custom = repository.overlay_path(&TemplateKey::new(Category::Mongo, "error.tpl"));
    fs::create_dir_all(custom.parent().unwrap()).unwrap();
    fs::write(&custom, "{% if %}").unwrap();

    let spec = MongoSpec {
        types: vec!["user".into()],
        cache: true,
    };
    let err = GenerationPipeline::new(repository)
        .run(&MongoBackend::new(&spec), out.path())
        .unwrap_err();

    assert!(matches!(err, Error::Generation { category: Category::Mongo, .. }));
    assert!(matches!(err.root_cause(), Error::TemplateSyntax { .. }));
    // The model planned before the broken template stays on disk
    assert!(out.path().join("usermodel.go").exists());
}

#[test]
fn test_group_annotation_cannot_escape_output_directory() {
    let home = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let out = root.path().join("out");
    let spec = api_spec(Some("../../../escaped"));

    let err = pipeline(&home)
        .run(&ApiBackend::new(&spec), &out)
        .unwrap_err();

    assert!(matches!(err, Error::Generation { category: Category::Api, .. }));
    assert!(matches!(err.root_cause(), Error::Config(msg) if msg.contains("route GET /ping")));
    assert!(!root.path().join("escaped").exists());
    assert!(!out.exists());
}

#[test]
fn test_handler_name_with_separator_is_rejected() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let spec: ApiSpec = serde_yaml::from_str(
        r#"
module: greet
service:
  name: greet-api
  groups:
    - routes:
        - method: get
          path: /ping
          handler: admin/PingHandler
"#,
    )
    .unwrap();

    let err = pipeline(&home)
        .run(&ApiBackend::new(&spec), out.path())
        .unwrap_err();

    assert!(matches!(err.root_cause(), Error::Config(_)));
    assert!(files_under(out.path()).is_empty());
}

#[test]
fn test_plan_errors_carry_category() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let spec = MongoSpec::default();

    let err = pipeline(&home)
        .run(&MongoBackend::new(&spec), out.path())
        .unwrap_err();

    match &err {
        Error::Generation { category, node, .. } => {
            assert_eq!(*category, Category::Mongo);
            assert_eq!(node, "mongo specification");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("missing type"));
}

#[test]
fn test_custom_template_condition_on_unknown_variable_fails() {
    let home = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let repository = TemplateRepository::new(home.path());
    let custom = repository.overlay_path(&TemplateKey::new(Category::Api, "handler.tpl"));
    fs::create_dir_all(custom.parent().unwrap()).unwrap();
    fs::write(
        &custom,
        "{% if has_auth %}AUTH{% else %}NOAUTH{% endif %} {{ handler_name }}\n",
    )
    .unwrap();

    let spec = api_spec(None);
    let err = GenerationPipeline::new(repository)
        .run(&ApiBackend::new(&spec), out.path())
        .unwrap_err();

    assert!(matches!(err, Error::Generation { category: Category::Api, .. }));
    assert!(
        matches!(err.root_cause(), Error::MissingContextKey { key, .. } if key == "has_auth"),
        "unexpected error: {err}"
    );
    assert!(!out.path().join("internal/handler/pinghandler.go").exists());
}
