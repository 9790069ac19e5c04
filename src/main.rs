//! svcgen CLI entrypoint
//! Parses command-line arguments and dispatches to the generation pipeline
//! and the template repository.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

use svcgen::core::config::Config;
use svcgen::generation::backends::{
    ApiBackend, ManifestBackend, ModelBackend, MongoBackend, RpcBackend,
};
use svcgen::generation::{Backend, GenerationPipeline, GenerationReport};
use svcgen::render::{CommandFormatter, RenderEngine};
use svcgen::spec::{self, ApiSpec, ManifestSpec, ModelSpec, MongoSpec, RpcSpec};
use svcgen::templates::{Category, TemplateRepository, register_home};

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "svcgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every generation command
#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Parsed specification document (YAML or JSON)
    #[arg(long)]
    spec: PathBuf,
    /// Output directory for generated code
    #[arg(long)]
    dir: PathBuf,
    /// File naming style, e.g. gozero, go_zero, goZero
    #[arg(long)]
    style: Option<String>,
    /// Template home overriding SVCGEN_HOME and ~/.svcgen
    #[arg(long)]
    home: Option<PathBuf>,
    /// Config file, defaults to ./svcgen.toml when present
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate HTTP handlers and logic from an API specification
    Api(GenerateArgs),
    /// Generate RPC logic and service configuration from an RPC specification
    Rpc(GenerateArgs),
    /// Generate SQL table models
    Model(GenerateArgs),
    /// Generate Mongo collection models
    Mongo {
        /// Specification document listing types, optional when --type is given
        #[arg(long)]
        spec: Option<PathBuf>,
        /// Output directory for generated code
        #[arg(long)]
        dir: PathBuf,
        /// Document type to generate a model for, repeatable
        #[arg(long = "type")]
        types: Vec<String>,
        /// Generate cached models
        #[arg(long)]
        cache: bool,
        /// File naming style, e.g. gozero, go_zero, goZero
        #[arg(long)]
        style: Option<String>,
        /// Template home overriding SVCGEN_HOME and ~/.svcgen
        #[arg(long)]
        home: Option<PathBuf>,
        /// Config file, defaults to ./svcgen.toml when present
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Generate a Dockerfile and Kubernetes manifest
    Manifest(GenerateArgs),
    /// Manage on-disk template overrides
    Template {
        #[command(subcommand)]
        action: TemplateCommands,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum TemplateCommands {
    /// Write builtin templates that are not on disk yet
    Init {
        #[arg(long)]
        home: Option<PathBuf>,
        /// Limit to one category
        #[arg(long)]
        category: Option<Category>,
    },
    /// Delete custom templates
    Clean {
        #[arg(long)]
        home: Option<PathBuf>,
        /// Limit to one category
        #[arg(long)]
        category: Option<Category>,
    },
    /// Overwrite every template of a category with the builtin, discarding edits
    Update {
        #[arg(long)]
        home: Option<PathBuf>,
        #[arg(long)]
        category: Category,
    },
    /// Restore one template to its builtin content
    Revert {
        #[arg(long)]
        home: Option<PathBuf>,
        #[arg(long)]
        category: Category,
        /// Template file name, e.g. handler.tpl
        #[arg(long)]
        name: String,
    },
    /// Show every template and whether it is builtin or custom
    List {
        #[arg(long)]
        home: Option<PathBuf>,
        /// Limit to one category
        #[arg(long)]
        category: Option<Category>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Api(args) => {
            let api: ApiSpec = spec::load(&args.spec)?;
            generate(&args.common(), &ApiBackend::new(&api))
        }
        Commands::Rpc(args) => {
            let rpc: RpcSpec = spec::load(&args.spec)?;
            generate(&args.common(), &RpcBackend::new(&rpc))
        }
        Commands::Model(args) => {
            let model: ModelSpec = spec::load(&args.spec)?;
            generate(&args.common(), &ModelBackend::new(&model))
        }
        Commands::Manifest(args) => {
            let manifest: ManifestSpec = spec::load(&args.spec)?;
            generate(&args.common(), &ManifestBackend::new(&manifest))
        }
        Commands::Mongo {
            spec: spec_path,
            dir,
            types,
            cache,
            style,
            home,
            config,
        } => {
            let mut mongo = match &spec_path {
                Some(path) => spec::load::<MongoSpec>(path)?,
                None => MongoSpec::default(),
            };
            mongo.types.extend(types);
            mongo.cache |= cache;

            let common = CommonArgs {
                dir: &dir,
                style: style.as_deref(),
                home: home.as_deref(),
                config: config.as_deref(),
            };
            generate(&common, &MongoBackend::new(&mongo))
        }
        Commands::Template { action } => run_template_command(action),
    }
}

struct CommonArgs<'a> {
    dir: &'a Path,
    style: Option<&'a str>,
    home: Option<&'a Path>,
    config: Option<&'a Path>,
}

impl GenerateArgs {
    fn common(&self) -> CommonArgs<'_> {
        CommonArgs {
            dir: &self.dir,
            style: self.style.as_deref(),
            home: self.home.as_deref(),
            config: self.config.as_deref(),
        }
    }
}

/// Register the template home from the flag or config file, then open the repository
fn open_repository(config: &Config, home: Option<&Path>) -> anyhow::Result<TemplateRepository> {
    if let Some(home) = config.template_home(home) {
        register_home(&home)?;
    }
    let repository = TemplateRepository::from_registered_home()?;
    debug!(home = %repository.home().display(), "Using template home");
    Ok(repository)
}

fn generate(args: &CommonArgs<'_>, backend: &dyn Backend) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let config = Config::discover(args.config, &cwd)?;
    let style = config.naming_style(args.style)?;
    let repository = open_repository(&config, args.home)?;

    let mut engine = RenderEngine::new();
    let formatter = CommandFormatter::from_config(&config);
    if !formatter.is_empty() {
        engine = engine.with_formatter(Box::new(formatter));
    }

    let pipeline = GenerationPipeline::new(repository)
        .with_engine(engine)
        .with_style(style);

    let report = pipeline
        .run(backend, args.dir)
        .with_context(|| format!("{} generation failed", backend.name()))?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &GenerationReport) {
    for path in &report.written {
        println!("  generated {}", path.display());
    }
    for path in &report.skipped {
        println!("  kept      {}", path.display());
    }
    println!(
        "\n✅ Done: {} written, {} kept",
        report.written.len(),
        report.skipped.len()
    );
}

fn run_template_command(action: TemplateCommands) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let config = Config::discover(None, &cwd)?;

    match action {
        TemplateCommands::Init { home, category } => {
            let repository = open_repository(&config, home.as_deref())?;
            let categories = match category {
                Some(category) => vec![category],
                None => Category::ALL.to_vec(),
            };
            let written = repository.init(&categories)?;
            println!(
                "Templates are generated in {} ({written} new), edit at your own risk!",
                repository.overlay_root().display()
            );
        }
        TemplateCommands::Clean { home, category } => {
            let repository = open_repository(&config, home.as_deref())?;
            repository.clean(category)?;
            println!("✅ Templates are clean!");
        }
        TemplateCommands::Update { home, category } => {
            let repository = open_repository(&config, home.as_deref())?;
            let written = repository.update(category)?;
            println!("✅ {category} templates are updated ({written} files)");
        }
        TemplateCommands::Revert {
            home,
            category,
            name,
        } => {
            let repository = open_repository(&config, home.as_deref())?;
            if repository.revert(category, &name)? {
                println!("✅ {category}/{name} reverted to builtin");
            } else {
                println!("{category}/{name} already matches builtin");
            }
        }
        TemplateCommands::List { home, category } => {
            let repository = open_repository(&config, home.as_deref())?;
            let listings = repository.list(category);
            if listings.is_empty() {
                println!("No templates found.");
                return Ok(());
            }
            println!("Templates in {}:", repository.overlay_root().display());
            for listing in listings {
                println!(
                    "  {:<8} {}/{}",
                    listing.origin.to_string(),
                    listing.category,
                    listing.name
                );
            }
        }
    }
    Ok(())
}
