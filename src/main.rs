//! CLI entry point for the entity atlas.
//!
//! Loads an entity file into an in-memory store and runs clustering and
//! similarity queries against it.

use anyhow::Context;
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use entity_atlas::display::{ClusterReport, SimilarityReport, THEME};
use entity_atlas::io::{ExitCode, JsonResponse, OutputFormat, OutputManager};
use entity_atlas::logging::init_logging;
use entity_atlas::{
    AtlasError, EntityFilter, EntityId, EntityStore, EntityType, QueryFacade, Settings,
    load_entities,
};
use std::path::{Path, PathBuf};

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Entity embedding clustering and similarity
#[derive(Parser)]
#[command(
    name = "entity-atlas",
    version = env!("CARGO_PKG_VERSION"),
    about = "Cluster entity embeddings and find similar entities",
    long_about = "Load entity embeddings (users, companies, products, workflows, agents) and query them by cluster or by similarity.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging for this run
    #[arg(long, global = true)]
    debug: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Initialize project
    #[command(about = "Set up .atlas directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings")]
    Config,

    /// Partition entities into k clusters
    #[command(
        about = "Group entities around the first k matches",
        after_help = "Examples:\n  entity-atlas cluster -k 4\n  entity-atlas cluster -k 3 --type agent\n  entity-atlas cluster --name acme --json | jq '.data.clusters[].members'"
    )]
    Cluster {
        /// Number of clusters (defaults to clustering.default_k)
        #[arg(short)]
        k: Option<usize>,

        /// Only cluster entities of this type
        #[arg(long = "type", value_name = "TYPE")]
        entity_type: Option<String>,

        /// Only cluster entities whose name contains this text (case-insensitive)
        #[arg(long)]
        name: Option<String>,

        /// Entity file to load (defaults to data_path)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Rank entities by similarity to one entity
    #[command(
        about = "Find the entities most similar to a given entity",
        after_help = "Examples:\n  entity-atlas similar usr-42\n  entity-atlas similar cmp-7 -n 5 --json | jq '.data.results[].entity_id'"
    )]
    Similar {
        /// Entity id to compare against
        id: String,

        /// Maximum number of results (defaults to similarity.default_top_n)
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Entity file to load (defaults to data_path)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Summarize the entity file
    #[command(about = "Show entity counts and dimensionality")]
    Stats {
        /// Entity file to load (defaults to data_path)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    let mut output = OutputManager::new(OutputFormat::from_json_flag(cli.json));

    let code = match run(&cli, &mut output) {
        Ok(code) => code,
        Err(err) => match err.downcast_ref::<AtlasError>() {
            Some(atlas_error) => output
                .error(atlas_error)
                .unwrap_or(ExitCode::GeneralError),
            None => output
                .general_error(&format!("{err:#}"))
                .unwrap_or(ExitCode::GeneralError),
        },
    };

    std::process::exit(code.into());
}

fn run(cli: &Cli, output: &mut OutputManager) -> anyhow::Result<ExitCode> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    init_logging(&settings.logging.level, cli.debug || settings.debug);

    match &cli.command {
        Commands::Init { force } => {
            let root = std::env::current_dir().context("cannot read current directory")?;
            let path = Settings::init_config_file(&root, *force)?;
            output.info(&THEME.success_with_icon(&format!(
                "Created configuration file at: {}",
                THEME.apply(&THEME.path, path.display())
            )))?;
            output.info("Edit this file to customize your settings.")?;

            if output.format().is_json() {
                let data = serde_json::json!({ "path": path.display().to_string() });
                let response =
                    JsonResponse::success(data).with_message("Configuration initialized");
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            Ok(ExitCode::Success)
        }

        Commands::Config => {
            if output.format().is_json() {
                let response = JsonResponse::success(&settings);
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", THEME.apply(&THEME.header, "Current Configuration:"));
                println!("{}", "=".repeat(50));
                println!("{}", settings.to_toml()?);
            }
            Ok(ExitCode::Success)
        }

        Commands::Cluster {
            k,
            entity_type,
            name,
            input,
        } => {
            let facade = open_facade(&settings, input.as_deref())?;
            let k = k.unwrap_or(settings.clustering.default_k);

            let mut filter = EntityFilter::all();
            if let Some(entity_type) = entity_type {
                filter = filter.with_type(parse_entity_type(entity_type));
            }
            if let Some(name) = name {
                filter = filter.with_name(name);
            }

            let result = facade.cluster_with_report(&filter, k)?;
            let report = ClusterReport::new(result, filter, k, &facade.store().snapshot());
            Ok(output.success(report)?)
        }

        Commands::Similar { id, top_n, input } => {
            let facade = open_facade(&settings, input.as_deref())?;
            let top_n = top_n.unwrap_or(settings.similarity.default_top_n);

            let results = facade.find_similar(id, top_n)?;
            let report =
                SimilarityReport::new(EntityId::new(id), results, &facade.store().snapshot());
            Ok(output.success(report)?)
        }

        Commands::Stats { input } => {
            let facade = open_facade(&settings, input.as_deref())?;
            Ok(output.success(facade.stats())?)
        }
    }
}

/// Loads the entity file and wraps it in a configured facade.
fn open_facade(settings: &Settings, input: Option<&Path>) -> Result<QueryFacade, AtlasError> {
    let path = input.unwrap_or(&settings.data_path);
    let store: EntityStore = load_entities(path).map_err(|source| AtlasError::Load {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(QueryFacade::with_settings(store, settings))
}

fn parse_entity_type(name: &str) -> EntityType {
    let Ok(entity_type) = name.parse::<EntityType>();
    entity_type
}
