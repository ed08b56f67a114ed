//! craftpath CLI - derivation search over recipe tables.
//!
//! Usage:
//!   craftpath find <target>              # Derive an element from the bases
//!   craftpath find <target> --multi      # Enumerate alternative derivations
//!   craftpath inspect <element>          # Recipes for / uses of an element
//!   craftpath merge <target>             # Merged overview of all derivations
//!   craftpath stats                      # Graph statistics
//!   craftpath validate                   # Check the recipe table

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use craftpath::{
    find, merge_trees, Algorithm, EngineConfig, RecipeGraph, RecipeTable, SearchRequest,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "craftpath")]
#[command(about = "craftpath - derivation search over recipe tables", long_about = None)]
struct Cli {
    /// Recipe table file (JSON)
    #[arg(short, long, default_value = "recipes.json")]
    table: PathBuf,

    /// Config file (TOML); defaults apply when absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a derivation of the target from the base elements
    Find {
        /// Target element name
        target: String,

        /// Search algorithm: bfs, dfs, bidirectional
        #[arg(short, long)]
        algorithm: Option<String>,

        /// Enumerate alternative derivations
        #[arg(long)]
        multi: bool,

        /// Maximum number of distinct derivations (with --multi)
        #[arg(long, default_value = "5")]
        max_paths: usize,

        /// Record per-step expansion traces
        #[arg(long)]
        trace: bool,

        /// Visit budget; overrides the config value
        #[arg(long)]
        budget: Option<usize>,
    },

    /// Show what produces an element and what it combines into
    Inspect {
        /// Element name
        element: String,
    },

    /// Merge all derivations of a target into one overview tree
    Merge {
        /// Target element name
        target: String,

        /// Maximum number of derivations to merge
        #[arg(long, default_value = "10")]
        max_paths: usize,
    },

    /// Show graph statistics
    Stats,

    /// Validate the recipe table without searching
    Validate,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

#[derive(Serialize)]
struct InspectOutput {
    element: String,
    base: bool,
    recipes: Vec<craftpath::IngredientPair>,
    uses: Vec<craftpath::PartnerUse>,
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let table = RecipeTable::load(&cli.table)
        .with_context(|| format!("failed to load recipe table from {}", cli.table.display()))?;

    if let Commands::Validate = cli.command {
        let combinations = table.validate()?;
        println!("✓ Table valid");
        println!("  Rows: {}", combinations.len());
        return Ok(());
    }

    let graph = RecipeGraph::build(&table, &config.base_elements)?;

    match cli.command {
        Commands::Find {
            target,
            algorithm,
            multi,
            max_paths,
            trace,
            budget,
        } => {
            let mut request = SearchRequest::new(target);
            request.algorithm = match algorithm {
                Some(name) => name.parse::<Algorithm>()?,
                None => config.default_algorithm,
            };
            request.multi = multi;
            request.max_paths = if multi { max_paths } else { 1 };
            request.trace = trace;
            request.budget = budget.or(config.node_budget);

            let report = find(&graph, &request)?;
            let json = serde_json::to_string_pretty(&report).unwrap_or_default();
            println!("{}", json);
        }

        Commands::Inspect { element } => {
            if !graph.contains(&element) {
                println!("No element named '{}'", element);
                return Ok(());
            }
            let output = InspectOutput {
                base: graph
                    .element(&element)
                    .is_some_and(|id| graph.is_base(id)),
                recipes: graph.recipes_for(&element),
                uses: graph.uses(&element),
                element,
            };
            let json = serde_json::to_string_pretty(&output).unwrap_or_default();
            println!("{}", json);
        }

        Commands::Merge { target, max_paths } => {
            let mut request = SearchRequest::new(target);
            request.multi = true;
            request.max_paths = max_paths;
            request.budget = config.node_budget;

            let report = find(&graph, &request)?;
            let merged = merge_trees(&report.trees)?;
            let json = serde_json::to_string_pretty(&merged).unwrap_or_default();
            println!("{}", json);
        }

        Commands::Stats => {
            let stats = graph.stats();
            println!("craftpath - Graph Statistics");
            println!("════════════════════════════");
            println!();
            println!("Elements:     {}", stats.elements);
            println!("Base:         {}", stats.base_elements);
            println!("Combinations: {}", stats.combinations);
        }

        Commands::Validate => {
            // Already handled above
        }
    }

    Ok(())
}
