mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand};
use notegraph_core::config::loader::ConfigLoader;
use notegraph_core::layout::LayoutAlgorithm;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ngraph", version, about = "Inspect the link graph of a markdown vault")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved paths
    Doctor,

    /// Rebuild the graph and refresh the note cache
    Reindex(ReindexArgs),

    /// Show backlinks and outgoing links of a note
    Links(LinksArgs),

    /// Show which note a link reference points to
    Resolve(ResolveArgs),

    /// List notes with no incoming or outgoing links
    Orphans(OrphansArgs),

    /// Summarise open, critical and overdue tasks per note
    Tasks(TasksArgs),

    /// Compute node positions for the vault graph
    Layout(LayoutArgs),
}

#[derive(Debug, Args)]
pub struct ReindexArgs {
    /// Ignore the existing cache and parse every note
    #[arg(long)]
    pub no_cache: bool,

    /// List every note with its link counts
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct LinksArgs {
    /// Note path (e.g. "projects/alpha.md") or link reference (e.g. "Alpha")
    pub note: String,

    /// Only show notes linking to this one
    #[arg(long, conflicts_with = "outlinks")]
    pub backlinks: bool,

    /// Only show notes this one links to
    #[arg(long)]
    pub outlinks: bool,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Reference as written inside [[...]], e.g. "Note#Heading"
    pub reference: String,
}

#[derive(Debug, Args)]
pub struct OrphansArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TasksArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct LayoutArgs {
    /// grid, hierarchical, color, tag or folder
    #[arg(long, short, default_value = "grid")]
    pub algorithm: LayoutAlgorithm,

    /// Add a node per tag
    #[arg(long)]
    pub tags: bool,

    /// Leave out companion document nodes
    #[arg(long)]
    pub no_documents: bool,

    #[arg(long)]
    pub json: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Ok(rc) = ConfigLoader::load(cli.config.as_deref(), cli.profile.as_deref()) {
        logging::init(&rc);
    }
    tracing::debug!("ngraph {} (core {})", env!("CARGO_PKG_VERSION"), notegraph_core::version());

    let config = cli.config.as_deref();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(config, profile),
        Commands::Reindex(args) => cmd::reindex::run(config, profile, args),
        Commands::Links(args) => cmd::links::run(config, profile, args),
        Commands::Resolve(args) => cmd::resolve::run(config, profile, args),
        Commands::Orphans(args) => cmd::orphans::run(config, profile, args),
        Commands::Tasks(args) => cmd::tasks::run(config, profile, args),
        Commands::Layout(args) => cmd::layout::run(config, profile, args),
    }

    logging::shutdown();
}
