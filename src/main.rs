use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "trackify")]
#[command(version, about = "Project and issue tracker with a kanban board")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Storage backend: "local" or "remote". Overrides trackify.toml and TRACKIFY_BACKEND.
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Base URL of the tracker API (remote backend)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory for local data, relative to the project directory
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List, create, update or delete projects
    Projects {
        #[command(subcommand)]
        command: ProjectsCommands,
    },
    /// List, create, update or delete issues
    Issues {
        #[command(subcommand)]
        command: IssuesCommands,
    },
    /// Show a project's kanban board
    Board {
        project: String,
        /// Only show issues whose title or description contains this text
        #[arg(short, long)]
        query: Option<String>,
        /// Sort every column by title: "az" or "za"
        #[arg(long)]
        sort: Option<String>,
    },
    /// Drag an issue between board columns. A move within one column only
    /// reorders the printed column and is not saved.
    Move {
        project: String,
        issue: String,
        /// Drop zone the issue leaves (newList, approvedList, inProgList, doneList)
        #[arg(long)]
        from: String,
        /// Drop zone the issue lands in
        #[arg(long)]
        to: String,
        /// Position in the landing column
        #[arg(long, default_value = "0")]
        index: usize,
    },
    /// Delete every project and issue
    Reset {
        #[arg(long)]
        force: bool,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum ProjectsCommands {
    List {
        /// Only show projects whose name contains this text
        #[arg(short, long)]
        query: Option<String>,
    },
    Create {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    Show {
        id: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// Replaces all labels; separate with spaces or commas
        #[arg(long)]
        labels: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum IssuesCommands {
    List {
        /// Only list issues of this project
        #[arg(short, long)]
        project: Option<String>,
    },
    Create {
        project: String,
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Board column title: New, Approved, In Progress or Done
        #[arg(long, default_value = "New")]
        list: String,
        #[arg(long = "type")]
        issue_type: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        labels: Option<String>,
    },
    Show {
        id: String,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "type")]
        issue_type: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        labels: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default trackify.toml file
    Init,
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };

    let filter = EnvFilter::try_from_env("TRACKIFY_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::Projects { command } => cmd::cmd_projects(&cli, &project_dir, command).await?,
        Commands::Issues { command } => cmd::cmd_issues(&cli, &project_dir, command).await?,
        Commands::Board {
            project,
            query,
            sort,
        } => {
            cmd::cmd_board(&cli, &project_dir, project, query.as_deref(), sort.as_deref()).await?
        }
        Commands::Move {
            project,
            issue,
            from,
            to,
            index,
        } => cmd::cmd_move(&cli, &project_dir, project, issue, from, to, *index).await?,
        Commands::Reset { force } => cmd::cmd_reset(&cli, &project_dir, *force).await?,
        Commands::Config { command } => cmd::cmd_config(&cli, &project_dir, command.clone())?,
    }

    Ok(())
}
