mod app;
mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "batnoter-cli", about = "BatNoter notes CLI", version)]
struct Cli {
    /// Server URL (overrides config and BATNOTER_SERVER_URL)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Show the repository note tree
    Tree,

    /// List notes in a directory
    Ls {
        /// Directory path (empty for the repository root)
        #[arg(default_value = "")]
        path: String,
    },

    /// Show note content
    Show {
        /// Note path, e.g. "daily/today.md"
        path: String,
    },

    /// Create or update a note
    Save {
        /// Note path
        path: String,
        /// Content text (use "-" to read from stdin)
        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a note
    Rm {
        /// Note path
        path: String,
    },

    /// Search notes
    Search {
        /// Search query
        query: String,
        /// Restrict to a directory path
        #[arg(long)]
        path: Option<String>,
        /// Result page number
        #[arg(long, default_value = "1")]
        page: u32,
    },
}

/// Resolve "-" as stdin, pass other content through
fn resolve_content(content: Option<String>) -> anyhow::Result<Option<String>> {
    match content.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)?;
            Ok(Some(buf))
        }
        _ => Ok(content),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut app = app::App::new(cli.server.as_deref())?;

    match cli.command {
        Command::Tree => commands::tree::run(&mut app).await,
        Command::Ls { path } => commands::ls::run(&mut app, &path, &cli.format).await,
        Command::Show { path } => commands::show::run(&mut app, &path).await,
        Command::Save { path, content } => {
            let content = resolve_content(content)?
                .ok_or_else(|| anyhow::anyhow!("No content given (use --content or '-')"))?;
            commands::save::run(&mut app, &path, &content).await
        }
        Command::Rm { path } => commands::rm::run(&mut app, &path).await,
        Command::Search { query, path, page } => {
            commands::search::run(&mut app, &query, path.as_deref(), page, &cli.format).await
        }
    }
}
