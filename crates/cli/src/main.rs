//! `workflow` command line entry point.

mod cli;
mod commands;
mod logging;
mod transcript;

use clap::Parser;
use cli::{Cli, Commands};
use color_eyre::eyre::{Context, Result};
use std::path::Path;
use wk_core::config::loader::CONFIG_DIR;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let root = std::env::current_dir().wrap_err("failed to resolve current directory")?;

    let Cli {
        command,
        verbose,
        log_json,
    } = cli;

    let command = match command {
        Some(Commands::Open { name }) => return open(&root, name, verbose, log_json).await,
        None => return open(&root, None, verbose, log_json).await,
        Some(command) => command,
    };

    logging::init_stderr(verbose, log_json)?;
    match command {
        Commands::Init { force, minimal } => commands::init::execute(&root, force, minimal).await,
        Commands::List => commands::list::execute(&root).await,
        Commands::Run(args) => commands::run::execute(&root, args).await,
        Commands::Open { name } => open(&root, name, verbose, log_json).await,
    }
}

/// The UI owns the terminal, so logs go to `.workflow-kit/logs` (or the
/// temp dir outside a project) while it runs.
async fn open(root: &Path, name: Option<String>, verbose: u8, log_json: bool) -> Result<()> {
    let log_dir = if root.join(CONFIG_DIR).is_dir() {
        root.join(CONFIG_DIR).join("logs")
    } else {
        std::env::temp_dir().join("workflow-kit")
    };
    let _guard = logging::init_file(&log_dir, verbose, log_json)?;
    commands::open::execute(root, name.as_deref()).await
}
