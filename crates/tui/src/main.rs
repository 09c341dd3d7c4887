//! Standalone TUI binary for workflow-kit.
//!
//! Opens the workflow named by the first argument, or the default workflow
//! of the `.workflow-kit/` directory in the current directory.

use anyhow::{anyhow, Context, Result};
use wk_core::config::loader::load_config;
use wk_tui::run_app;

#[tokio::main]
async fn main() -> Result<()> {
    let root = std::env::current_dir().context("failed to resolve current directory")?;
    let config = load_config(&root).await?;

    let definition = match std::env::args().nth(1) {
        Some(name) => config
            .workflow(&name)
            .ok_or_else(|| anyhow!("workflow '{}' not found", name))?,
        None => config
            .default_workflow()
            .ok_or_else(|| anyhow!("no workflows found. Run `workflow init` first."))?,
    }
    .clone();

    run_app(definition, config.global).await
}
