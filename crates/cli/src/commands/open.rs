use super::select_workflow;
use color_eyre::eyre::{eyre, Result};
use std::path::Path;
use tracing::info;
use wk_core::config::loader::load_config;

/// Open a workflow in the terminal UI.
pub async fn execute(root: &Path, name: Option<&str>) -> Result<()> {
    let config = load_config(root).await?;
    let definition = select_workflow(&config, name)?;

    info!(workflow = %definition.name, time_scale = config.global.time_scale, "launching terminal UI");
    wk_tui::run_app(definition, config.global)
        .await
        .map_err(|e| eyre!(e))
}
