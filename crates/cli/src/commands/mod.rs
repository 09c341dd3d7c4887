//! Subcommand implementations.

pub mod init;
pub mod list;
pub mod open;
pub mod run;

use color_eyre::eyre::{eyre, Result};
use wk_core::config::models::AppConfig;
use wk_protocol::workflow_models::WorkflowDefinition;

/// Look up `name`, or the default workflow when no name is given.
pub(crate) fn select_workflow(config: &AppConfig, name: Option<&str>) -> Result<WorkflowDefinition> {
    let found = match name {
        Some(name) => config.workflow(name).ok_or_else(|| {
            let names = config.workflow_names();
            if names.is_empty() {
                eyre!("workflow '{name}' not found. Run `workflow init` first.")
            } else {
                eyre!("workflow '{name}' not found. Available: {}", names.join(", "))
            }
        })?,
        None => config
            .default_workflow()
            .ok_or_else(|| eyre!("no workflows found. Run `workflow init` first."))?,
    };
    Ok(found.clone())
}
