use color_eyre::eyre::Result;
use colored::Colorize;
use std::path::Path;
use wk_core::config::loader::load_config;

pub async fn execute(root: &Path) -> Result<()> {
    let config = load_config(root).await?;

    if config.workflows.is_empty() {
        println!("No workflows found. Run {} to create the demo set.", "workflow init".bold());
        return Ok(());
    }

    let default_name = config.default_workflow().map(|w| w.name.clone());
    for workflow in &config.workflows {
        let marker = if default_name.as_deref() == Some(workflow.name.as_str()) {
            "*".green().bold()
        } else {
            " ".normal()
        };
        println!(
            "{} {:<24} {:>2} steps  {}",
            marker,
            workflow.name.bold(),
            workflow.steps.len(),
            workflow.description.dimmed()
        );
    }
    Ok(())
}
