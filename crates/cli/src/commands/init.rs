use color_eyre::eyre::Result;
use colored::Colorize;
use std::path::Path;
use wk_core::init::{generate_workflow_kit_structure, InitOptions};

pub async fn execute(root: &Path, force: bool, minimal: bool) -> Result<()> {
    let options = InitOptions {
        target_dir: root.to_path_buf(),
        force,
        minimal,
    };
    let written = generate_workflow_kit_structure(options).await?;

    println!("{} Initialized workflow-kit", "✔".green().bold());
    for path in &written {
        let shown = path.strip_prefix(root).unwrap_or(path);
        println!("  {}", shown.display());
    }
    println!();
    println!("Next: {}", "workflow list".bold());
    Ok(())
}
