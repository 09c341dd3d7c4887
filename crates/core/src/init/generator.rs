//! Directory structure and file generation for .workflow-kit initialization.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use crate::config::loader::CONFIG_DIR;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Workflow written when only a single example is requested.
const MINIMAL_WORKFLOW: &str = "workflows/peer-comparison.yaml";

/// Options for initializing a .workflow-kit directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Target directory where .workflow-kit will be created.
    pub target_dir: PathBuf,

    /// Overwrite existing .workflow-kit directory if it exists.
    pub force: bool,

    /// Create minimal template (only the peer comparison workflow).
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate a complete .workflow-kit directory structure with templates.
///
/// This function creates the following structure:
/// ```text
/// .workflow-kit/
/// ├── config.toml
/// └── workflows/
///     ├── peer-comparison.yaml
///     ├── document-upload.yaml (unless minimal)
///     ├── chart-extraction.yaml (unless minimal)
///     └── ipo-screening.md (unless minimal)
/// ```
///
/// # Arguments
/// * `options` - Configuration for the initialization process
///
/// # Returns
/// The paths of every file written, or an `InitError` if:
/// - The .workflow-kit directory already exists (without force flag)
/// - A template file cannot be found
/// - File system operations fail
pub async fn generate_workflow_kit_structure(options: InitOptions) -> InitResult<Vec<PathBuf>> {
    let wk_dir = options.target_dir.join(CONFIG_DIR);

    if wk_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(wk_dir));
    }

    let workflows_dir = wk_dir.join("workflows");
    fs::create_dir_all(&workflows_dir).map_err(|source| InitError::DirectoryCreate {
        path: workflows_dir.clone(),
        source,
    })?;

    let mut written = vec![write_template_file(&wk_dir, "config.toml")?];

    if options.minimal {
        written.push(write_template_file(&wk_dir, MINIMAL_WORKFLOW)?);
    } else {
        let mut workflows = list_templates("workflows/");
        workflows.sort();
        for workflow_path in workflows {
            written.push(write_template_file(&wk_dir, &workflow_path)?);
        }
    }

    debug!(dir = %wk_dir.display(), files = written.len(), "generated workflow-kit structure");
    Ok(written)
}

/// Write one embedded template below `wk_dir`, returning the target path.
fn write_template_file(wk_dir: &Path, template_path: &str) -> InitResult<PathBuf> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = wk_dir.join(template_path);

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path.clone(),
        source,
    })?;

    Ok(target_path)
}
