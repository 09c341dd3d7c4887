//! Configuration file loader for `.workflow-kit/` directory structure.
//!
//! This module provides functionality to load and parse all configuration files
//! from the `.workflow-kit/` directory, including:
//! - `config.toml`: Global settings
//! - `workflows/*.yaml`, `workflows/*.yml`: Workflow definitions
//! - `workflows/*.md`: Workflow definitions as YAML front matter, with the
//!   Markdown body used as the opening message

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use gray_matter::engine::YAML;
use gray_matter::Matter;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use walkdir::WalkDir;
use wk_protocol::config_models::GlobalConfig;
use wk_protocol::workflow_models::WorkflowDefinition;

/// Name of the configuration directory under the project root.
pub const CONFIG_DIR: &str = ".workflow-kit";

/// Loads all configuration from the `.workflow-kit/` directory.
///
/// This function scans the `.workflow-kit/` directory and loads:
/// - Global configuration from `config.toml`
/// - Workflow definitions from `workflows/`
///
/// # Arguments
///
/// * `root` - Root directory containing the `.workflow-kit/` folder
///
/// # Returns
///
/// An `AppConfig` containing all loaded configuration. If directories or files
/// are missing (but the root exists), returns an empty/default configuration
/// rather than an error. Workflows are ordered by file name.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid syntax (TOML, YAML, or Markdown front matter)
/// - `time-scale` is not a finite, non-negative number
/// - A workflow definition fails validation
/// - Two files define a workflow with the same name
///
/// # Example
///
/// ```rust,no_run
/// use wk_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// for name in config.workflow_names() {
///     println!("{}", name);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let wk_dir = root.join(CONFIG_DIR);

    if !wk_dir.exists() {
        debug!(path = %wk_dir.display(), "no configuration directory, using defaults");
        return Ok(AppConfig::default());
    }

    let global = load_global_config(&wk_dir)?;
    let workflows = load_workflows(&wk_dir)?;

    if let Some(name) = &global.default_workflow {
        if !workflows.iter().any(|w| &w.name == name) {
            return Err(ConfigError::InvalidConfig {
                path: wk_dir.join("config.toml"),
                reason: format!("default-workflow '{}' is not defined", name),
            });
        }
    }

    debug!(workflows = workflows.len(), "configuration loaded");
    Ok(AppConfig { global, workflows })
}

/// Loads global configuration from `config.toml`.
fn load_global_config(wk_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = wk_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path.clone(),
            source,
        })?;

    if !config.has_valid_time_scale() {
        return Err(ConfigError::InvalidConfig {
            path: config_path,
            reason: format!(
                "time-scale must be a finite, non-negative number (got {})",
                config.time_scale
            ),
        });
    }

    Ok(config)
}

/// Loads all workflow definitions from `workflows/`.
fn load_workflows(wk_dir: &Path) -> ConfigResult<Vec<WorkflowDefinition>> {
    let workflows_dir = wk_dir.join("workflows");

    if !workflows_dir.exists() {
        return Ok(Vec::new());
    }

    let mut workflows = Vec::new();
    let mut sources: HashMap<String, PathBuf> = HashMap::new();

    for entry in WalkDir::new(&workflows_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: workflows_dir.clone(),
            source,
        })?;

        let path = entry.path();
        let definition = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => parse_yaml_workflow(path)?,
            Some("md") => parse_markdown_workflow(path)?,
            _ => continue,
        };

        definition
            .validate()
            .map_err(|reason| ConfigError::InvalidConfig {
                path: path.to_path_buf(),
                reason,
            })?;

        if let Some(first) = sources.get(&definition.name) {
            return Err(ConfigError::DuplicateWorkflow {
                name: definition.name,
                first: first.clone(),
                second: path.to_path_buf(),
            });
        }

        debug!(name = %definition.name, path = %path.display(), "loaded workflow");
        sources.insert(definition.name.clone(), path.to_path_buf());
        workflows.push(definition);
    }

    Ok(workflows)
}

fn read_file(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_yaml_workflow(path: &Path) -> ConfigResult<WorkflowDefinition> {
    let content = read_file(path)?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_markdown_workflow(path: &Path) -> ConfigResult<WorkflowDefinition> {
    let content = read_file(path)?;

    let matter = Matter::<YAML>::new();
    let result = matter.parse(&content);

    let mut definition: WorkflowDefinition = result
        .data
        .ok_or_else(|| ConfigError::MarkdownParse {
            path: path.to_path_buf(),
            reason: "Missing YAML front matter".to_string(),
        })?
        .deserialize()
        .map_err(|e| ConfigError::MarkdownParse {
            path: path.to_path_buf(),
            reason: format!("Failed to deserialize front matter: {}", e),
        })?;

    // The body wins over an `initial-message` key when both are present
    let body = result.content.trim();
    if !body.is_empty() {
        definition.initial_message = body.to_string();
    }

    Ok(definition)
}
