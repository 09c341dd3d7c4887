//! Configuration models that aggregate all settings.
//!
//! This module provides the unified `AppConfig` structure that combines
//! global settings and workflow definitions into a single configuration
//! object.

use wk_protocol::config_models::GlobalConfig;
use wk_protocol::workflow_models::WorkflowDefinition;

/// Unified application configuration loaded from `.workflow-kit/` directory.
///
/// This structure aggregates all configuration sources:
/// - `config.toml`: Global settings
/// - `workflows/*.yaml`, `workflows/*.md`: Workflow definitions
///
/// # Example
///
/// ```rust,no_run
/// use wk_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} workflows", config.workflows.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Global settings from `config.toml`.
    pub global: GlobalConfig,

    /// All workflow definitions, ordered by file name.
    pub workflows: Vec<WorkflowDefinition>,
}

impl AppConfig {
    /// Look up a workflow by name.
    pub fn workflow(&self, name: &str) -> Option<&WorkflowDefinition> {
        self.workflows.iter().find(|w| w.name == name)
    }

    /// The workflow named by `default-workflow`, or the first one loaded.
    pub fn default_workflow(&self) -> Option<&WorkflowDefinition> {
        match &self.global.default_workflow {
            Some(name) => self.workflow(name),
            None => self.workflows.first(),
        }
    }

    pub fn workflow_names(&self) -> Vec<&str> {
        self.workflows.iter().map(|w| w.name.as_str()).collect()
    }
}
