//! Global configuration models for `.workflow-kit/config.toml`.
//!
//! This module defines the structure of the global configuration file that
//! controls project-wide settings for workflow-kit.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

/// Represents global settings from `.workflow-kit/config.toml`.
///
/// # Example
///
/// ```toml
/// # .workflow-kit/config.toml
/// time-scale = 0.5
/// default-workflow = "peer-comparison"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Multiplier applied to every processing delay.
    ///
    /// `1.0` plays workflows at their scripted pace, `0.0` makes every
    /// stage complete immediately.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,

    /// Workflow opened when none is named on the command line.
    #[serde(default)]
    pub default_workflow: Option<String>,
}

fn default_time_scale() -> f64 {
    1.0
}

impl GlobalConfig {
    /// A usable time scale is finite and not negative.
    pub fn has_valid_time_scale(&self) -> bool {
        self.time_scale.is_finite() && self.time_scale >= 0.0
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
            default_workflow: None,
        }
    }
}
