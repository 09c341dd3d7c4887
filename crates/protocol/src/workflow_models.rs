//! Workflow definition models for `.workflow-kit/workflows/*`.
//!
//! A workflow is a fixed, linear wizard sequence. The engine only needs the
//! step descriptors and the initial message ([`WorkflowConfig`]); a
//! [`WorkflowDefinition`] additionally scripts what happens after the user
//! answers each step: a series of timed loading stages followed by a canned
//! response.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

/// Descriptor of one stage in a workflow.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct WorkflowStep {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Static description an engine is constructed with.
///
/// Immutable for the engine's lifetime.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct WorkflowConfig<C> {
    /// Content of the system message the conversation starts with.
    pub initial_message: C,

    /// Ordered step descriptors. Step `n` (1-based) is `steps[n - 1]`.
    pub steps: Vec<WorkflowStep>,
}

impl<C> WorkflowConfig<C> {
    pub fn new(initial_message: C, steps: Vec<WorkflowStep>) -> Self {
        Self {
            initial_message,
            steps,
        }
    }

    /// Number of configured steps, never less than one.
    pub fn step_count(&self) -> usize {
        self.steps.len().max(1)
    }
}

/// One simulated processing stage, shown as the loading message text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct ProcessingStage {
    /// Text of the loading message while this stage runs.
    pub message: String,

    /// How long the stage lasts before the next one starts.
    #[serde(default = "default_stage_delay_ms")]
    pub delay_ms: u64,
}

fn default_stage_delay_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

/// A step descriptor together with its processing script.
///
/// # Example
///
/// ```yaml
/// id: 1
/// title: Upload Document
/// description: Provide the annual report to analyse
/// processing:
///   - message: "Parsing document..."
///     delay-ms: 1500
///   - message: "Extracting tables..."
/// response: "Found 14 tables and 6 charts."
/// customization: true
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct ScriptedStep {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,

    /// Loading stages played after the user's input for this step.
    #[serde(default)]
    pub processing: Vec<ProcessingStage>,

    /// System message presented once processing finishes.
    pub response: String,

    /// Whether the response carries the control for the next step's input.
    #[serde(default = "default_true")]
    pub customization: bool,
}

impl ScriptedStep {
    /// The bare descriptor the engine is configured with.
    pub fn descriptor(&self) -> WorkflowStep {
        WorkflowStep {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }

    /// Sum of all stage delays in milliseconds.
    pub fn total_delay_ms(&self) -> u64 {
        self.processing.iter().map(|s| s.delay_ms).sum()
    }
}

/// A complete scripted workflow, as stored in `.workflow-kit/workflows/`.
///
/// # Example
///
/// ```yaml
/// name: peer-comparison
/// description: Benchmark a company against listed peers
/// initial-message: "Which company should we analyse?"
/// steps:
///   - id: 1
///     title: Select Company
///     processing:
///       - message: "Fetching company profile..."
///         delay-ms: 1200
///     response: "Found 6 peers. Choose the metrics to compare."
///   - id: 2
///     title: Review Results
///     response: "Comparison ready."
///     customization: false
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct WorkflowDefinition {
    /// Unique name identifying this workflow.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Opening system message.
    ///
    /// Markdown definitions may leave this out and use the file body instead.
    #[serde(default)]
    pub initial_message: String,

    /// Ordered, scripted steps.
    pub steps: Vec<ScriptedStep>,
}

impl WorkflowDefinition {
    /// Engine configuration for this workflow.
    pub fn to_config(&self) -> WorkflowConfig<String> {
        WorkflowConfig {
            initial_message: self.initial_message.clone(),
            steps: self.steps.iter().map(ScriptedStep::descriptor).collect(),
        }
    }

    /// Script for the 1-based `step`.
    pub fn step(&self, step: usize) -> Option<&ScriptedStep> {
        step.checked_sub(1).and_then(|index| self.steps.get(index))
    }

    /// Check the structural rules a definition must satisfy.
    ///
    /// Returns a human-readable reason for the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("workflow name must not be empty".to_string());
        }
        if self.initial_message.trim().is_empty() {
            return Err(format!("workflow '{}' has no initial message", self.name));
        }
        if self.steps.is_empty() {
            return Err(format!("workflow '{}' defines no steps", self.name));
        }
        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.id) {
                return Err(format!(
                    "workflow '{}' has duplicate step id {}",
                    self.name, step.id
                ));
            }
        }
        Ok(())
    }
}
