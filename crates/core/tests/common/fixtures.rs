//! Test fixtures for creating sample workflows and test data.

use tempfile::TempDir;
use tokio::sync::mpsc;
use wk_protocol::ipc::Event;
use wk_protocol::workflow_models::{ProcessingStage, ScriptedStep, WorkflowDefinition};

/// Build a scripted step whose processing stages last `delays` milliseconds.
pub fn create_test_step(id: u32, title: &str, delays: &[u64], response: &str) -> ScriptedStep {
    ScriptedStep {
        id,
        title: title.to_string(),
        description: format!("{} step", title),
        processing: delays
            .iter()
            .enumerate()
            .map(|(i, &delay_ms)| ProcessingStage {
                message: format!("{} stage {}", title, i + 1),
                delay_ms,
            })
            .collect(),
        response: response.to_string(),
        customization: true,
    }
}

/// Three-step peer comparison workflow.
///
/// Step 1 has two stages (1000ms + 500ms), step 2 has one stage (800ms) and
/// step 3 has one stage (200ms).
pub fn create_test_definition() -> WorkflowDefinition {
    WorkflowDefinition {
        name: "peer-comparison".to_string(),
        description: "Benchmark a company against peers".to_string(),
        initial_message: "Which company should we analyse?".to_string(),
        steps: vec![
            create_test_step(1, "Select Company", &[1000, 500], "Found 6 peers."),
            create_test_step(2, "Choose Metrics", &[800], "Metrics computed."),
            create_test_step(3, "Review", &[200], "Comparison ready."),
        ],
    }
}

/// Create a temporary project directory with a `.workflow-kit/` configuration.
///
/// Returns a TempDir that must be kept alive for the test duration.
#[allow(dead_code)]
pub fn create_test_project() -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let wk_dir = temp_dir.path().join(".workflow-kit");
    std::fs::create_dir_all(wk_dir.join("workflows"))?;

    std::fs::write(wk_dir.join("config.toml"), "time-scale = 0.0\n")?;

    let yaml = r#"name: chart-extraction
initial-message: "Which filing should I scan?"
steps:
  - id: 1
    title: Select Filing
    processing:
      - message: "Scanning pages..."
        delay-ms: 1500
    response: "Found 11 charts."
  - id: 2
    title: Digitise
    processing:
      - message: "Reading data points..."
    response: "Digitised 9 charts."
    customization: false
"#;
    std::fs::write(wk_dir.join("workflows/chart-extraction.yaml"), yaml)?;

    Ok(temp_dir)
}

/// Drain every event currently buffered in `rx`.
#[allow(dead_code)]
pub fn drain_events(rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
