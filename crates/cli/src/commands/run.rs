//! Headless playback of a workflow.
//!
//! Answers are fed from `--input` values one step at a time. Each answer is
//! sent once the previous step's processing has finished, so the transcript
//! reads exactly as it would in the interactive UI.

use super::select_workflow;
use crate::cli::RunArgs;
use crate::transcript::TranscriptPrinter;
use color_eyre::eyre::{eyre, Result};
use std::collections::VecDeque;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use wk_core::config::loader::load_config;
use wk_core::session::{driver, WorkflowSession};
use wk_protocol::ipc::{Event, Op};
use wk_protocol::message_models::ConversationSnapshot;

pub async fn execute(root: &Path, args: RunArgs) -> Result<()> {
    let config = load_config(root).await?;
    let definition = select_workflow(&config, Some(&args.name))?;
    let step_count = definition.steps.len();
    let workflow_name = definition.name.clone();

    let time_scale = if args.instant {
        0.0
    } else {
        config.global.time_scale
    };
    info!(workflow = %workflow_name, time_scale, inputs = args.inputs.len(), "running workflow");

    let (op_tx, op_rx) = mpsc::channel(16);
    let (event_tx, mut event_rx) = mpsc::channel(256);
    let session = WorkflowSession::new(definition, event_tx).with_time_scale(time_scale);
    let session_task = driver::spawn(session, op_rx);

    let mut inputs: VecDeque<String> = args.inputs.into();
    let mut printer = (!args.json).then(|| TranscriptPrinter::new(std::io::stdout()));
    let mut last_snapshot = ConversationSnapshot::default();
    let mut completed = false;
    let mut failure: Option<String> = None;

    while let Some(event) = event_rx.recv().await {
        if let Some(printer) = printer.as_mut() {
            printer.handle(&event)?;
        }

        let next = match event {
            Event::SessionStarted { .. } => next_op(&mut inputs),
            Event::ConversationUpdated { snapshot } => {
                last_snapshot = snapshot;
                None
            }
            Event::ProcessingFinished { step } if step < step_count => next_op(&mut inputs),
            Event::WorkflowCompleted => {
                completed = true;
                if !inputs.is_empty() {
                    warn!(unused = inputs.len(), "workflow finished with inputs left over");
                }
                Some(Op::Shutdown)
            }
            Event::SessionError { error } => {
                failure = Some(error);
                Some(Op::Shutdown)
            }
            Event::SessionClosed => break,
            Event::ProcessingStarted { .. }
            | Event::ProcessingFinished { .. }
            | Event::ProcessingCancelled { .. } => None,
        };

        if let Some(op) = next {
            debug!(?op, "sending op");
            // Session already gone if this fails; SessionClosed ends the loop
            let _ = op_tx.send(op).await;
        }
    }

    drop(event_rx);
    drop(op_tx);
    session_task.await?;

    if args.json {
        let output = serde_json::json!({
            "workflow": workflow_name,
            "completed": completed,
            "conversation": last_snapshot,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    match failure {
        Some(error) => Err(eyre!("workflow '{workflow_name}' failed: {error}")),
        None => Ok(()),
    }
}

/// The next answer, or shutdown once the inputs run out.
fn next_op(inputs: &mut VecDeque<String>) -> Option<Op> {
    Some(match inputs.pop_front() {
        Some(content) => Op::SubmitInput { content },
        None => Op::Shutdown,
    })
}
