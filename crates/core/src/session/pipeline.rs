//! Processing pipeline for a single workflow step.
//!
//! After the user answers a step, the session schedules this pipeline as a
//! cancellable continuation. It plays the step's loading stages with their
//! delays, then removes the loading message and presents the step's
//! response.

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use wk_protocol::ipc::{Event, EventSender};
use wk_protocol::message_models::ChatRole;
use wk_protocol::workflow_models::ScriptedStep;

use super::{emit, emit_snapshot, SharedState};
use crate::scheduler::delay;

/// A loading stage with its delay already scaled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStage {
    pub message: String,
    pub delay: Duration,
}

/// Everything a pipeline run needs, resolved when the input is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPlan {
    /// 1-based step being processed.
    pub step: usize,
    pub stages: Vec<PlannedStage>,
    pub response: String,
    /// Whether the response carries the next step's control.
    pub customization: bool,
    /// The final step completes the workflow instead of advancing.
    pub is_last: bool,
}

impl StepPlan {
    pub fn new(step: usize, script: &ScriptedStep, is_last: bool, time_scale: f64) -> Self {
        let stages = script
            .processing
            .iter()
            .map(|stage| PlannedStage {
                message: stage.message.clone(),
                delay: scale_delay(stage.delay_ms, time_scale),
            })
            .collect();

        Self {
            step,
            stages,
            response: script.response.clone(),
            customization: script.customization && !is_last,
            is_last,
        }
    }

    /// Total simulated processing time.
    pub fn total_delay(&self) -> Duration {
        self.stages.iter().map(|s| s.delay).sum()
    }
}

/// Scale a scripted delay, saturating instead of overflowing.
pub fn scale_delay(delay_ms: u64, time_scale: f64) -> Duration {
    let secs = delay_ms as f64 / 1000.0 * time_scale;
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Play `plan` against the shared session state.
///
/// Every write happens under the state lock after re-checking `token`, so
/// a pipeline cancelled by an edit, restart or shutdown never touches the
/// conversation again.
pub(crate) async fn run(
    plan: StepPlan,
    state: SharedState,
    events_tx: EventSender,
    token: CancellationToken,
) {
    for (index, stage) in plan.stages.iter().enumerate() {
        {
            let mut guard = state.lock().await;
            if token.is_cancelled() {
                debug!(step = plan.step, "processing cancelled before stage {index}");
                return;
            }
            if index == 0 {
                guard.engine.add_loading_message(stage.message.clone());
            } else {
                guard.engine.update_loading_message(stage.message.clone());
            }
            emit_snapshot(&guard, &events_tx).await;
        }

        if delay(&token, stage.delay).await.is_err() {
            debug!(step = plan.step, "processing cancelled during stage {index}");
            return;
        }
    }

    let mut guard = state.lock().await;
    if token.is_cancelled() {
        debug!(step = plan.step, "processing cancelled before response");
        return;
    }

    guard.engine.remove_loading_message();
    if plan.is_last {
        guard
            .engine
            .add_message(ChatRole::System, plan.response.clone(), false);
        guard.completed = true;
    } else {
        guard.engine.advance_step();
        guard
            .engine
            .add_message(ChatRole::System, plan.response.clone(), plan.customization);
    }
    guard.processing_step = None;

    emit_snapshot(&guard, &events_tx).await;
    emit(&events_tx, Event::ProcessingFinished { step: plan.step }).await;
    if plan.is_last {
        emit(&events_tx, Event::WorkflowCompleted).await;
    }
    debug!(step = plan.step, "processing finished");
}
