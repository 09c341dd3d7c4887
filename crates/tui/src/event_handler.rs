//! Folding core events into the state the TUI renders.
//!
//! The session sends a full snapshot after every change, so the TUI keeps
//! only the latest snapshot plus a few flags derived from the lifecycle
//! events around it.

use wk_protocol::ipc::Event;
use wk_protocol::message_models::ConversationSnapshot;
use wk_protocol::workflow_models::WorkflowStep;

/// Severity of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Everything the TUI knows about the session it is attached to.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    pub workflow_name: String,
    pub steps: Vec<WorkflowStep>,
    pub snapshot: ConversationSnapshot<String>,
    /// Step whose processing script is running, if any.
    pub processing_step: Option<usize>,
    pub completed: bool,
    pub closed: bool,
    /// One-line message shown under the composer.
    pub status: Option<(StatusKind, String)>,
}

impl ConversationState {
    pub fn is_processing(&self) -> bool {
        self.processing_step.is_some()
    }

    /// Title of the step the user is currently answering.
    pub fn current_step_title(&self) -> Option<&str> {
        self.snapshot
            .current_step
            .checked_sub(1)
            .and_then(|i| self.steps.get(i))
            .map(|s| s.title.as_str())
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some((kind, text.into()));
    }
}

/// Apply an event received from the core.
pub fn handle_core_event(state: &mut ConversationState, event: Event) {
    match event {
        Event::SessionStarted {
            workflow_name,
            steps,
        } => {
            *state = ConversationState {
                workflow_name,
                steps,
                ..ConversationState::default()
            };
        }
        Event::ConversationUpdated { snapshot } => {
            // Completion is announced after the final snapshot; any later
            // snapshot comes from an edit or restart.
            state.completed = false;
            state.snapshot = snapshot;
        }
        Event::ProcessingStarted { step } => {
            state.processing_step = Some(step);
            state.set_status(StatusKind::Info, format!("Processing step {}...", step));
        }
        Event::ProcessingFinished { .. } => {
            state.processing_step = None;
            state.status = None;
        }
        Event::ProcessingCancelled { step } => {
            state.processing_step = None;
            state.set_status(StatusKind::Info, format!("Step {} cancelled", step));
        }
        Event::WorkflowCompleted => {
            state.completed = true;
            state.set_status(
                StatusKind::Info,
                "Workflow complete. Edit a message or /restart to explore further.",
            );
        }
        Event::SessionError { error } => {
            state.set_status(StatusKind::Error, error);
        }
        Event::SessionClosed => {
            state.closed = true;
            state.processing_step = None;
        }
    }
}
