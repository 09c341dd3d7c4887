//! Workflow sessions.
//!
//! A [`WorkflowSession`] is the single owner of one [`WorkflowEngine`] and
//! plays a scripted [`WorkflowDefinition`] against it: user input is
//! appended, the step's loading stages are played as cancellable
//! continuations, and the response presenting the next step's control is
//! added once they finish. Every change is reported as an [`Event`].
//!
//! - [`pipeline`]: the per-step processing continuation
//! - [`driver`]: the Op loop that feeds a session from a front end

pub mod driver;
pub mod error;
pub mod pipeline;

pub use error::{SessionError, SessionResult};

use crate::engine::WorkflowEngine;
use crate::scheduler::{Scheduler, TaskHandle};
use pipeline::StepPlan;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use wk_protocol::ipc::{Event, EventSender};
use wk_protocol::message_models::{ChatRole, ConversationSnapshot, MessageId};
use wk_protocol::workflow_models::WorkflowDefinition;

/// State shared between a session and its in-flight pipeline.
#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) engine: WorkflowEngine<String>,
    /// Step whose processing script is currently running.
    pub(crate) processing_step: Option<usize>,
    /// Set once the final step's response has been added.
    pub(crate) completed: bool,
}

pub(crate) type SharedState = Arc<Mutex<SessionState>>;

/// Send an event, ignoring a closed channel.
pub(crate) async fn emit(events_tx: &EventSender, event: Event) {
    let _ = events_tx.send(event).await;
}

/// Send a snapshot of the conversation. Callers hold the state lock so
/// snapshots reach the front end in mutation order.
pub(crate) async fn emit_snapshot(state: &SessionState, events_tx: &EventSender) {
    emit(
        events_tx,
        Event::ConversationUpdated {
            snapshot: state.engine.snapshot(),
        },
    )
    .await;
}

#[derive(Debug)]
struct InFlight {
    step: usize,
    handle: TaskHandle,
}

/// Plays one scripted workflow for one front end.
///
/// Dropping the session cancels every pending continuation.
pub struct WorkflowSession {
    definition: Arc<WorkflowDefinition>,
    state: SharedState,
    scheduler: Scheduler,
    in_flight: Option<InFlight>,
    time_scale: f64,
    events_tx: EventSender,
}

impl WorkflowSession {
    /// Create a session for `definition`, reporting through `events_tx`.
    ///
    /// The conversation is empty until [`start`](Self::start) is called.
    pub fn new(definition: WorkflowDefinition, events_tx: EventSender) -> Self {
        let engine = WorkflowEngine::new(definition.to_config());
        Self {
            definition: Arc::new(definition),
            state: Arc::new(Mutex::new(SessionState {
                engine,
                processing_step: None,
                completed: false,
            })),
            scheduler: Scheduler::new(),
            in_flight: None,
            time_scale: 1.0,
            events_tx,
        }
    }

    /// Multiply every processing delay by `time_scale`.
    ///
    /// Negative or non-finite values are ignored.
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        if time_scale.is_finite() && time_scale >= 0.0 {
            self.time_scale = time_scale;
        } else {
            warn!(time_scale, "ignoring invalid time scale");
        }
        self
    }

    pub fn definition(&self) -> &WorkflowDefinition {
        &self.definition
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Initialize the conversation and announce the workflow.
    pub async fn start(&mut self) {
        info!(workflow = %self.definition.name, "starting workflow session");
        emit(
            &self.events_tx,
            Event::SessionStarted {
                workflow_name: self.definition.name.clone(),
                steps: self.definition.to_config().steps,
            },
        )
        .await;
        self.reset().await;
    }

    /// Discard the conversation and start again from the initial message.
    pub async fn restart(&mut self) -> SessionResult<()> {
        self.ensure_open()?;
        info!(workflow = %self.definition.name, "restarting workflow session");
        self.reset().await;
        Ok(())
    }

    /// Answer the current step with `content`.
    ///
    /// Appends the user message and schedules the step's processing
    /// pipeline. Returns the id of the user message.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Busy`] while a step is processing
    /// - [`SessionError::WorkflowComplete`] after the final step
    /// - [`SessionError::Closed`] after shutdown
    pub async fn submit_input(&mut self, content: String) -> SessionResult<MessageId> {
        self.ensure_open()?;

        let state_arc = Arc::clone(&self.state);
        let mut state = state_arc.lock().await;

        if let Some(step) = state.processing_step {
            return Err(SessionError::Busy { step });
        }
        if state.completed {
            return Err(SessionError::WorkflowComplete(self.definition.name.clone()));
        }

        let step = state.engine.current_step();
        let script = self
            .definition
            .step(step)
            .ok_or(SessionError::StepOutOfRange {
                step,
                steps: self.definition.steps.len(),
            })?;
        let plan = StepPlan::new(step, script, state.engine.is_last_step(), self.time_scale);

        state.engine.clear_active_customization();
        let id = state.engine.add_message(ChatRole::User, content, false);
        state.processing_step = Some(step);

        emit_snapshot(&state, &self.events_tx).await;
        emit(&self.events_tx, Event::ProcessingStarted { step }).await;
        debug!(step, total_delay = ?plan.total_delay(), "scheduling step processing");

        let shared = Arc::clone(&self.state);
        let events_tx = self.events_tx.clone();
        let handle = self
            .scheduler
            .spawn(move |token| pipeline::run(plan, shared, events_tx, token));
        self.in_flight = Some(InFlight { step, handle });

        Ok(id)
    }

    /// Rewind the conversation to just before message `id`.
    ///
    /// Cancels any processing in flight. Returns `false` without changing
    /// anything when `id` is not in the conversation.
    pub async fn edit_message(&mut self, id: MessageId) -> SessionResult<bool> {
        self.ensure_open()?;

        let state_arc = Arc::clone(&self.state);
        let mut state = state_arc.lock().await;

        if !state.engine.contains(id) {
            debug!(%id, "edit ignored: unknown message id");
            return Ok(false);
        }

        let cancelled = self.cancel_in_flight(&mut state);
        state.engine.handle_edit_message(id);
        state.engine.remove_loading_message();
        state.completed = false;

        if let Some(step) = cancelled {
            emit(&self.events_tx, Event::ProcessingCancelled { step }).await;
        }
        emit_snapshot(&state, &self.events_tx).await;
        info!(%id, step = state.engine.current_step(), "conversation rewound");

        Ok(true)
    }

    /// Wait until the processing in flight (if any) has stopped.
    pub async fn wait_idle(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.handle.join().await;
        }
    }

    /// Cancel every pending continuation and close the session.
    ///
    /// Later operations fail with [`SessionError::Closed`].
    pub async fn shutdown(&mut self) {
        if self.scheduler.is_shut_down() {
            return;
        }
        self.scheduler.shutdown();
        self.in_flight = None;
        self.state.lock().await.processing_step = None;
        emit(&self.events_tx, Event::SessionClosed).await;
        info!(workflow = %self.definition.name, "workflow session closed");
    }

    /// Copy of the current conversation.
    pub async fn snapshot(&self) -> ConversationSnapshot<String> {
        self.state.lock().await.engine.snapshot()
    }

    pub async fn current_step(&self) -> usize {
        self.state.lock().await.engine.current_step()
    }

    pub async fn is_processing(&self) -> bool {
        self.state.lock().await.processing_step.is_some()
    }

    pub async fn is_completed(&self) -> bool {
        self.state.lock().await.completed
    }

    pub fn is_closed(&self) -> bool {
        self.scheduler.is_shut_down()
    }

    /// Report a rejected operation to the front end.
    pub async fn report(&self, error: &SessionError) {
        warn!("workflow session rejected operation: {error}");
        emit(
            &self.events_tx,
            Event::SessionError {
                error: error.to_string(),
            },
        )
        .await;
    }

    async fn reset(&mut self) {
        let state_arc = Arc::clone(&self.state);
        let mut state = state_arc.lock().await;

        let cancelled = self.cancel_in_flight(&mut state);
        state.engine.initialize();
        state.completed = false;

        if let Some(step) = cancelled {
            emit(&self.events_tx, Event::ProcessingCancelled { step }).await;
        }
        emit_snapshot(&state, &self.events_tx).await;
    }

    /// Cancel the in-flight pipeline. Must be called with the state locked
    /// so the pipeline cannot write after this returns.
    fn cancel_in_flight(&mut self, state: &mut SessionState) -> Option<usize> {
        let step = state.processing_step.take();
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.handle.cancel();
            debug!(step = in_flight.step, "cancelled in-flight processing");
        }
        step
    }

    fn ensure_open(&self) -> SessionResult<()> {
        if self.scheduler.is_shut_down() {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }
}
