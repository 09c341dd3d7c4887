//! Inter-process communication protocol.
//!
//! This module defines the message types for asynchronous communication
//! between a rendering front end (TUI or headless CLI) and a workflow
//! session running in the Core.
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: Commands sent from the front end to the session
//! - `Event`: State changes sent from the session to the front end
//!
//! Every mutation of the conversation is followed by a
//! `ConversationUpdated` event carrying a full snapshot, so front ends never
//! have to reconstruct the log from deltas.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use ts_rs::TS;

use crate::message_models::{ConversationSnapshot, MessageId};
use crate::workflow_models::WorkflowStep;

/// Sending half of the op channel.
pub type OpSender = mpsc::Sender<Op>;

/// Sending half of the event channel.
pub type EventSender = mpsc::Sender<Event>;

/// Operations sent from the front end to a workflow session.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "submitInput",
///   "payload": { "content": "Acme Corp" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Answer the current step.
    ///
    /// Appends a user message and starts the step's processing script.
    SubmitInput { content: String },

    /// Rewind the conversation to before the given message.
    EditMessage { message_id: MessageId },

    /// Discard the conversation and start over from the initial message.
    Restart,

    /// Tear the session down. Pending continuations are cancelled.
    Shutdown,
}

/// Events sent from a workflow session to the front end.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "processingStarted",
///   "payload": { "step": 2 }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// The session was initialized for a workflow.
    SessionStarted {
        workflow_name: String,
        steps: Vec<WorkflowStep>,
    },

    /// The conversation changed; re-render from this snapshot.
    ConversationUpdated {
        snapshot: ConversationSnapshot<String>,
    },

    /// Simulated processing for a step has begun.
    ProcessingStarted { step: usize },

    /// Simulated processing for a step finished and its response was added.
    ProcessingFinished { step: usize },

    /// Simulated processing was cancelled by an edit or restart.
    ProcessingCancelled { step: usize },

    /// The final step has been answered.
    WorkflowCompleted,

    /// An operation was rejected.
    SessionError { error: String },

    /// The session was torn down.
    SessionClosed,
}
