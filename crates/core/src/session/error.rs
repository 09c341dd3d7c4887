//! Error types for workflow session operations.

use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Reasons a session rejects an operation.
///
/// None of these leave the conversation in a modified state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A step's processing script is still running.
    #[error("Step {step} is still processing. Wait for it to finish or edit an earlier message.")]
    Busy { step: usize },

    /// The final step has already been answered.
    #[error("Workflow '{0}' is already complete. Edit a message or restart to continue.")]
    WorkflowComplete(String),

    /// The engine's current step has no script in the workflow definition.
    #[error("Step {step} is not defined (workflow has {steps} steps)")]
    StepOutOfRange { step: usize, steps: usize },

    /// The session has been shut down.
    #[error("Session has been shut down")]
    Closed,
}
