//! Conversational workflow engine.
//!
//! The WorkflowEngine keeps a single linear, user-visible conversation log
//! that mirrors a wizard-style workflow. Callers drive it forward with new
//! messages, through transient loading states, and backward by editing a
//! past message. The engine performs no timers or background work of its
//! own; see [`crate::session`] for the code that sequences it.

use tracing::{debug, trace};
use wk_protocol::message_models::{
    ChatRole, ConversationSnapshot, Message, MessageId, MessageRole,
};
use wk_protocol::workflow_models::{WorkflowConfig, WorkflowStep};

/// Ordered, append-only conversation log with step tracking.
///
/// Invariants maintained by every mutating method:
/// - message ids are unique for the lifetime of the engine
/// - at most one message has the `Loading` role
/// - at most one message is the active customization
///
/// The log only shrinks through [`remove_loading_message`] and
/// [`handle_edit_message`].
///
/// [`remove_loading_message`]: WorkflowEngine::remove_loading_message
/// [`handle_edit_message`]: WorkflowEngine::handle_edit_message
#[derive(Debug, Clone)]
pub struct WorkflowEngine<C> {
    config: WorkflowConfig<C>,
    messages: Vec<Message<C>>,
    current_step: usize,
    active_customization_id: Option<MessageId>,
}

impl<C: Clone> WorkflowEngine<C> {
    /// Create an engine for the given workflow.
    ///
    /// The log stays empty until [`initialize`](Self::initialize) is called.
    pub fn new(config: WorkflowConfig<C>) -> Self {
        Self {
            config,
            messages: Vec::new(),
            current_step: 1,
            active_customization_id: None,
        }
    }

    /// Reset the conversation to the initial message at step 1.
    ///
    /// Clears any active customization. Calling this repeatedly always
    /// yields the same observable state.
    pub fn initialize(&mut self) -> &[Message<C>] {
        let initial = Message::new(
            MessageRole::System,
            self.config.initial_message.clone(),
            false,
            1,
        );
        self.messages = vec![initial];
        self.current_step = 1;
        self.active_customization_id = None;
        trace!("workflow engine initialized");
        &self.messages
    }

    /// Append a permanent message stamped with the current step.
    ///
    /// With `show_customization` the new message becomes the active
    /// customization, replacing any previous one. The step is left
    /// untouched; callers advance it explicitly.
    pub fn add_message(
        &mut self,
        role: ChatRole,
        content: C,
        show_customization: bool,
    ) -> MessageId {
        let message = Message::new(role.into(), content, show_customization, self.current_step);
        let id = message.id;
        self.messages.push(message);
        if show_customization {
            self.active_customization_id = Some(id);
        }
        trace!(%id, ?role, step = self.current_step, show_customization, "message added");
        id
    }

    /// Insert the transient loading message.
    ///
    /// An existing loading message is replaced: it is removed and the new
    /// one is appended at the end of the log with a fresh id.
    pub fn add_loading_message(&mut self, content: C) {
        if let Some(index) = self.loading_index() {
            let replaced = self.messages.remove(index);
            debug!(id = %replaced.id, "replacing existing loading message");
        }
        let message = Message::new(MessageRole::Loading, content, false, self.current_step);
        trace!(id = %message.id, "loading message added");
        self.messages.push(message);
    }

    /// Replace the loading message's content, keeping its id and position.
    ///
    /// Does nothing when no loading message exists.
    pub fn update_loading_message(&mut self, content: C) {
        match self.messages.iter_mut().find(|m| m.is_loading()) {
            Some(message) => {
                message.content = content;
                trace!(id = %message.id, "loading message updated");
            }
            None => debug!("update_loading_message ignored: no loading message"),
        }
    }

    /// Delete the loading message. Idempotent.
    pub fn remove_loading_message(&mut self) {
        if let Some(index) = self.loading_index() {
            let removed = self.messages.remove(index);
            trace!(id = %removed.id, "loading message removed");
        }
    }

    /// Current log in display order.
    pub fn messages(&self) -> &[Message<C>] {
        &self.messages
    }

    /// Id of the message carrying the live customization control.
    pub fn active_customization_id(&self) -> Option<MessageId> {
        self.active_customization_id
    }

    /// Stop rendering the current control without touching the log.
    pub fn clear_active_customization(&mut self) {
        self.active_customization_id = None;
    }

    /// 1-based index of the current step.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Rewind the conversation to just before `id`.
    ///
    /// Removes the message and everything after it, restores the step that
    /// was active when it was created and recomputes the active
    /// customization from the last remaining message. Unknown ids are
    /// ignored.
    pub fn handle_edit_message(&mut self, id: MessageId) {
        let Some(index) = self.position(id) else {
            debug!(%id, "handle_edit_message ignored: unknown message id");
            return;
        };

        let step = if index == 0 { 1 } else { self.messages[index].step };
        self.messages.truncate(index);
        self.current_step = step;
        self.active_customization_id = self
            .messages
            .last()
            .filter(|m| m.show_customization)
            .map(|m| m.id);

        debug!(
            %id,
            step,
            remaining = self.messages.len(),
            "conversation rewound"
        );
    }

    /// Move to the next step, staying on the last one once reached.
    pub fn advance_step(&mut self) -> usize {
        if self.current_step < self.config.step_count() {
            self.current_step += 1;
        }
        self.current_step
    }

    /// Jump to `step`, clamped to the configured range.
    pub fn set_current_step(&mut self, step: usize) {
        self.current_step = step.clamp(1, self.config.step_count().max(1));
    }

    /// Whether the current step is the final configured one.
    pub fn is_last_step(&self) -> bool {
        self.current_step >= self.config.step_count()
    }

    /// Copy of the observable state for rendering consumers.
    pub fn snapshot(&self) -> ConversationSnapshot<C> {
        ConversationSnapshot {
            messages: self.messages.clone(),
            current_step: self.current_step,
            active_customization_id: self.active_customization_id,
        }
    }

    pub fn config(&self) -> &WorkflowConfig<C> {
        &self.config
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.config.steps
    }

    /// Descriptor of the 1-based `step`.
    pub fn step(&self, step: usize) -> Option<&WorkflowStep> {
        step.checked_sub(1).and_then(|i| self.config.steps.get(i))
    }

    /// Descriptor of the current step.
    pub fn current_step_descriptor(&self) -> Option<&WorkflowStep> {
        self.step(self.current_step)
    }

    pub fn message(&self, id: MessageId) -> Option<&Message<C>> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.position(id).is_some()
    }

    pub fn loading_message(&self) -> Option<&Message<C>> {
        self.messages.iter().find(|m| m.is_loading())
    }

    pub fn has_loading_message(&self) -> bool {
        self.loading_index().is_some()
    }

    fn position(&self, id: MessageId) -> Option<usize> {
        self.messages.iter().position(|m| m.id == id)
    }

    fn loading_index(&self) -> Option<usize> {
        self.messages.iter().position(|m| m.is_loading())
    }
}
