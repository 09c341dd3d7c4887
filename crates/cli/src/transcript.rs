//! Live transcript printing for headless runs.
//!
//! The session reports full snapshots, so the printer remembers which
//! messages it has already shown and prints only the new ones.

use colored::Colorize;
use std::collections::HashSet;
use std::io::Write;
use wk_protocol::ipc::Event;
use wk_protocol::message_models::{ConversationSnapshot, Message, MessageId, MessageRole};

/// Turns session events into terminal output.
pub struct TranscriptPrinter<W: Write> {
    out: W,
    printed: HashSet<MessageId>,
    last_loading: Option<String>,
}

impl<W: Write> TranscriptPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: HashSet::new(),
            last_loading: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print whatever `event` adds to the transcript.
    pub fn handle(&mut self, event: &Event) -> std::io::Result<()> {
        match event {
            Event::SessionStarted {
                workflow_name,
                steps,
            } => {
                writeln!(
                    self.out,
                    "{} {} ({} steps)",
                    "▶".green().bold(),
                    workflow_name.bold(),
                    steps.len()
                )?;
                writeln!(self.out)?;
            }
            Event::ConversationUpdated { snapshot } => self.print_snapshot(snapshot)?,
            Event::ProcessingCancelled { step } => {
                writeln!(self.out, "{}", format!("Step {} cancelled", step).yellow())?;
            }
            Event::WorkflowCompleted => {
                writeln!(self.out, "{} Workflow complete", "✔".green().bold())?;
            }
            Event::SessionError { error } => {
                writeln!(self.out, "{} {}", "error:".red().bold(), error)?;
            }
            Event::ProcessingStarted { .. }
            | Event::ProcessingFinished { .. }
            | Event::SessionClosed => {}
        }
        self.out.flush()
    }

    fn print_snapshot(&mut self, snapshot: &ConversationSnapshot<String>) -> std::io::Result<()> {
        for message in &snapshot.messages {
            if message.role == MessageRole::Loading {
                if self.last_loading.as_deref() != Some(message.content.as_str()) {
                    writeln!(self.out, "  {} {}", "…".dimmed(), message.content.dimmed())?;
                    self.last_loading = Some(message.content.clone());
                }
                continue;
            }

            if !self.printed.insert(message.id) {
                continue;
            }
            self.print_message(message)?;
            if snapshot.active_customization_id == Some(message.id) {
                writeln!(
                    self.out,
                    "  {}",
                    format!("▸ awaiting input for step {}", snapshot.current_step).yellow()
                )?;
            }
            writeln!(self.out)?;
        }

        if snapshot.loading_message().is_none() {
            self.last_loading = None;
        }
        Ok(())
    }

    fn print_message(&mut self, message: &Message<String>) -> std::io::Result<()> {
        let label = match message.role {
            MessageRole::System => "assistant".cyan().bold(),
            MessageRole::User => "you".green().bold(),
            MessageRole::Loading => "working".magenta(),
        };
        writeln!(self.out, "{} {}", label, format!("[step {}]", message.step).dimmed())?;
        for line in message.content.lines() {
            writeln!(self.out, "  {}", line)?;
        }
        Ok(())
    }
}
