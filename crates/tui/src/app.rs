//! TUI application state and event loop.
//!
//! This module defines the main `App` struct that renders a workflow
//! session and turns key presses into `Op`s for it. The loop uses
//! `tokio::select!` over core events and terminal input.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tracing::{debug, warn};
use wk_protocol::ipc::{Event, Op, OpSender};
use wk_protocol::message_models::MessageRole;

use crate::event_handler::{self, ConversationState, StatusKind};
use crate::tui::{Tui, TuiEvent};
use crate::widgets::{render_step_tracker, ComposerAction, ConversationView, InputComposer};

const SPINNER_INTERVAL: Duration = Duration::from_millis(120);
const STEP_TRACKER_WIDTH: u16 = 34;

/// Main TUI application state.
pub struct App {
    /// Latest state reported by the session.
    pub state: ConversationState,
    pub composer: InputComposer,
    pub conversation_view: ConversationView,
    /// Index of the highlighted message, if any.
    pub selected: Option<usize>,
    /// Channel to send operations to the session.
    pub op_tx: OpSender,
    /// Channel to receive events from the session.
    pub event_rx: mpsc::Receiver<Event>,
    pub should_exit: bool,
}

impl App {
    pub fn new(op_tx: OpSender, event_rx: mpsc::Receiver<Event>) -> Self {
        Self {
            state: ConversationState::default(),
            composer: InputComposer::new(),
            conversation_view: ConversationView::new(),
            selected: None,
            op_tx,
            event_rx,
            should_exit: false,
        }
    }

    /// Main event loop.
    ///
    /// Runs until the user quits or the session goes away.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut tui_events = tui.event_stream();
        let frames = tui.frame_requester();

        frames.schedule_frame();

        while !self.should_exit {
            select! {
                event = self.event_rx.recv() => {
                    match event {
                        Some(event) => self.handle_core_event(event),
                        None => {
                            debug!("event channel closed");
                            self.should_exit = true;
                        }
                    }
                    frames.schedule_frame();
                }
                Some(tui_event) = tui_events.next() => {
                    match tui_event {
                        TuiEvent::Key(key_event) => {
                            self.handle_key_event(key_event);
                            frames.schedule_frame();
                        }
                        TuiEvent::Paste(text) => {
                            for c in text.chars().filter(|c| !c.is_control()) {
                                self.composer.insert_char(c);
                            }
                            frames.schedule_frame();
                        }
                        TuiEvent::Draw => {
                            tui.draw(|frame| self.render(frame))?;
                            if self.state.snapshot.loading_message().is_some() {
                                self.conversation_view.tick_spinner();
                                frames.schedule_frame_in(SPINNER_INTERVAL);
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Handle events from the session.
    pub fn handle_core_event(&mut self, event: Event) {
        event_handler::handle_core_event(&mut self.state, event);

        let len = self.state.snapshot.messages.len();
        if self.selected.is_some_and(|i| i >= len) {
            self.selected = None;
        }
        if self.state.closed {
            self.should_exit = true;
        }
    }

    /// Handle keyboard events.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.kind != KeyEventKind::Press {
            return;
        }

        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        match key_event.code {
            KeyCode::Esc => {
                self.should_exit = true;
                return;
            }
            KeyCode::Char('c') if ctrl => {
                self.should_exit = true;
                return;
            }
            KeyCode::Char('e') if ctrl => {
                self.edit_selected();
                return;
            }
            _ => {}
        }

        if self.composer.handle_key_event(key_event).is_consumed() {
            return;
        }

        match key_event.code {
            KeyCode::Up => self.select_previous(),
            KeyCode::Down => self.select_next(),
            KeyCode::PageUp => self.conversation_view.page_up(10),
            KeyCode::PageDown => self.conversation_view.page_down(10, usize::MAX),
            KeyCode::End => self.conversation_view.scroll_to_bottom(),
            KeyCode::Enter => self.submit_composer(),
            _ => {}
        }
    }

    fn submit_composer(&mut self) {
        match self.composer.take_action() {
            Ok(Some(ComposerAction::Submit(content))) => {
                self.selected = None;
                self.conversation_view.scroll_to_bottom();
                self.send(Op::SubmitInput { content });
            }
            Ok(Some(ComposerAction::Edit)) => self.edit_selected(),
            Ok(Some(ComposerAction::Restart)) => {
                self.selected = None;
                self.send(Op::Restart);
            }
            Ok(Some(ComposerAction::Quit)) => self.should_exit = true,
            Ok(None) => {}
            Err(message) => self.state.status = Some((StatusKind::Error, message)),
        }
    }

    /// Rewind to the selected user message, or the last one when nothing
    /// is selected, and put its text back into the composer.
    fn edit_selected(&mut self) {
        let messages = &self.state.snapshot.messages;
        let target = match self.selected {
            Some(index) => messages.get(index),
            None => messages.iter().rev().find(|m| m.role == MessageRole::User),
        }
        .map(|m| (m.role, m.id, m.content.clone()));

        match target {
            Some((MessageRole::User, message_id, content)) => {
                self.selected = None;
                self.composer.set_input(&content);
                self.send(Op::EditMessage { message_id });
            }
            Some(_) => {
                self.state.status = Some((
                    StatusKind::Error,
                    "Only your own answers can be edited".to_string(),
                ));
            }
            None => {
                self.state.status =
                    Some((StatusKind::Error, "Nothing to edit yet".to_string()));
            }
        }
    }

    fn select_previous(&mut self) {
        let len = self.state.snapshot.messages.len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => i.saturating_sub(1),
            None => len - 1,
        });
    }

    fn select_next(&mut self) {
        let len = self.state.snapshot.messages.len();
        self.selected = match self.selected {
            Some(i) if i + 1 < len => Some(i + 1),
            _ => None,
        };
    }

    fn send(&self, op: Op) {
        if let Err(e) = self.op_tx.try_send(op) {
            warn!("failed to send op to session: {e}");
        }
    }

    /// Render the TUI.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(STEP_TRACKER_WIDTH), Constraint::Min(20)])
            .split(area);

        render_step_tracker(
            frame,
            columns[0],
            &self.state.steps,
            self.state.snapshot.current_step,
            self.state.is_processing(),
            self.state.completed,
        );

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(columns[1]);

        let title = if self.state.workflow_name.is_empty() {
            "Conversation".to_string()
        } else {
            format!("Conversation - {}", self.state.workflow_name)
        };
        self.conversation_view.render(
            frame,
            rows[0],
            &title,
            &self.state.snapshot,
            self.selected,
        );

        self.render_composer(frame, rows[1]);
        self.render_status(frame, rows[2]);

        let popup_height = self.composer.popup_height();
        if popup_height > 0 {
            let popup = Rect {
                x: rows[1].x,
                y: rows[1].y.saturating_sub(popup_height),
                width: rows[1].width.min(60),
                height: popup_height.min(rows[1].y),
            };
            self.composer.render_popup(popup, frame.buffer_mut());
        }
    }

    fn render_composer(&self, frame: &mut Frame, area: Rect) {
        let title = match self.state.current_step_title() {
            Some(step) if !self.state.completed => {
                format!("Step {}: {}", self.state.snapshot.current_step, step)
            }
            _ => "Input".to_string(),
        };
        let placeholder = if self.state.is_processing() {
            "Processing... (Ctrl-E to edit an earlier answer)"
        } else if self.state.completed {
            "Workflow complete. /edit or /restart"
        } else {
            "Type your answer, or / for commands"
        };
        self.composer
            .render(area, frame.buffer_mut(), &title, placeholder);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.state.status {
            Some((StatusKind::Error, text)) => {
                Line::styled(text.clone(), Style::default().fg(Color::Red))
            }
            Some((StatusKind::Info, text)) => {
                Line::styled(text.clone(), Style::default().fg(Color::Gray))
            }
            None => Line::styled(
                "Up/Down select  Ctrl-E edit  Esc quit",
                Style::default().fg(Color::DarkGray),
            ),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}
