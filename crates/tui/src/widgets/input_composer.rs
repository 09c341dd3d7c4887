//! Input composer with slash command autocomplete.
//!
//! Plain text typed here is the answer to the current workflow step.
//! Input starting with `/` is a command; a popup lists the matching
//! commands while the command name is being typed.

use crate::event::EventStatus;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Available slash commands with their descriptions.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/edit", "Rewind to the selected (or last) answer"),
    ("/restart", "Start the workflow over"),
    ("/quit", "Leave the workflow"),
];

/// What the user asked for when pressing Enter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerAction {
    /// Answer the current step.
    Submit(String),
    Edit,
    Restart,
    Quit,
}

/// Input composer state.
#[derive(Debug, Clone, Default)]
pub struct InputComposer {
    input: String,
    /// Cursor position in characters.
    cursor_pos: usize,
    show_popup: bool,
    selected_index: usize,
}

impl InputComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn should_show_popup(&self) -> bool {
        self.show_popup
    }

    /// Commands matching the typed prefix.
    pub fn suggestions(&self) -> Vec<(&'static str, &'static str)> {
        if !self.input.starts_with('/') {
            return Vec::new();
        }

        let filter = self.input.trim();
        COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(filter))
            .copied()
            .collect()
    }

    pub fn selected_suggestion(&self) -> Option<(&'static str, &'static str)> {
        self.suggestions().get(self.selected_index).copied()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index();
        self.input.insert(at, c);
        self.cursor_pos += 1;
        self.update_popup_state();
    }

    /// Delete the character before the cursor.
    pub fn delete_char(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
            let at = self.byte_index();
            self.input.remove(at);
            self.update_popup_state();
        }
    }

    /// Replace the whole input, placing the cursor at the end.
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.cursor_pos = self.input.chars().count();
        self.update_popup_state();
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
        self.show_popup = false;
        self.selected_index = 0;
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_pos < self.input.chars().count() {
            self.cursor_pos += 1;
        }
    }

    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.suggestions().len() {
            self.selected_index += 1;
        }
    }

    /// Replace the input with the selected command (Tab key).
    pub fn complete_with_selection(&mut self) {
        if let Some((cmd, _)) = self.selected_suggestion() {
            self.input = cmd.to_string();
            self.cursor_pos = self.input.chars().count();
            self.show_popup = false;
            self.selected_index = 0;
        }
    }

    /// Offer a key to the composer.
    ///
    /// Up/Down are only consumed while the popup is open so the app can use
    /// them for message selection otherwise. Enter is never consumed; the app
    /// takes the input through [`take_action`](Self::take_action).
    pub fn handle_key_event(&mut self, key: KeyEvent) -> EventStatus {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return EventStatus::NotConsumed;
        }

        match key.code {
            KeyCode::Up if self.show_popup => self.move_selection_up(),
            KeyCode::Down if self.show_popup => self.move_selection_down(),
            KeyCode::Tab if self.show_popup => self.complete_with_selection(),
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            _ => return EventStatus::NotConsumed,
        }
        EventStatus::Consumed
    }

    /// Parse the current input.
    ///
    /// Returns Ok(None) for blank input and Err for an unknown command.
    pub fn parse_input(&self) -> Result<Option<ComposerAction>, String> {
        let input = self.input.trim();

        if input.is_empty() {
            return Ok(None);
        }

        if !input.starts_with('/') {
            return Ok(Some(ComposerAction::Submit(input.to_string())));
        }

        let cmd = input.split_whitespace().next().unwrap_or(input);
        match cmd {
            "/edit" => Ok(Some(ComposerAction::Edit)),
            "/restart" => Ok(Some(ComposerAction::Restart)),
            "/quit" => Ok(Some(ComposerAction::Quit)),
            _ => Err(format!("Unknown command: {}", cmd)),
        }
    }

    /// Parse the input and clear it unless it was rejected.
    pub fn take_action(&mut self) -> Result<Option<ComposerAction>, String> {
        let action = self.parse_input()?;
        self.clear();
        Ok(action)
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn update_popup_state(&mut self) {
        self.show_popup = self.input.starts_with('/') && !self.input.contains(' ');

        let suggestions = self.suggestions();
        if self.selected_index >= suggestions.len() {
            self.selected_index = suggestions.len().saturating_sub(1);
        }
    }

    /// Render the input field.
    ///
    /// `placeholder` is shown dimmed while the input is empty.
    pub fn render(&self, area: Rect, buf: &mut Buffer, title: &str, placeholder: &str) {
        let block = Block::default().borders(Borders::ALL).title(title.to_string());

        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.input.is_empty() {
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    placeholder.to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        } else {
            Line::from(Span::styled(
                format!("> {}", self.input),
                Style::default().fg(Color::Yellow),
            ))
        };
        Paragraph::new(line).render(inner, buf);
    }

    /// Height the popup needs, including borders.
    pub fn popup_height(&self) -> u16 {
        if !self.show_popup {
            return 0;
        }
        match self.suggestions().len() {
            0 => 0,
            n => n as u16 + 2,
        }
    }

    /// Render the autocomplete popup.
    pub fn render_popup(&self, area: Rect, buf: &mut Buffer) {
        if !self.show_popup {
            return;
        }

        let suggestions = self.suggestions();
        if suggestions.is_empty() {
            return;
        }

        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Commands")
            .style(Style::default().bg(Color::Black));

        let inner = block.inner(area);
        block.render(area, buf);

        for (i, (cmd, desc)) in suggestions.iter().enumerate() {
            let y = inner.y + i as u16;
            if y >= inner.y + inner.height {
                break;
            }

            let style = if i == self.selected_index {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let line = Line::from(vec![
                Span::styled(format!("{:<12}", cmd), style),
                Span::styled(desc.to_string(), style.fg(Color::Gray)),
            ]);

            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
