//! Conversation view with scrolling and message selection.
//!
//! Messages are rendered as a role header followed by the wrapped content.
//! The loading message is shown with a spinner glyph and the active
//! customization gets a marker pointing at the composer. A scrollbar
//! appears once the conversation is taller than the viewport.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use wk_protocol::message_models::{ConversationSnapshot, Message, MessageRole};

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Scroll state for the conversation panel.
#[derive(Debug, Clone)]
pub struct ConversationView {
    /// Lines scrolled from the top when not following.
    pub scroll_offset: usize,
    /// Keep the newest message in view.
    pub follow: bool,
    /// Advances the spinner on every frame with a loading message.
    pub spinner_frame: usize,
}

impl ConversationView {
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            follow: true,
            spinner_frame: 0,
        }
    }

    /// Render `snapshot` into `area`.
    ///
    /// # Arguments
    ///
    /// * `frame` - The ratatui frame to render to
    /// * `area` - The area to render within
    /// * `title` - Block title, usually the workflow name
    /// * `snapshot` - Conversation to display
    /// * `selected` - Index of the highlighted message
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        snapshot: &ConversationSnapshot<String>,
        selected: Option<usize>,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title.to_string());

        let width = area.width.saturating_sub(4).max(1) as usize;
        let lines = self.build_lines(snapshot, selected, width);
        let total_lines = lines.len();
        let visible_lines = area.height.saturating_sub(2) as usize;
        let max_offset = total_lines.saturating_sub(visible_lines);
        let offset = if self.follow {
            max_offset
        } else {
            self.scroll_offset.min(max_offset)
        };

        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((offset as u16, 0));
        frame.render_widget(paragraph, area);

        if total_lines > visible_lines {
            let mut scrollbar_state = ScrollbarState::default()
                .content_length(max_offset)
                .viewport_content_length(visible_lines)
                .position(offset);

            let scrollbar = Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
        }
    }

    fn build_lines(
        &self,
        snapshot: &ConversationSnapshot<String>,
        selected: Option<usize>,
        width: usize,
    ) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for (index, message) in snapshot.messages.iter().enumerate() {
            let is_selected = selected == Some(index);
            lines.push(self.header_line(message, is_selected));

            let content_style = match message.role {
                MessageRole::Loading => Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::ITALIC),
                _ => Style::default(),
            };
            for text in wrap_text(&message.content, width) {
                lines.push(Line::from(Span::styled(format!("  {}", text), content_style)));
            }

            if snapshot.active_customization_id == Some(message.id) {
                lines.push(Line::from(Span::styled(
                    "  ▸ Your answer goes in the box below",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )));
            }
            lines.push(Line::default());
        }

        lines
    }

    fn header_line(&self, message: &Message<String>, selected: bool) -> Line<'static> {
        let (label, color) = match message.role {
            MessageRole::System => ("Assistant".to_string(), Color::Cyan),
            MessageRole::User => ("You".to_string(), Color::Green),
            MessageRole::Loading => (
                format!("{} Working", SPINNER[self.spinner_frame % SPINNER.len()]),
                Color::Magenta,
            ),
        };

        let mut style = Style::default().fg(color).add_modifier(Modifier::BOLD);
        if selected {
            style = style.bg(Color::Blue).fg(Color::White);
        }
        let marker = if selected { ">> " } else { "" };

        Line::from(vec![
            Span::styled(format!("{}{}", marker, label), style),
            Span::styled(
                format!("  step {}", message.step),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }

    pub fn scroll_up(&mut self) {
        self.follow = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Scroll down by one line.
    ///
    /// # Arguments
    ///
    /// * `max` - The maximum scroll offset (typically total_lines - visible_lines)
    pub fn scroll_down(&mut self, max: usize) {
        self.scroll_offset = (self.scroll_offset + 1).min(max);
        self.follow = self.scroll_offset >= max;
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.follow = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(page_size);
    }

    pub fn page_down(&mut self, page_size: usize, max: usize) {
        self.scroll_offset = (self.scroll_offset + page_size).min(max);
        self.follow = self.scroll_offset >= max;
    }

    /// Jump back to the newest message and keep following it.
    pub fn scroll_to_bottom(&mut self) {
        self.follow = true;
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

impl Default for ConversationView {
    fn default() -> Self {
        Self::new()
    }
}

/// Greedy word wrap on character counts. Embedded newlines are kept.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if current_len > 0 && current_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
