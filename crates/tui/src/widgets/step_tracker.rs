//! Step tracker widget listing the workflow's steps.
//!
//! Steps before the current one are done, the current one is highlighted
//! and later ones are pending. Once the workflow completes every step is
//! shown as done.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;
use wk_protocol::workflow_models::WorkflowStep;

/// Progress of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Current,
    Processing,
    Pending,
}

impl StepStatus {
    /// Status of the 1-based `step`.
    pub fn of(step: usize, current_step: usize, processing: bool, completed: bool) -> Self {
        if completed || step < current_step {
            StepStatus::Done
        } else if step == current_step && processing {
            StepStatus::Processing
        } else if step == current_step {
            StepStatus::Current
        } else {
            StepStatus::Pending
        }
    }

    fn label(self) -> &'static str {
        match self {
            StepStatus::Done => "done",
            StepStatus::Current => "input",
            StepStatus::Processing => "working",
            StepStatus::Pending => "pending",
        }
    }

    fn style(self) -> Style {
        match self {
            StepStatus::Done => Style::default().fg(Color::Green),
            StepStatus::Current => Style::default().fg(Color::Yellow),
            StepStatus::Processing => Style::default().fg(Color::Magenta),
            StepStatus::Pending => Style::default().fg(Color::DarkGray),
        }
    }
}

/// Renders the step list as a table.
///
/// # Arguments
/// * `frame` - The frame to render into
/// * `area` - The area to render the table in
/// * `steps` - Step descriptors in order
/// * `current_step` - 1-based step the conversation is on
/// * `processing` - Whether the current step's script is running
/// * `completed` - Whether the final step has been answered
pub fn render_step_tracker(
    frame: &mut Frame,
    area: Rect,
    steps: &[WorkflowStep],
    current_step: usize,
    processing: bool,
    completed: bool,
) {
    let rows: Vec<Row> = steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let status = StepStatus::of(i + 1, current_step, processing, completed);
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(step.title.clone()),
                Cell::from(status.label()).style(status.style()),
            ])
        })
        .collect();

    let header = Row::new(vec![Cell::from("#"), Cell::from("Step"), Cell::from("Status")]).style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Cyan),
    );

    let widths = [
        Constraint::Length(3),
        Constraint::Min(10),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Steps"))
        .row_highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut table_state = TableState::default();
    if !completed && current_step >= 1 && current_step <= steps.len() {
        table_state.select(Some(current_step - 1));
    }

    frame.render_stateful_widget(table, area, &mut table_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn create_test_steps() -> Vec<WorkflowStep> {
        ["Select Company", "Choose Metrics", "Review"]
            .iter()
            .enumerate()
            .map(|(i, title)| WorkflowStep {
                id: i as u32 + 1,
                title: title.to_string(),
                description: String::new(),
            })
            .collect()
    }

    fn render(current: usize, processing: bool, completed: bool) -> Terminal<TestBackend> {
        let backend = TestBackend::new(50, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let steps = create_test_steps();
        terminal
            .draw(|frame| {
                render_step_tracker(frame, frame.area(), &steps, current, processing, completed);
            })
            .unwrap();
        terminal
    }

    fn content(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_step_status() {
        assert_eq!(StepStatus::of(1, 2, false, false), StepStatus::Done);
        assert_eq!(StepStatus::of(2, 2, false, false), StepStatus::Current);
        assert_eq!(StepStatus::of(2, 2, true, false), StepStatus::Processing);
        assert_eq!(StepStatus::of(3, 2, true, false), StepStatus::Pending);
        assert_eq!(StepStatus::of(3, 3, false, true), StepStatus::Done);
    }

    #[test]
    fn test_renders_steps_and_statuses() {
        let terminal = render(2, false, false);
        let content = content(&terminal);

        assert!(content.contains("Steps"));
        assert!(content.contains("Select Company"));
        assert!(content.contains("Choose Metrics"));
        assert!(content.contains("done"));
        assert!(content.contains("input"));
        assert!(content.contains("pending"));
    }

    #[test]
    fn test_current_step_is_highlighted() {
        let terminal = render(1, false, false);
        let buffer = terminal.backend().buffer();
        assert!(buffer.content().iter().any(|cell| cell.bg == Color::Blue));
    }

    #[test]
    fn test_completed_workflow_has_no_highlight() {
        let terminal = render(3, false, true);
        let buffer = terminal.backend().buffer();
        assert!(!buffer.content().iter().any(|cell| cell.bg == Color::Blue));
        assert!(!content(&terminal).contains("pending"));
    }
}
