//! PIN step: 4-digit segmented entry

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::flow::{validate_payload, StepPayload, SubmissionState, PIN_LEN};
use crate::ui::{centered_rect, SegmentedCodeInput};

/// The PIN entry screen
pub struct PinScreen {
    code: SegmentedCodeInput,
    validation_error: Option<String>,
}

impl PinScreen {
    pub fn new(mask_cells: bool) -> Self {
        let mut code = SegmentedCodeInput::new(PIN_LEN);
        code.set_masked(mask_cells);
        Self {
            code,
            validation_error: None,
        }
    }

    /// Empty the cells for a fresh step entry
    pub fn reset(&mut self) {
        self.code.clear();
        self.validation_error = None;
    }

    /// Re-entry after a failed submission: keep the cells for correction,
    /// focus where typing should resume
    pub fn on_submission_failed(&mut self) {
        self.code.focus_first_empty_or_last();
    }

    /// Handle a key event. Returns a payload when Enter produced a valid
    /// code.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<StepPayload> {
        match key {
            KeyCode::Enter => self.try_payload(),
            other => {
                if self.code.handle_key(other) {
                    self.validation_error = None;
                }
                None
            }
        }
    }

    fn try_payload(&mut self) -> Option<StepPayload> {
        let payload = StepPayload::Pin(self.code.assembled_value());
        match validate_payload(&payload) {
            Ok(()) => {
                self.validation_error = None;
                Some(payload)
            }
            Err(err) => {
                self.validation_error = Some(err.to_string());
                None
            }
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        identifier: Option<&str>,
        submission: &SubmissionState,
    ) {
        let area = centered_rect(60, 70, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" PIN — step 2 of 3 ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(1), // Prompt
                Constraint::Length(1), // Identifier
                Constraint::Length(1), // Spacer
                Constraint::Length(3), // Cells
                Constraint::Length(1), // Spacer
                Constraint::Length(1), // Validation / submission error
                Constraint::Length(1), // Submit state
                Constraint::Min(0),
                Constraint::Length(1), // Footer
            ])
            .split(inner);

        frame.render_widget(
            Paragraph::new("Enter your PIN to authenticate").alignment(Alignment::Center),
            chunks[0],
        );
        if let Some(identifier) = identifier {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    identifier,
                    Style::default().fg(Color::DarkGray),
                ))
                .alignment(Alignment::Center),
                chunks[1],
            );
        }

        self.code.render(frame, chunks[3], !submission.pending);

        // One message line: a submission failure takes precedence over a
        // stale validation hint
        let message = submission
            .error
            .as_deref()
            .or(self.validation_error.as_deref());
        if let Some(message) = message {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    message,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
                chunks[5],
            );
        }

        let submit = if submission.pending {
            Span::styled("Verifying…", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled("Press Enter to verify", Style::default().fg(Color::Green))
        };
        frame.render_widget(
            Paragraph::new(submit).alignment(Alignment::Center),
            chunks[6],
        );

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("0-9", Style::default().fg(Color::Yellow)),
            Span::raw(" enter digit  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" cancel"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(footer, chunks[8]);
    }
}
