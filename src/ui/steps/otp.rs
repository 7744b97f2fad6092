//! OTP step: 6-digit segmented entry

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::flow::{validate_payload, StepPayload, SubmissionState, OTP_LEN};
use crate::ui::{centered_rect, SegmentedCodeInput};

/// The one-time-code entry screen
pub struct OtpScreen {
    code: SegmentedCodeInput,
    validation_error: Option<String>,
}

impl OtpScreen {
    pub fn new(mask_cells: bool) -> Self {
        let mut code = SegmentedCodeInput::new(OTP_LEN);
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

    /// Re-entry after a failed submission: cells stay for correction
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
        let payload = StepPayload::Otp(self.code.assembled_value());
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
            .title(" One-time code — step 3 of 3 ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(1), // Prompt
                Constraint::Length(1), // Identifier the code was sent to
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
            Paragraph::new("Enter the 6-digit code sent to your email")
                .alignment(Alignment::Center),
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
            Span::styled(
                "Press Enter to verify code",
                Style::default().fg(Color::Green),
            )
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_with_complete_code_yields_payload() {
        let mut screen = OtpScreen::new(true);
        for c in "123456".chars() {
            screen.handle_key(KeyCode::Char(c));
        }
        assert_eq!(
            screen.handle_key(KeyCode::Enter),
            Some(StepPayload::Otp("123456".to_string()))
        );
    }

    #[test]
    fn test_four_digits_is_a_validation_error() {
        let mut screen = OtpScreen::new(true);
        for c in "1234".chars() {
            screen.handle_key(KeyCode::Char(c));
        }
        assert_eq!(screen.handle_key(KeyCode::Enter), None);
        assert_eq!(
            screen.validation_error.as_deref(),
            Some("OTP must be exactly 6 digits")
        );
    }
}
