//! Credentials step: identifier (email) and secret (password) entry

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::flow::{validate_identifier, validate_secret, StepPayload, SubmissionState};
use crate::ui::{centered_rect, TextField};

/// Which field receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Identifier,
    Secret,
}

/// The login form
pub struct CredentialsScreen {
    identifier: TextField,
    secret: TextField,
    focus: Focus,
    identifier_error: Option<String>,
    secret_error: Option<String>,
}

impl CredentialsScreen {
    pub fn new() -> Self {
        Self {
            identifier: TextField::new("Enter your email"),
            secret: TextField::new("Enter your password").masked(),
            focus: Focus::Identifier,
            identifier_error: None,
            secret_error: None,
        }
    }

    /// Clear fields and messages (flow cancelled back to this step)
    pub fn reset(&mut self) {
        self.identifier.clear();
        self.secret.clear();
        self.focus = Focus::Identifier;
        self.identifier_error = None;
        self.secret_error = None;
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Identifier => Focus::Secret,
            Focus::Secret => Focus::Identifier,
        };
    }

    /// Handle a key event. Returns a payload when Enter produced a
    /// fully valid form.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<StepPayload> {
        match key {
            KeyCode::Tab | KeyCode::Down => {
                self.cycle_focus();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.cycle_focus();
                None
            }
            KeyCode::F(2) => {
                // Show/hide the secret
                self.secret.toggle_mask();
                None
            }
            KeyCode::Enter => self.try_payload(),
            other => {
                let field = match self.focus {
                    Focus::Identifier => &mut self.identifier,
                    Focus::Secret => &mut self.secret,
                };
                field.handle_key(other);
                None
            }
        }
    }

    /// Validate both fields, storing inline messages; payload only when
    /// everything passes
    fn try_payload(&mut self) -> Option<StepPayload> {
        self.identifier_error = validate_identifier(self.identifier.value())
            .err()
            .map(|e| e.to_string());
        self.secret_error = validate_secret(self.secret.value())
            .err()
            .map(|e| e.to_string());

        if self.identifier_error.is_some() || self.secret_error.is_some() {
            return None;
        }
        Some(StepPayload::Credentials {
            identifier: self.identifier.value().trim().to_string(),
            secret: self.secret.value().to_string(),
        })
    }

    pub fn render(&self, frame: &mut Frame, submission: &SubmissionState) {
        let area = centered_rect(60, 70, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Log in — step 1 of 3 ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(2), // Submission error banner
                Constraint::Length(1), // Email label
                Constraint::Length(1), // Email field
                Constraint::Length(1), // Email inline error
                Constraint::Length(1), // Spacer
                Constraint::Length(1), // Password label
                Constraint::Length(1), // Password field
                Constraint::Length(1), // Password inline error
                Constraint::Length(1), // Spacer
                Constraint::Length(1), // Submit state
                Constraint::Min(0),
                Constraint::Length(1), // Footer
            ])
            .split(inner);

        if let Some(ref error) = submission.error {
            let banner = Paragraph::new(Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            frame.render_widget(banner, chunks[0]);
        }

        frame.render_widget(
            Paragraph::new(Span::styled("Email", Style::default().fg(Color::Gray))),
            chunks[1],
        );
        self.identifier
            .render(frame, chunks[2], self.focus == Focus::Identifier);
        if let Some(ref err) = self.identifier_error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    err.as_str(),
                    Style::default().fg(Color::Red),
                )),
                chunks[3],
            );
        }

        frame.render_widget(
            Paragraph::new(Span::styled("Password", Style::default().fg(Color::Gray))),
            chunks[5],
        );
        self.secret
            .render(frame, chunks[6], self.focus == Focus::Secret);
        if let Some(ref err) = self.secret_error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    err.as_str(),
                    Style::default().fg(Color::Red),
                )),
                chunks[7],
            );
        }

        let submit = if submission.pending {
            Span::styled("Logging in…", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled("Press Enter to log in", Style::default().fg(Color::Green))
        };
        frame.render_widget(
            Paragraph::new(submit).alignment(Alignment::Center),
            chunks[9],
        );

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" switch field  "),
            Span::styled("F2", Style::default().fg(Color::Yellow)),
            Span::raw(" show/hide password  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" quit"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(footer, chunks[11]);
    }
}

impl Default for CredentialsScreen {
    fn default() -> Self {
        Self::new()
    }
}
