//! Single-line text input with cursor editing and optional masking

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// A single-line input field
pub struct TextField {
    value: String,
    cursor_pos: usize,
    placeholder: String,
    /// Render the value as mask glyphs (secret entry)
    masked: bool,
}

impl TextField {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            cursor_pos: 0,
            placeholder: placeholder.into(),
            masked: false,
        }
    }

    /// Mask the rendered value (the stored value is untouched)
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    /// Show/hide toggle for secret fields
    pub fn toggle_mask(&mut self) {
        self.masked = !self.masked;
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_pos = 0;
    }

    /// Handle a key event, returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) => {
                self.value.insert(self.cursor_pos, c);
                self.cursor_pos += 1;
                true
            }
            KeyCode::Backspace => {
                if self.cursor_pos > 0 {
                    self.cursor_pos -= 1;
                    self.value.remove(self.cursor_pos);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor_pos < self.value.len() {
                    self.value.remove(self.cursor_pos);
                }
                true
            }
            KeyCode::Left => {
                if self.cursor_pos > 0 {
                    self.cursor_pos -= 1;
                }
                true
            }
            KeyCode::Right => {
                if self.cursor_pos < self.value.len() {
                    self.cursor_pos += 1;
                }
                true
            }
            KeyCode::Home => {
                self.cursor_pos = 0;
                true
            }
            KeyCode::End => {
                self.cursor_pos = self.value.len();
                true
            }
            _ => false,
        }
    }

    /// Render the field
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let display = if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        };

        let content = if self.value.is_empty() && !focused {
            Line::from(Span::styled(
                self.placeholder.as_str(),
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            let mut text = display;
            if focused {
                if self.cursor_pos < text.chars().count() {
                    let byte_idx = text
                        .char_indices()
                        .nth(self.cursor_pos)
                        .map_or(text.len(), |(i, _)| i);
                    text.insert(byte_idx, '|');
                } else {
                    text.push('|');
                }
            }
            Line::from(Span::raw(text))
        };

        let para = Paragraph::new(content).style(Style::default().fg(if focused {
            Color::White
        } else {
            Color::Gray
        }));
        frame.render_widget(para, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(field: &mut TextField, s: &str) {
        for c in s.chars() {
            field.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_handles_chars() {
        let mut field = TextField::new("Enter your email");
        type_str(&mut field, "hi");
        assert_eq!(field.value(), "hi");
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut field = TextField::new("");
        type_str(&mut field, "abc");

        field.handle_key(KeyCode::Backspace);
        assert_eq!(field.value(), "ab");

        field.handle_key(KeyCode::Home);
        field.handle_key(KeyCode::Delete);
        assert_eq!(field.value(), "b");
    }

    #[test]
    fn test_cursor_movement_inserts_mid_string() {
        let mut field = TextField::new("");
        type_str(&mut field, "ac");
        field.handle_key(KeyCode::Left);
        field.handle_key(KeyCode::Char('b'));
        assert_eq!(field.value(), "abc");
    }

    #[test]
    fn test_mask_toggle_keeps_value() {
        let mut field = TextField::new("").masked();
        type_str(&mut field, "secret");
        assert!(field.is_masked());
        assert_eq!(field.value(), "secret");

        field.toggle_mask();
        assert!(!field.is_masked());
        assert_eq!(field.value(), "secret");
    }

    #[test]
    fn test_clear() {
        let mut field = TextField::new("");
        type_str(&mut field, "abc");
        field.clear();
        assert!(field.is_empty());
        // Typing after clear starts from the beginning
        type_str(&mut field, "x");
        assert_eq!(field.value(), "x");
    }
}
