//! Segmented code-entry widget: N single-character cells for one
//! fixed-length numeric code.
//!
//! Focus advance is a pure function of the cell index. Typing into a
//! focused filled cell overwrites it (select-on-focus semantics), and
//! backward navigation is intentionally absent.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const CELL_WIDTH: u16 = 5;
const CELL_HEIGHT: u16 = 3;
const CELL_GAP: u16 = 2;

/// A fixed-length row of single-digit cells
pub struct SegmentedCodeInput {
    cells: Vec<Option<char>>,
    focus: usize,
    masked: bool,
}

impl SegmentedCodeInput {
    /// Create an empty entry of exactly `len` cells, focused on the first
    pub fn new(len: usize) -> Self {
        Self {
            cells: vec![None; len],
            focus: 0,
            masked: true,
        }
    }

    /// Render cell contents as a mask glyph instead of the digit
    pub fn set_masked(&mut self, masked: bool) {
        self.masked = masked;
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Index of the currently focused cell
    pub fn focused_cell(&self) -> usize {
        self.focus
    }

    /// Place a digit into the cell at `index`.
    ///
    /// Anything but a single decimal digit is rejected with no state
    /// change. On acceptance the cell is replaced and, unless this is the
    /// last cell, focus moves to the next one.
    pub fn set_cell(&mut self, index: usize, ch: char) -> bool {
        if index >= self.cells.len() || !ch.is_ascii_digit() {
            return false;
        }
        self.cells[index] = Some(ch);
        if index < self.cells.len() - 1 {
            self.focus = index + 1;
        }
        true
    }

    /// Handle a key event, returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) => self.set_cell(self.focus, c),
            _ => false,
        }
    }

    /// Concatenation of the filled cells in order. Empty cells contribute
    /// nothing, so a partial entry yields a shorter string, never a padded
    /// one.
    pub fn assembled_value(&self) -> String {
        self.cells.iter().flatten().collect()
    }

    /// Whether every cell holds a digit
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Re-entry helper after an error: focus the first empty cell, or the
    /// last cell when all are filled so re-typing overwrites
    pub fn focus_first_empty_or_last(&mut self) {
        self.focus = self
            .cells
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.cells.len() - 1);
    }

    /// Empty all cells and return focus to the first (step entry)
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
        self.focus = 0;
    }

    /// Draw the cell row centered in `area`
    pub fn render(&self, frame: &mut Frame, area: Rect, active: bool) {
        let n = self.cells.len() as u16;
        if n == 0 || area.height == 0 {
            return;
        }
        let total_width = n * CELL_WIDTH + (n - 1) * CELL_GAP;
        let origin_x = area.x + area.width.saturating_sub(total_width) / 2;
        let height = CELL_HEIGHT.min(area.height);

        for (i, cell) in self.cells.iter().enumerate() {
            let x = origin_x + (i as u16) * (CELL_WIDTH + CELL_GAP);
            if x + CELL_WIDTH > area.x + area.width {
                break;
            }
            let rect = Rect::new(x, area.y, CELL_WIDTH, height);

            let focused = active && i == self.focus;
            let border_style = if focused {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let glyph = match cell {
                Some(_) if self.masked => '•',
                Some(c) => *c,
                None => ' ',
            };

            let para = Paragraph::new(glyph.to_string())
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::White))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(border_style),
                );
            frame.render_widget(para, rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(input: &mut SegmentedCodeInput, digits: &str) {
        for c in digits.chars() {
            assert!(input.handle_key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_assembles_digits_in_order() {
        let mut input = SegmentedCodeInput::new(6);
        filled(&mut input, "123456");
        assert_eq!(input.assembled_value(), "123456");
        assert!(input.is_complete());
    }

    #[test]
    fn test_focus_advances_but_stays_in_range() {
        let mut input = SegmentedCodeInput::new(4);
        assert!(input.set_cell(0, '1'));
        assert_eq!(input.focused_cell(), 1);
        assert!(input.set_cell(1, '2'));
        assert!(input.set_cell(2, '3'));
        assert_eq!(input.focused_cell(), 3);

        // The last cell accepts without moving focus out of range
        assert!(input.set_cell(3, '4'));
        assert_eq!(input.focused_cell(), 3);
    }

    #[test]
    fn test_rejects_non_digit_input() {
        let mut input = SegmentedCodeInput::new(4);
        assert!(!input.set_cell(0, 'a'));
        assert!(!input.handle_key(KeyCode::Char(' ')));
        assert!(!input.handle_key(KeyCode::Backspace));
        assert_eq!(input.assembled_value(), "");
        assert_eq!(input.focused_cell(), 0);
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let mut input = SegmentedCodeInput::new(4);
        assert!(!input.set_cell(4, '1'));
        assert!(input.is_empty());
    }

    #[test]
    fn test_partial_entry_is_shorter_not_padded() {
        let mut input = SegmentedCodeInput::new(6);
        filled(&mut input, "12");
        assert_eq!(input.assembled_value(), "12");
        assert!(!input.is_complete());
    }

    #[test]
    fn test_typing_overwrites_focused_cell() {
        let mut input = SegmentedCodeInput::new(4);
        filled(&mut input, "1234");
        input.focus_first_empty_or_last();
        assert_eq!(input.focused_cell(), 3);

        assert!(input.handle_key(KeyCode::Char('9')));
        assert_eq!(input.assembled_value(), "1239");
    }

    #[test]
    fn test_focus_first_empty_or_last() {
        let mut input = SegmentedCodeInput::new(4);
        input.focus_first_empty_or_last();
        assert_eq!(input.focused_cell(), 0);

        input.set_cell(0, '1');
        input.set_cell(1, '2');
        input.focus_first_empty_or_last();
        assert_eq!(input.focused_cell(), 2);
    }

    #[test]
    fn test_clear_resets_cells_and_focus() {
        let mut input = SegmentedCodeInput::new(4);
        filled(&mut input, "1234");
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.focused_cell(), 0);
        assert_eq!(input.assembled_value(), "");
    }
}
