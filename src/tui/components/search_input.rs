//! Single-line search box that reports edits and Enter presses

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::ui::Styles;

/// What a key press did to the search box
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The text changed
    Changed(String),
    /// Enter was pressed
    Submitted(String),
    /// Focus left the box
    Blurred,
    /// Key not consumed
    Ignored,
}

#[derive(Debug, Clone)]
pub struct SearchInput {
    value: String,
    cursor: usize,
    pub placeholder: String,
    pub is_focused: bool,
}

impl Default for SearchInput {
    fn default() -> Self {
        Self::new("Search...")
    }
}

impl SearchInput {
    pub fn new(placeholder: &str) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            placeholder: placeholder.to_string(),
            is_focused: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Sync from an owner-held value
    pub fn set_value(&mut self, value: &str) {
        if self.value != value {
            self.value = value.to_string();
            self.cursor = self.value.chars().count();
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn byte_offset(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SearchEvent {
        match key.code {
            KeyCode::Enter => SearchEvent::Submitted(self.value.clone()),
            KeyCode::Esc | KeyCode::Tab => {
                self.is_focused = false;
                SearchEvent::Blurred
            }
            KeyCode::Char(c) => {
                let at = self.byte_offset();
                self.value.insert(at, c);
                self.cursor += 1;
                SearchEvent::Changed(self.value.clone())
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return SearchEvent::Ignored;
                }
                self.cursor -= 1;
                let at = self.byte_offset();
                self.value.remove(at);
                SearchEvent::Changed(self.value.clone())
            }
            KeyCode::Delete => {
                if self.cursor >= self.value.chars().count() {
                    return SearchEvent::Ignored;
                }
                let at = self.byte_offset();
                self.value.remove(at);
                SearchEvent::Changed(self.value.clone())
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                SearchEvent::Ignored
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.value.chars().count());
                SearchEvent::Ignored
            }
            KeyCode::Home => {
                self.cursor = 0;
                SearchEvent::Ignored
            }
            KeyCode::End => {
                self.cursor = self.value.chars().count();
                SearchEvent::Ignored
            }
            _ => SearchEvent::Ignored,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let (text, style) = if self.value.is_empty() {
            (self.placeholder.as_str(), Styles::inactive())
        } else {
            (self.value.as_str(), Styles::default())
        };

        let border_style = if self.is_focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let paragraph = Paragraph::new(format!("🔍 {}", text)).style(style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        );
        f.render_widget(paragraph, area);

        if self.is_focused {
            // Icon and its trailing space take three cells
            let before: String = self.value.chars().take(self.cursor).collect();
            let cursor_x = area.x + 4 + before.width() as u16;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                f.set_cursor(cursor_x, area.y + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_emits_changes_and_enter_submits() {
        let mut input = SearchInput::default();
        assert_eq!(input.handle_key(key(KeyCode::Char('+'))), SearchEvent::Changed("+".into()));
        assert_eq!(input.handle_key(key(KeyCode::Char('6'))), SearchEvent::Changed("+6".into()));
        assert_eq!(input.handle_key(key(KeyCode::Enter)), SearchEvent::Submitted("+6".into()));
        assert_eq!(input.handle_key(key(KeyCode::Backspace)), SearchEvent::Changed("+".into()));
    }

    #[test]
    fn test_cursor_edits_multibyte() {
        let mut input = SearchInput::default();
        input.set_value("héllo");
        input.handle_key(key(KeyCode::Home));
        input.handle_key(key(KeyCode::Right));
        assert_eq!(input.handle_key(key(KeyCode::Delete)), SearchEvent::Changed("hllo".into()));
        assert_eq!(input.handle_key(key(KeyCode::Backspace)), SearchEvent::Changed("llo".into()));
        assert_eq!(input.handle_key(key(KeyCode::Backspace)), SearchEvent::Ignored);
    }

    #[test]
    fn test_controlled_value_and_blur() {
        let mut input = SearchInput::new("Search logs...");
        input.is_focused = true;
        input.set_value("MegaPerya");
        assert_eq!(input.value(), "MegaPerya");
        assert_eq!(input.handle_key(key(KeyCode::Esc)), SearchEvent::Blurred);
        assert!(!input.is_focused);
        input.clear();
        assert_eq!(input.value(), "");
    }
}
