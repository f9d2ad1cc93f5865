//! Form rendering: the labelled field wrapper and a focus-tracking form view

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::forms::{FieldValue, Form, Schema};
use crate::tui::{traits::FormHandler, ui::Styles};

/// How a field's input is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Password,
    TextArea { rows: u16 },
}

/// Presentation of one form field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub description: Option<&'static str>,
    pub placeholder: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            description: None,
            placeholder: "",
            kind,
        }
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    fn input_height(&self) -> u16 {
        match self.kind {
            FieldKind::TextArea { rows } => rows + 2,
            _ => 3,
        }
    }

    /// Rows taken by input, description and the error line
    pub fn height(&self) -> u16 {
        self.input_height() + u16::from(self.description.is_some()) + 1
    }
}

/// Field renderer bound to a form, handed to render-prop closures
pub struct FieldRenderer<'a, S: Schema> {
    form: &'a Form<S>,
    focused: Option<&'a str>,
    cursor: usize,
}

impl<'a, S: Schema> FieldRenderer<'a, S> {
    /// Draw label, input, description and (once touched and failing) the errors
    pub fn render(&self, f: &mut Frame, area: Rect, spec: &FieldSpec) {
        let Some(props) = self.form.input_props(spec.name) else {
            return;
        };
        let errors = self
            .form
            .state(spec.name)
            .map(|state| state.meta.errors.clone())
            .unwrap_or_default();
        let is_focused = self.focused == Some(spec.name);
        let disabled = self.form.is_submitting();

        let mut constraints = vec![Constraint::Length(spec.input_height())];
        if spec.description.is_some() {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let border_style = if props.invalid {
            Styles::error()
        } else if is_focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let (text, text_style) = if props.value.is_empty() {
            (spec.placeholder.to_string(), Styles::inactive())
        } else if spec.kind == FieldKind::Password {
            ("•".repeat(props.value.chars().count()), Styles::default())
        } else {
            (props.value.clone(), Styles::default())
        };

        let input = Paragraph::new(text)
            .style(if disabled { Styles::inactive() } else { text_style })
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(spec.label)
                    .borders(Borders::ALL)
                    .border_style(border_style),
            );
        f.render_widget(input, chunks[0]);

        if is_focused && !disabled {
            let inner_width = chunks[0].width.saturating_sub(2).max(1) as usize;
            // Masked input draws one cell per character
            let offset = if spec.kind == FieldKind::Password {
                self.cursor
            } else {
                let before: String = props.value.chars().take(self.cursor).collect();
                before.width()
            };
            let line = (offset / inner_width) as u16;
            let column = (offset % inner_width) as u16;
            if line + 2 < chunks[0].height {
                f.set_cursor(chunks[0].x + 1 + column, chunks[0].y + 1 + line);
            }
        }

        let mut next = 1;
        if let Some(description) = spec.description {
            f.render_widget(
                Paragraph::new(Span::styled(description, Styles::inactive())),
                chunks[next],
            );
            next += 1;
        }

        if props.invalid {
            f.render_widget(
                Paragraph::new(Span::styled(errors.join(", "), Styles::error())),
                chunks[next],
            );
        }
    }
}

/// Result of feeding a key to a form view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKey {
    /// The user asked to submit
    Submit,
    /// The key was consumed
    Handled,
    /// The key means nothing to the form
    Ignored,
}

/// A form plus the focus and cursor state needed to edit it from the keyboard
pub struct FormView<S: Schema> {
    pub form: Form<S>,
    fields: Vec<&'static str>,
    current_field: usize,
    cursors: Vec<usize>,
}

impl<S: Schema> Default for FormView<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> FormView<S> {
    pub fn new() -> Self {
        let fields: Vec<&'static str> = S::default_values().into_iter().map(|(name, _)| name).collect();
        let cursors = vec![0; fields.len()];
        Self {
            form: Form::new(),
            fields,
            current_field: 0,
            cursors,
        }
    }

    pub fn focused_field(&self) -> Option<&'static str> {
        self.fields.get(self.current_field).copied()
    }

    pub fn is_submitting(&self) -> bool {
        self.form.is_submitting()
    }

    /// Restore defaults and move focus back to the first field
    pub fn reset(&mut self) {
        self.form.reset();
        self.current_field = 0;
        self.cursors.iter_mut().for_each(|c| *c = 0);
    }

    fn current_text(&self) -> Option<(&'static str, String)> {
        let name = self.focused_field()?;
        match self.form.value(name)? {
            FieldValue::Text(text) => Some((name, text.clone())),
            FieldValue::File(_) => None,
        }
    }

    fn edit_current(&mut self, edit: impl FnOnce(&mut String, &mut usize)) {
        if self.form.is_submitting() {
            return;
        }
        let Some((name, mut text)) = self.current_text() else {
            return;
        };
        let cursor = &mut self.cursors[self.current_field];
        let before = text.clone();
        edit(&mut text, cursor);
        if text != before {
            self.form.handle_change(name, FieldValue::Text(text));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormKey {
        match key.code {
            KeyCode::Enter => FormKey::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.next_field();
                FormKey::Handled
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.previous_field();
                FormKey::Handled
            }
            KeyCode::Char(c) => {
                self.handle_char_input(c);
                FormKey::Handled
            }
            KeyCode::Backspace => {
                self.handle_backspace();
                FormKey::Handled
            }
            KeyCode::Delete => {
                self.handle_delete();
                FormKey::Handled
            }
            KeyCode::Left => {
                if let Some(cursor) = self.cursors.get_mut(self.current_field) {
                    *cursor = cursor.saturating_sub(1);
                }
                FormKey::Handled
            }
            KeyCode::Right => {
                if let Some((_, text)) = self.current_text() {
                    let cursor = &mut self.cursors[self.current_field];
                    *cursor = (*cursor + 1).min(text.chars().count());
                }
                FormKey::Handled
            }
            _ => FormKey::Ignored,
        }
    }

    /// Render-prop composition: `children` receives the area, the form, a bound field renderer and the submitting flag
    pub fn render<R>(
        &self,
        f: &mut Frame,
        area: Rect,
        children: impl FnOnce(&mut Frame, Rect, &Form<S>, &FieldRenderer<'_, S>, bool) -> R,
    ) -> R {
        let renderer = FieldRenderer {
            form: &self.form,
            focused: self.focused_field(),
            cursor: self.cursors.get(self.current_field).copied().unwrap_or(0),
        };
        children(f, area, &self.form, &renderer, self.form.is_submitting())
    }
}

fn byte_offset(text: &str, cursor: usize) -> usize {
    text.char_indices().nth(cursor).map(|(i, _)| i).unwrap_or(text.len())
}

impl<S: Schema> FormHandler for FormView<S> {
    fn get_current_field(&self) -> usize {
        self.current_field
    }

    fn set_current_field(&mut self, field: usize) {
        if field < self.fields.len() {
            if let Some(name) = self.focused_field() {
                self.form.handle_blur(name);
            }
            self.current_field = field;
        }
    }

    fn get_field_count(&self) -> usize {
        self.fields.len()
    }

    fn handle_char_input(&mut self, c: char) {
        self.edit_current(|text, cursor| {
            let at = byte_offset(text, *cursor);
            text.insert(at, c);
            *cursor += 1;
        });
    }

    fn handle_backspace(&mut self) {
        self.edit_current(|text, cursor| {
            if *cursor > 0 {
                *cursor -= 1;
                let at = byte_offset(text, *cursor);
                text.remove(at);
            }
        });
    }

    fn handle_delete(&mut self) {
        self.edit_current(|text, cursor| {
            if *cursor < text.chars().count() {
                let at = byte_offset(text, *cursor);
                text.remove(at);
            }
        });
    }
}

/// Submit button label that follows the submitting flag
pub fn submit_line(label: &str, busy_label: &str, is_submitting: bool) -> Line<'static> {
    if is_submitting {
        Line::from(Span::styled(format!("⟳ {}", busy_label), Styles::warning()))
    } else {
        Line::from(Span::styled(format!("[Enter] {}", label), Styles::success()))
    }
}
