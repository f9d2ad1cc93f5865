//! Send SMS: one message to one recipient, or a CSV campaign

use std::path::{Path, PathBuf};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use tracing::{debug, info, warn};

use crate::auth::Route;
use crate::forms::schema::is_csv_file;
use crate::forms::{FieldValue, SendToManySchema, SendToOneSchema, SubmitError, MAX_MESSAGE_CHARS};
use crate::models::{SendSmsBatchResponse, SendSmsResponse};
use crate::sms::{preview_csv, CsvPreview, CSV_TEMPLATE_HEADER, CSV_TEMPLATE_ROWS};
use crate::tui::components::form_field::{submit_line, FieldKind, FieldSpec, FormKey, FormView};
use crate::tui::components::search_input::{SearchEvent, SearchInput};
use crate::tui::components::toast::Toast;
use crate::tui::traits::{Screen, ScreenAction};
use crate::tui::ui::{render_page_header, Styles};

const CSV_FORMAT_NOTE: &str = "CSV Format Required: Your file should contain columns for phone numbers, \
recipient names, and any personalization fields.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMode {
    Single,
    Bulk,
}

pub struct SmsSenderScreen {
    mode: SendMode,
    pub single: FormView<SendToOneSchema>,
    pub bulk: FormView<SendToManySchema>,
    file_prompt: SearchInput,
    preview: Option<CsvPreview>,
    fields: [FieldSpec; 3],
}

impl Default for SmsSenderScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl SmsSenderScreen {
    pub fn new() -> Self {
        let mut file_prompt = SearchInput::new("Path to a .csv file, then Enter");
        file_prompt.is_focused = true;
        Self {
            mode: SendMode::Single,
            single: FormView::new(),
            bulk: FormView::new(),
            file_prompt,
            preview: None,
            fields: [
                FieldSpec::new("from", "From (Sender ID)", FieldKind::Text)
                    .with_description("Your sender name or number")
                    .with_placeholder("e.g., MyBusiness"),
                FieldSpec::new("to", "To (Recipient Number)", FieldKind::Text)
                    .with_description("Include country code")
                    .with_placeholder("e.g., +1234567890"),
                FieldSpec::new("text", "Message", FieldKind::TextArea { rows: 5 })
                    .with_placeholder("Type your SMS message here..."),
            ],
        }
    }

    pub fn mode(&self) -> SendMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SendMode) {
        if self.mode != mode {
            debug!("SMS sender switched to {:?}", mode);
            self.mode = mode;
        }
    }

    pub fn preview(&self) -> Option<&CsvPreview> {
        self.preview.as_ref()
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.bulk.form.value("file").and_then(FieldValue::as_file)
    }

    /// Pick the campaign file; anything that is not a readable CSV leaves the field empty
    pub fn select_file(&mut self, path: PathBuf) -> Option<Toast> {
        if !is_csv_file(&path) {
            warn!("Rejected non-CSV file {}", path.display());
            self.bulk.form.set_field_value("file", FieldValue::File(None));
            self.preview = None;
            return Some(Toast::error("Please select a CSV file"));
        }

        match preview_csv(&path) {
            Ok(preview) => {
                info!("Selected {} ({} row(s))", path.display(), preview.rows);
                self.preview = Some(preview);
                self.bulk.form.set_field_value("file", FieldValue::File(Some(path)));
                None
            }
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                self.bulk.form.set_field_value("file", FieldValue::File(None));
                self.preview = None;
                Some(Toast::error(format!("Could not read {}: {}", path.display(), e)))
            }
        }
    }

    /// Settle a single send; success clears the form
    pub fn finish_single(&mut self, to: &str, result: &Result<SendSmsResponse, String>) -> Toast {
        self.single.form.finish_submit();
        match result {
            Ok(response) if response.success => {
                self.single.reset();
                Toast::success(format!("SMS sent successfully to {}", to))
            }
            Ok(response) if !response.message.is_empty() => Toast::error(response.message.clone()),
            Ok(_) => Toast::error("Failed to send SMS"),
            Err(message) => Toast::error(message.clone()),
        }
    }

    /// Settle a campaign upload; success clears the form and the preview
    pub fn finish_batch(&mut self, result: &Result<SendSmsBatchResponse, String>) -> Toast {
        self.bulk.form.finish_submit();
        match result {
            Ok(response) => {
                self.bulk.reset();
                self.preview = None;
                Toast::success(format!(
                    "SMS campaign started! Total batches: {}, Total messages: {}",
                    response.total_batches, response.total_messages
                ))
            }
            Err(message) => Toast::error(message.clone()),
        }
    }

    fn handle_single_key(&mut self, key: KeyEvent) -> ScreenAction {
        if self.single.handle_key(key) != FormKey::Submit {
            return ScreenAction::None;
        }
        match self.single.form.begin_submit() {
            Ok(payload) => ScreenAction::SendSms(payload),
            Err(SubmitError::AlreadySubmitting) => ScreenAction::None,
            Err(SubmitError::Invalid(errors)) => {
                debug!("Send form invalid: {:?}", errors.keys().collect::<Vec<_>>());
                ScreenAction::None
            }
        }
    }

    fn handle_bulk_key(&mut self, key: KeyEvent) -> ScreenAction {
        if self.bulk.is_submitting() {
            return ScreenAction::None;
        }
        match self.file_prompt.handle_key(key) {
            SearchEvent::Submitted(path) if !path.trim().is_empty() => {
                self.file_prompt.clear();
                match self.select_file(PathBuf::from(path.trim())) {
                    Some(toast) => ScreenAction::Notify(toast),
                    None => ScreenAction::None,
                }
            }
            SearchEvent::Submitted(_) => match self.bulk.form.begin_submit() {
                Ok(path) => ScreenAction::SendSmsBatch(path),
                Err(e) => {
                    debug!("Campaign form not submitted: {}", e);
                    ScreenAction::None
                }
            },
            SearchEvent::Blurred => {
                self.file_prompt.is_focused = true;
                ScreenAction::None
            }
            SearchEvent::Changed(_) | SearchEvent::Ignored => ScreenAction::None,
        }
    }

    fn draw_modes(&self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = [
            (SendMode::Single, "F5 Send to One", "Single recipient"),
            (SendMode::Bulk, "F6 Send to Many", "Bulk via CSV"),
        ]
        .into_iter()
        .map(|(mode, title, subtitle)| {
            let style = if mode == self.mode { Styles::selected() } else { Styles::default() };
            ListItem::new(vec![
                Line::from(Span::styled(title, style)),
                Line::from(Span::styled(subtitle, Styles::inactive())),
                Line::from(""),
            ])
        })
        .collect();

        let list = List::new(items).block(Block::default().title("Mode").borders(Borders::ALL));
        f.render_widget(list, area);
    }

    fn draw_single(&self, f: &mut Frame, area: Rect) {
        let [from, to, text] = &self.fields;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(from.height()),
                Constraint::Length(to.height()),
                Constraint::Length(text.height()),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(area);

        self.single.render(f, area, |f, _area, form, field, is_submitting| {
            field.render(f, chunks[0], from);
            field.render(f, chunks[1], to);
            field.render(f, chunks[2], text);

            let count = form.text("text").chars().count();
            let counter_style = if count > MAX_MESSAGE_CHARS { Styles::error() } else { Styles::inactive() };
            let counter = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(0), Constraint::Length(10)])
                .split(chunks[3]);
            f.render_widget(
                Paragraph::new(Span::styled(format!("Max {} characters", MAX_MESSAGE_CHARS), Styles::inactive())),
                counter[0],
            );
            f.render_widget(
                Paragraph::new(Span::styled(format!("{}/{}", count, MAX_MESSAGE_CHARS), counter_style))
                    .alignment(Alignment::Right),
                counter[1],
            );

            f.render_widget(Paragraph::new(submit_line("Send SMS", "Sending...", is_submitting)), chunks[4]);
        });
    }

    fn draw_bulk(&self, f: &mut Frame, area: Rect) {
        let template_height = CSV_TEMPLATE_ROWS.len() as u16 + 4;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(6),
                Constraint::Length(1),
                Constraint::Length(template_height),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        f.render_widget(
            Paragraph::new(Span::styled(CSV_FORMAT_NOTE, Styles::info())).wrap(Wrap { trim: true }),
            chunks[0],
        );

        let upload = Block::default()
            .title("Upload CSV File")
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let upload_inner = upload.inner(chunks[1]);
        f.render_widget(upload, chunks[1]);
        let upload_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Min(0)])
            .split(upload_inner);

        let status = match (self.selected_file(), &self.preview) {
            (Some(path), preview) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let mut lines = vec![Line::from(Span::styled(format!("✓ {}", name), Styles::success()))];
                let detail = match preview {
                    Some(p) if !p.matches_template() => {
                        format!("Ready to upload ({} row(s), header differs from template)", p.rows)
                    }
                    Some(p) => format!("Ready to upload ({} row(s))", p.rows),
                    None => "Ready to upload".to_string(),
                };
                lines.push(Line::from(Span::styled(detail, Styles::inactive())));
                lines
            }
            (None, _) => vec![
                Line::from("Drag & Drop your CSV here"),
                Line::from(Span::styled("or type its path below and press Enter", Styles::inactive())),
            ],
        };
        f.render_widget(Paragraph::new(status), upload_rows[0]);
        self.file_prompt.render(f, upload_rows[2]);

        if let Some(state) = self.bulk.form.state("file").filter(|s| s.is_invalid()) {
            f.render_widget(
                Paragraph::new(Span::styled(state.meta.errors.join(", "), Styles::error())),
                chunks[2],
            );
        }

        let mut template = vec![Line::from(Span::styled(CSV_TEMPLATE_HEADER, Styles::title()))];
        template.extend(CSV_TEMPLATE_ROWS.iter().map(|row| Line::from(*row)));
        f.render_widget(
            Paragraph::new(template).block(Block::default().title("CSV Template Example:").borders(Borders::ALL)),
            chunks[3],
        );

        let button = if self.selected_file().is_some() || self.bulk.is_submitting() {
            submit_line("Send SMS Campaign", "Processing...", self.bulk.is_submitting())
        } else {
            Line::from(Span::styled("[Enter] Send SMS Campaign", Styles::inactive()))
        };
        f.render_widget(Paragraph::new(button), chunks[4]);
    }
}

impl Screen for SmsSenderScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(10)])
            .split(area);
        render_page_header(f, rows[0], "Send SMS", "Send SMS messages to customers individually or in bulk");

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(24), Constraint::Min(30)])
            .split(rows[1]);
        self.draw_modes(f, columns[0]);

        let title = match self.mode {
            SendMode::Single => "Send to One",
            SendMode::Bulk => "Send to Many",
        };
        let card = Block::default().title(title).borders(Borders::ALL);
        let inner = card.inner(columns[1]);
        f.render_widget(card, columns[1]);

        match self.mode {
            SendMode::Single => self.draw_single(f, inner),
            SendMode::Bulk => self.draw_bulk(f, inner),
        }
    }

    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction> {
        match key.code {
            KeyCode::F(5) => self.set_mode(SendMode::Single),
            KeyCode::F(6) => self.set_mode(SendMode::Bulk),
            _ => {
                return Ok(match self.mode {
                    SendMode::Single => self.handle_single_key(key),
                    SendMode::Bulk => self.handle_bulk_key(key),
                })
            }
        }
        Ok(ScreenAction::None)
    }

    fn route(&self) -> Route {
        Route::SmsSender
    }

    fn is_editing(&self) -> bool {
        true
    }

    fn help(&self) -> &'static str {
        "Send SMS:\n\
        F5 - Send to one recipient\n\
        F6 - Send to many (CSV)\n\
        Tab / ↑↓ - Move between fields\n\
        Enter - Send (in bulk mode, selects the typed path first)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::io::Write;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn type_text(screen: &mut SmsSenderScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_single_send_builds_payload() {
        let mut screen = SmsSenderScreen::new();
        type_text(&mut screen, "MyBusiness").await;
        screen.handle_key_event(key(KeyCode::Tab)).await.unwrap();
        type_text(&mut screen, "+1234567890").await;
        screen.handle_key_event(key(KeyCode::Tab)).await.unwrap();
        type_text(&mut screen, "Hello").await;

        let action = screen.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        match action {
            ScreenAction::SendSms(payload) => {
                assert_eq!(payload.from, "MyBusiness");
                assert_eq!(payload.to, "+1234567890");
                assert_eq!(payload.message, "Hello");
            }
            other => panic!("unexpected action {:?}", other),
        }
        assert!(screen.single.is_submitting());

        let toast = screen.finish_single(
            "+1234567890",
            &Ok(SendSmsResponse {
                success: true,
                message: String::new(),
            }),
        );
        assert_eq!(toast.message, "SMS sent successfully to +1234567890");
        assert_eq!(screen.single.form.text("from"), "");
        assert!(!screen.single.is_submitting());
    }

    #[test]
    fn test_failed_send_keeps_values() {
        let mut screen = SmsSenderScreen::new();
        screen.single.form.handle_change("to", FieldValue::text("+1"));
        let toast = screen.finish_single(
            "+1",
            &Ok(SendSmsResponse {
                success: false,
                message: String::new(),
            }),
        );
        assert_eq!(toast.message, "Failed to send SMS");
        assert_eq!(screen.single.form.text("to"), "+1");

        let toast = screen.finish_single("+1", &Err("HTTP 500".to_string()));
        assert_eq!(toast.message, "HTTP 500");
    }

    #[tokio::test]
    async fn test_bulk_submit_without_file_is_rejected() {
        let mut screen = SmsSenderScreen::new();
        screen.handle_key_event(key(KeyCode::F(6))).await.unwrap();
        assert_eq!(screen.mode(), SendMode::Bulk);

        let action = screen.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(action, ScreenAction::None);
        let state = screen.bulk.form.state("file").unwrap();
        assert!(state.is_invalid());
        assert_eq!(state.meta.errors, vec!["CSV file is required".to_string()]);
    }

    #[tokio::test]
    async fn test_non_csv_selection_is_refused() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "contacts.txt", "phone\n+1\n");
        let mut screen = SmsSenderScreen::new();
        screen.set_mode(SendMode::Bulk);

        type_text(&mut screen, &path.display().to_string()).await;
        let action = screen.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        match action {
            ScreenAction::Notify(toast) => assert_eq!(toast.message, "Please select a CSV file"),
            other => panic!("unexpected action {:?}", other),
        }
        assert!(screen.selected_file().is_none());
    }

    #[tokio::test]
    async fn test_csv_selection_then_submit() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "contacts.csv", "phone,name,message\n+1234567890,John,Hi\n");
        let mut screen = SmsSenderScreen::new();
        screen.set_mode(SendMode::Bulk);

        assert!(screen.select_file(path.clone()).is_none());
        assert_eq!(screen.selected_file(), Some(path.as_path()));
        assert!(screen.preview().unwrap().matches_template());

        let action = screen.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(action, ScreenAction::SendSmsBatch(path));

        let toast = screen.finish_batch(&Ok(SendSmsBatchResponse {
            status: "queued".to_string(),
            total_batches: 1,
            total_messages: 1,
        }));
        assert_eq!(toast.message, "SMS campaign started! Total batches: 1, Total messages: 1");
        assert!(screen.selected_file().is_none());
        assert!(screen.preview().is_none());
    }
}
