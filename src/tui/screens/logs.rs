//! SMS logs: searchable, filterable log table with CSV export of the selection

use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    Frame,
};
use tracing::{debug, info};

use crate::auth::Route;
use crate::export::select_entries;
use crate::models::{LogStatus, SmsLogEntry};
use crate::sample_data::{self, filter_logs};
use crate::storage::LocalStorage;
use crate::tui::components::table_view::{
    BulkActionKind, ColumnDef, ColumnVisibility, Pager, TableAction, TableBulkAction, TableOptions, TableRow,
    TableView, TABLE_HELP,
};
use crate::tui::components::toast::Toast;
use crate::tui::traits::{Paginated, Screen, ScreenAction};
use crate::tui::ui::{render_page_header, Styles};

pub const LOGS_TABLE_KEY: &str = "logs-table";

const EXPORT_ACTION: usize = 0;

impl TableRow for SmsLogEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

pub fn status_color(status: LogStatus) -> Color {
    match status {
        LogStatus::Delivered => Color::Green,
        LogStatus::Read => Color::Blue,
        LogStatus::Pending => Color::Yellow,
        LogStatus::Failed => Color::Red,
    }
}

pub struct LogsScreen {
    entries: Vec<SmsLogEntry>,
    filtered: Vec<SmsLogEntry>,
    query: String,
    status_filter: Option<LogStatus>,
    pager: Pager,
    pub table: TableView<SmsLogEntry>,
}

impl LogsScreen {
    pub async fn new(storage: Option<LocalStorage>) -> Self {
        Self::with_entries(sample_data::logs(), storage).await
    }

    pub async fn with_entries(entries: Vec<SmsLogEntry>, storage: Option<LocalStorage>) -> Self {
        let options = TableOptions::new(LOGS_TABLE_KEY)
            .with_title("Logs")
            .with_row_selection()
            .with_search("Search destination, source or subaccount...")
            .fit_content(&["cost", "status"]);
        let default_hidden = TableView::<SmsLogEntry>::default_hidden(&options);
        let visibility = match storage {
            Some(storage) => ColumnVisibility::load(storage, LOGS_TABLE_KEY, &default_hidden).await,
            None => ColumnVisibility::seeded(LOGS_TABLE_KEY, &default_hidden),
        };
        let table = TableView::new(log_columns(), options, visibility).with_bulk_actions(vec![
            TableBulkAction::new("Export CSV", BulkActionKind::Positive).with_loading_label("Exporting..."),
        ]);

        let mut screen = Self {
            filtered: Vec::new(),
            entries,
            query: String::new(),
            status_filter: None,
            pager: Pager::default(),
            table,
        };
        screen.refilter();
        screen
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn visible_entries(&self) -> &[SmsLogEntry] {
        &self.filtered
    }

    pub fn status_filter(&self) -> Option<LogStatus> {
        self.status_filter
    }

    /// Entries to export for the given ids, in log order
    pub fn entries_by_ids(&self, ids: &[String]) -> Vec<SmsLogEntry> {
        select_entries(&self.entries, ids)
    }

    fn refilter(&mut self) {
        self.filtered = filter_logs(&self.entries, &self.query, self.status_filter);
        self.pager.set_total_count(self.filtered.len());
        self.pager.go_to_first_page();
        self.table.reset_page_state();
        self.table.set_filters(Some(self.filter_line()));
        debug!(
            "Log filter query='{}' status={:?}: {} of {} entries",
            self.query,
            self.status_filter,
            self.filtered.len(),
            self.entries.len()
        );
    }

    fn filter_line(&self) -> Line<'static> {
        let (label, style) = match self.status_filter {
            Some(status) => (status.as_str().to_string(), Style::default().fg(status_color(status))),
            None => ("All".to_string(), Styles::default()),
        };
        Line::from(vec![
            Span::styled("[f] Status: ", Styles::inactive()),
            Span::styled(label, style),
        ])
    }

    /// Cycle All -> Delivered -> Read -> Pending -> Failed -> All
    pub fn cycle_status_filter(&mut self) {
        self.status_filter = match self.status_filter {
            None => LogStatus::ALL.first().copied(),
            Some(current) => LogStatus::ALL
                .iter()
                .position(|s| *s == current)
                .and_then(|i| LogStatus::ALL.get(i + 1).copied()),
        };
        self.refilter();
    }

    pub fn set_query(&mut self, query: &str) {
        if self.query != query {
            self.query = query.to_string();
            self.refilter();
        }
    }

    pub fn clear_filters(&mut self) {
        self.query.clear();
        self.status_filter = None;
        if let Some(search) = self.table.search_mut() {
            search.clear();
        }
        self.refilter();
    }

    pub fn apply_table_action(&mut self, action: TableAction) -> ScreenAction {
        match action {
            TableAction::PageChange(page) => self.pager.set_current_page(page),
            TableAction::PageSizeChange(size) => self.pager.set_page_size(size),
            TableAction::SearchChange(query) | TableAction::Search(query) => self.set_query(&query),
            TableAction::ClearFilters => self.clear_filters(),
            TableAction::BulkAction { index: EXPORT_ACTION, ids } => {
                info!("Exporting {} log entr(ies)", ids.len());
                self.table.set_bulk_action_loading(EXPORT_ACTION, true);
                return ScreenAction::ExportLogs(ids);
            }
            _ => {}
        }
        ScreenAction::None
    }

    /// Settle a finished export and describe the outcome
    pub fn finish_export(&mut self, result: &Result<(PathBuf, usize), String>) -> Toast {
        self.table.set_bulk_action_loading(EXPORT_ACTION, false);
        match result {
            Ok((path, count)) => {
                self.table.clear_selection();
                Toast::success(format!("Exported {} log(s) to {}", count, path.display()))
            }
            Err(message) => Toast::error(format!("Export failed: {}", message)),
        }
    }
}

fn log_columns() -> Vec<ColumnDef<SmsLogEntry>> {
    vec![
        ColumnDef::accessor("subaccount", "Subaccount", |e: &SmsLogEntry| e.subaccount.clone()),
        ColumnDef::accessor("date_sent_received", "Date sent/received (UTC+0 8:00)", |e: &SmsLogEntry| {
            e.date_sent_received.clone()
        }),
        ColumnDef::accessor("destination", "Destination", |e: &SmsLogEntry| e.destination.clone()),
        ColumnDef::accessor("source", "Source", |e: &SmsLogEntry| e.source.clone()),
        ColumnDef::accessor("cost", "Cost", |e: &SmsLogEntry| e.cost.clone()),
        ColumnDef::new("status", "Status", |e: &SmsLogEntry| {
            Span::styled(e.status.as_str().to_string(), Style::default().fg(status_color(e.status)))
        }),
    ]
}

impl Screen for LogsScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(8)])
            .split(area);

        render_page_header(f, chunks[0], "SMS Logs", "Messages sent and received");
        let rows = self.pager.slice(&self.filtered);
        self.table.render(f, chunks[1], rows, self.pager.descriptor());
    }

    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction> {
        let rows = self.pager.slice(&self.filtered);
        let action = self.table.handle_key(key, rows, self.pager.descriptor()).await;
        if action == TableAction::Ignored && key.code == KeyCode::Char('f') {
            self.cycle_status_filter();
            return Ok(ScreenAction::None);
        }
        Ok(self.apply_table_action(action))
    }

    fn route(&self) -> Route {
        Route::Logs
    }

    fn is_editing(&self) -> bool {
        self.table.is_capturing_input()
    }

    fn help(&self) -> &'static str {
        TABLE_HELP
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_status_filter_cycles_back_to_all() {
        let mut screen = LogsScreen::new(None).await;
        assert_eq!(screen.route(), Route::Logs);
        let total = screen.visible_entries().len();

        screen.handle_key_event(key(KeyCode::Char('f'))).await.unwrap();
        assert_eq!(screen.status_filter(), Some(LogStatus::Delivered));
        assert!(screen
            .visible_entries()
            .iter()
            .all(|e| e.status == LogStatus::Delivered));

        for _ in 0..LogStatus::ALL.len() {
            screen.cycle_status_filter();
        }
        assert_eq!(screen.status_filter(), None);
        assert_eq!(screen.visible_entries().len(), total);
    }

    #[tokio::test]
    async fn test_search_then_clear_filters() {
        let mut screen = LogsScreen::new(None).await;
        let total = screen.visible_entries().len();
        let destination = screen.visible_entries()[0].destination.clone();

        screen.handle_key_event(key(KeyCode::Char('/'))).await.unwrap();
        for c in destination.chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).await.unwrap();
        }
        assert!(screen.is_editing());
        assert!(screen
            .visible_entries()
            .iter()
            .all(|e| e.destination.contains(&destination)));

        screen.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        assert!(!screen.is_editing());
        screen.handle_key_event(key(KeyCode::Char('r'))).await.unwrap();
        assert_eq!(screen.visible_entries().len(), total);
        assert_eq!(screen.table.search_mut().map(|s| s.value().to_string()), Some(String::new()));
    }

    #[tokio::test]
    async fn test_export_action_carries_selected_ids() {
        let mut screen = LogsScreen::new(None).await;
        let first = screen.visible_entries()[0].id.clone();

        screen.handle_key_event(key(KeyCode::Down)).await.unwrap();
        screen.handle_key_event(key(KeyCode::Char(' '))).await.unwrap();
        let action = screen.handle_key_event(key(KeyCode::Char('1'))).await.unwrap();
        assert_eq!(action, ScreenAction::ExportLogs(vec![first.clone()]));
        assert!(screen.table.bulk_actions()[0].is_loading);
        assert_eq!(screen.entries_by_ids(&[first.clone()])[0].id, first);

        // A second press while exporting is ignored
        let again = screen.handle_key_event(key(KeyCode::Char('1'))).await.unwrap();
        assert_eq!(again, ScreenAction::None);

        let toast = screen.finish_export(&Ok((PathBuf::from("/tmp/logs.csv"), 1)));
        assert_eq!(toast.message, "Exported 1 log(s) to /tmp/logs.csv");
        assert!(!screen.table.bulk_actions()[0].is_loading);
        assert!(screen.table.selection().is_empty());
    }

    #[tokio::test]
    async fn test_empty_filter_result_has_no_pages() {
        let mut screen = LogsScreen::new(None).await;
        screen.set_query("no-such-destination");
        assert!(screen.visible_entries().is_empty());
        assert_eq!(screen.pager().descriptor().page_count, 0);
        assert!(!screen.pager().descriptor().can_next());
    }

    #[tokio::test]
    async fn test_page_change_stays_within_results() {
        let mut screen = LogsScreen::new(None).await;
        screen.apply_table_action(TableAction::PageSizeChange(10));
        screen.apply_table_action(TableAction::PageChange(5));
        assert_eq!(screen.pager().get_current_page(), 0);
        assert_eq!(screen.pager().descriptor().page_label(), "Page 1 of 1");
    }
}
