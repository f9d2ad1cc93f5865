//! Generic data table: paging footer, row selection, persisted column visibility and bulk actions
//!
//! The table never owns its rows or its pagination. Screens pass the current
//! page of rows and a [`TablePagination`] on every render and key press, and
//! the table answers with a [`TableAction`] describing what the user asked for.

pub mod column;
pub mod pagination;
pub mod selection;
pub mod visibility;

pub use column::{ColumnDef, ColumnHeader, TableRow, ACTIONS_COLUMN_ID, NUMBER_COLUMN_ID, SELECT_COLUMN_ID};
pub use pagination::{page_count, Pager, TablePagination, DEFAULT_PAGE_SIZE, PAGE_SIZES};
pub use selection::RowSelection;
pub use visibility::{ColumnVisibility, VisibilityState};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState},
    Frame,
};
use tracing::{debug, warn};

use super::search_input::{SearchEvent, SearchInput};
use crate::tui::ui::{centered_rect, Styles};

/// Requests the table reports to its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    None,
    /// Key not consumed by the table
    Ignored,
    PageChange(usize),
    PageSizeChange(usize),
    SearchChange(String),
    Search(String),
    ClearFilters,
    /// A bulk action was invoked on the selected rows' domain ids
    BulkAction { index: usize, ids: Vec<String> },
    ColumnVisibilityChange(VisibilityState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkActionKind {
    Positive,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBulkAction {
    pub label: String,
    pub loading_label: Option<String>,
    pub is_loading: bool,
    pub kind: BulkActionKind,
}

impl TableBulkAction {
    pub fn new(label: &str, kind: BulkActionKind) -> Self {
        Self {
            label: label.to_string(),
            loading_label: None,
            is_loading: false,
            kind,
        }
    }

    pub fn with_loading_label(mut self, label: &str) -> Self {
        self.loading_label = Some(label.to_string());
        self
    }

    fn display_label(&self) -> String {
        if self.is_loading {
            self.loading_label
                .clone()
                .unwrap_or_else(|| format!("{}...", self.label))
        } else {
            self.label.clone()
        }
    }
}

/// Static table configuration
#[derive(Debug, Clone)]
pub struct TableOptions {
    pub storage_key: String,
    pub title: String,
    pub enable_row_selection: bool,
    pub fit_content_columns: Vec<String>,
    pub default_hidden_columns: Vec<String>,
    pub show_filters: bool,
    pub search_placeholder: Option<String>,
}

impl TableOptions {
    pub fn new(storage_key: &str) -> Self {
        Self {
            storage_key: storage_key.to_string(),
            title: String::new(),
            enable_row_selection: false,
            fit_content_columns: Vec::new(),
            default_hidden_columns: Vec::new(),
            show_filters: true,
            search_placeholder: None,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_row_selection(mut self) -> Self {
        self.enable_row_selection = true;
        self
    }

    pub fn with_search(mut self, placeholder: &str) -> Self {
        self.search_placeholder = Some(placeholder.to_string());
        self
    }

    pub fn fit_content(mut self, columns: &[&str]) -> Self {
        self.fit_content_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn default_hidden(mut self, columns: &[&str]) -> Self {
        self.default_hidden_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn without_filters(mut self) -> Self {
        self.show_filters = false;
        self
    }

    /// Fit-content ids, always including the synthesized and action columns
    pub fn fit_content_ids(&self) -> Vec<&str> {
        let mut ids = vec![ACTIONS_COLUMN_ID, SELECT_COLUMN_ID, NUMBER_COLUMN_ID];
        ids.extend(self.fit_content_columns.iter().map(String::as_str));
        ids
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableFocus {
    Rows,
    Search,
    ColumnMenu,
}

/// One renderable column after synthesized columns are added and hidden ones dropped
enum VisibleColumn<'a, T> {
    Select,
    Number,
    Data(&'a ColumnDef<T>),
}

impl<'a, T> VisibleColumn<'a, T> {
    fn id(&self) -> &str {
        match self {
            VisibleColumn::Select => SELECT_COLUMN_ID,
            VisibleColumn::Number => NUMBER_COLUMN_ID,
            VisibleColumn::Data(column) => &column.id,
        }
    }
}

/// Entry of the column visibility menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMenuEntry {
    pub id: String,
    pub label: String,
    pub visible: bool,
}

pub struct TableView<T> {
    columns: Vec<ColumnDef<T>>,
    options: TableOptions,
    visibility: ColumnVisibility,
    selection: RowSelection,
    bulk_actions: Vec<TableBulkAction>,
    search: Option<SearchInput>,
    filters: Option<Line<'static>>,
    state: TableState,
    menu_state: ListState,
    focus: TableFocus,
    pub is_loading: bool,
}

impl<T: TableRow> TableView<T> {
    pub fn new(columns: Vec<ColumnDef<T>>, options: TableOptions, visibility: ColumnVisibility) -> Self {
        let search = options.search_placeholder.as_deref().map(SearchInput::new);
        Self {
            columns,
            options,
            visibility,
            selection: RowSelection::new(),
            bulk_actions: Vec::new(),
            search,
            filters: None,
            state: TableState::default(),
            menu_state: ListState::default(),
            focus: TableFocus::Rows,
            is_loading: false,
        }
    }

    /// Default-hidden ids as the visibility loader expects them
    pub fn default_hidden(options: &TableOptions) -> Vec<&str> {
        options.default_hidden_columns.iter().map(String::as_str).collect()
    }

    pub fn with_bulk_actions(mut self, actions: Vec<TableBulkAction>) -> Self {
        self.bulk_actions = actions;
        self
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    pub fn visibility(&self) -> &ColumnVisibility {
        &self.visibility
    }

    pub fn bulk_actions(&self) -> &[TableBulkAction] {
        &self.bulk_actions
    }

    pub fn set_bulk_action_loading(&mut self, index: usize, is_loading: bool) {
        if let Some(action) = self.bulk_actions.get_mut(index) {
            action.is_loading = is_loading;
        }
    }

    /// Caller-owned filter controls shown beside the search box
    pub fn set_filters(&mut self, filters: Option<Line<'static>>) {
        self.filters = filters;
    }

    pub fn search_mut(&mut self) -> Option<&mut SearchInput> {
        self.search.as_mut()
    }

    pub fn is_search_focused(&self) -> bool {
        self.focus == TableFocus::Search
    }

    pub fn is_column_menu_open(&self) -> bool {
        self.focus == TableFocus::ColumnMenu
    }

    /// Whether keys are captured by the search box or column menu
    pub fn is_capturing_input(&self) -> bool {
        self.focus != TableFocus::Rows
    }

    pub fn cursor(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Forget per-page state after the owner switched pages or rows
    pub fn reset_page_state(&mut self) {
        self.selection.clear();
        self.state.select(None);
    }

    /// Columns listed in the visibility menu
    pub fn column_menu_entries(&self) -> Vec<ColumnMenuEntry> {
        self.columns
            .iter()
            .filter(|c| c.in_column_menu())
            .filter_map(|c| {
                c.header.label().map(|label| ColumnMenuEntry {
                    id: c.id.clone(),
                    label: label.to_string(),
                    visible: self.visibility.is_visible(&c.id),
                })
            })
            .collect()
    }

    /// Ids of the columns that will be drawn, in order
    pub fn visible_column_ids(&self) -> Vec<String> {
        self.visible_columns()
            .iter()
            .map(|column| column.id().to_string())
            .collect()
    }

    fn visible_columns(&self) -> Vec<VisibleColumn<'_, T>> {
        let mut columns = Vec::new();
        if self.options.enable_row_selection {
            columns.push(VisibleColumn::Select);
        }
        columns.push(VisibleColumn::Number);
        columns.extend(
            self.columns
                .iter()
                .filter(|c| self.visibility.is_visible(&c.id))
                .map(VisibleColumn::Data),
        );
        columns
    }

    /// Flip a column's visibility and persist the whole map
    pub async fn toggle_column(&mut self, column_id: &str) -> TableAction {
        let visible = self.visibility.toggle(column_id);
        debug!(
            "Column '{}' in '{}' is now {}",
            column_id,
            self.visibility.storage_key(),
            if visible { "visible" } else { "hidden" }
        );
        if let Err(e) = self.visibility.save().await {
            warn!("Failed to persist column visibility: {}", e);
        }
        TableAction::ColumnVisibilityChange(self.visibility.state().clone())
    }

    /// Ids of the selected rows, for invoking bulk action `index`
    pub fn invoke_bulk_action(&self, index: usize, rows: &[T]) -> TableAction {
        match self.bulk_actions.get(index) {
            Some(action) if !action.is_loading && !self.selection.is_empty() => TableAction::BulkAction {
                index,
                ids: self.selection.selected_ids(rows),
            },
            _ => TableAction::None,
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent, rows: &[T], pagination: TablePagination) -> TableAction {
        match self.focus {
            TableFocus::Search => self.handle_search_key(key),
            TableFocus::ColumnMenu => self.handle_menu_key(key).await,
            TableFocus::Rows => self.handle_rows_key(key, rows, pagination),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> TableAction {
        let Some(search) = self.search.as_mut() else {
            self.focus = TableFocus::Rows;
            return TableAction::Ignored;
        };

        match search.handle_key(key) {
            SearchEvent::Changed(value) => TableAction::SearchChange(value),
            SearchEvent::Submitted(value) => {
                search.is_focused = false;
                self.focus = TableFocus::Rows;
                TableAction::Search(value)
            }
            SearchEvent::Blurred => {
                self.focus = TableFocus::Rows;
                TableAction::None
            }
            SearchEvent::Ignored => TableAction::None,
        }
    }

    async fn handle_menu_key(&mut self, key: KeyEvent) -> TableAction {
        let entries = self.column_menu_entries();
        match key.code {
            KeyCode::Esc | KeyCode::Char('v') => {
                self.focus = TableFocus::Rows;
                TableAction::None
            }
            KeyCode::Up => {
                let i = self.menu_state.selected().unwrap_or(0);
                self.menu_state
                    .select(Some(if i == 0 { entries.len().saturating_sub(1) } else { i - 1 }));
                TableAction::None
            }
            KeyCode::Down => {
                let i = self.menu_state.selected().unwrap_or(0);
                self.menu_state.select(Some((i + 1) % entries.len().max(1)));
                TableAction::None
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let selected = self.menu_state.selected().unwrap_or(0);
                match entries.get(selected) {
                    Some(entry) => self.toggle_column(&entry.id).await,
                    None => TableAction::None,
                }
            }
            _ => TableAction::None,
        }
    }

    fn handle_rows_key(&mut self, key: KeyEvent, rows: &[T], pagination: TablePagination) -> TableAction {
        match key.code {
            KeyCode::Up => {
                self.move_cursor(rows.len(), false);
                TableAction::None
            }
            KeyCode::Down => {
                self.move_cursor(rows.len(), true);
                TableAction::None
            }
            KeyCode::Char(' ') if self.options.enable_row_selection => {
                if let Some(i) = self.state.selected().filter(|i| *i < rows.len()) {
                    self.selection.toggle(i);
                }
                TableAction::None
            }
            KeyCode::Char('a') if self.options.enable_row_selection => {
                self.selection.toggle_all(rows.len());
                TableAction::None
            }
            KeyCode::Char('c') if !self.selection.is_empty() => {
                self.selection.clear();
                TableAction::None
            }
            KeyCode::Left | KeyCode::PageUp => {
                if pagination.can_previous() {
                    self.reset_page_state();
                    TableAction::PageChange(pagination.page_index - 1)
                } else {
                    TableAction::None
                }
            }
            KeyCode::Right | KeyCode::PageDown => {
                if pagination.can_next() {
                    self.reset_page_state();
                    TableAction::PageChange(pagination.page_index + 1)
                } else {
                    TableAction::None
                }
            }
            KeyCode::Char('s') => {
                self.reset_page_state();
                TableAction::PageSizeChange(pagination.next_page_size())
            }
            KeyCode::Char('v') if self.options.show_filters => {
                self.focus = TableFocus::ColumnMenu;
                self.menu_state.select(Some(0));
                TableAction::None
            }
            KeyCode::Char('/') if self.options.show_filters && self.search.is_some() => {
                self.focus = TableFocus::Search;
                if let Some(search) = self.search.as_mut() {
                    search.is_focused = true;
                }
                TableAction::None
            }
            KeyCode::Char('r') if self.options.show_filters => TableAction::ClearFilters,
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < self.bulk_actions.len() {
                    self.invoke_bulk_action(index, rows)
                } else {
                    TableAction::Ignored
                }
            }
            _ => TableAction::Ignored,
        }
    }

    fn move_cursor(&mut self, len: usize, down: bool) {
        if len == 0 {
            self.state.select(None);
            return;
        }
        let next = match self.state.selected() {
            Some(i) if down => (i + 1) % len,
            Some(i) => {
                if i == 0 || i >= len {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(next));
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, rows: &[T], pagination: TablePagination) {
        let mut constraints = Vec::new();
        if self.options.show_filters {
            constraints.push(Constraint::Length(3));
        }
        if !self.selection.is_empty() {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(3));
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut next = 0;
        if self.options.show_filters {
            self.render_filter_bar(f, chunks[next]);
            next += 1;
        }
        if !self.selection.is_empty() {
            self.render_selection_bar(f, chunks[next]);
            next += 1;
        }
        self.render_table(f, chunks[next], rows, pagination);
        self.render_footer(f, chunks[next + 1], pagination);

        if self.focus == TableFocus::ColumnMenu {
            self.render_column_menu(f, area);
        }
    }

    fn render_filter_bar(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(36), Constraint::Min(0), Constraint::Length(30)])
            .split(area);

        if let Some(search) = &self.search {
            search.render(f, chunks[0]);
        }

        if let Some(filters) = &self.filters {
            let paragraph = Paragraph::new(filters.clone()).block(Block::default().borders(Borders::ALL));
            f.render_widget(paragraph, chunks[1]);
        }

        let controls = Paragraph::new("r: Clear filters  v: Columns")
            .style(Styles::inactive())
            .alignment(Alignment::Right)
            .block(Block::default().borders(Borders::ALL).border_style(Styles::inactive_border()));
        f.render_widget(controls, chunks[2]);
    }

    fn render_selection_bar(&self, f: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(format!("{} row(s) selected", self.selection.count()), Styles::title()),
            Span::raw("  "),
            Span::styled("[c] Clear Selection", Styles::inactive()),
        ];

        for (i, action) in self.bulk_actions.iter().enumerate() {
            let style = match (action.is_loading, action.kind) {
                (true, _) => Styles::inactive(),
                (false, BulkActionKind::Positive) => Styles::success(),
                (false, BulkActionKind::Destructive) => Styles::error(),
            };
            spans.push(Span::raw("  "));
            spans.push(Span::styled(format!("[{}] {}", i + 1, action.display_label()), style));
        }

        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect, rows: &[T], pagination: TablePagination) {
        let fit_ids = self.options.fit_content_ids();
        let all_selected = self.selection.all_selected(rows.len());

        let (header_cells, widths, body): (Vec<Cell>, Vec<Constraint>, Vec<Row>) = {
            let columns = self.visible_columns();

            let header_cells = columns
                .iter()
                .map(|column| {
                    let line = match column {
                        VisibleColumn::Select => Line::from(checkbox(all_selected)),
                        VisibleColumn::Number => Line::from("#"),
                        VisibleColumn::Data(def) => def.header.render(),
                    };
                    Cell::from(line).style(Styles::title())
                })
                .collect::<Vec<_>>();

            let body = if self.is_loading {
                Vec::new()
            } else {
                rows.iter()
                    .enumerate()
                    .map(|(i, row)| {
                        let cells = columns.iter().map(|column| match column {
                            VisibleColumn::Select => Cell::from(checkbox(self.selection.is_selected(i))),
                            VisibleColumn::Number => Cell::from(pagination.row_number(i).to_string()),
                            VisibleColumn::Data(def) => Cell::from(def.render_cell(row)),
                        });
                        let style = if self.selection.is_selected(i) {
                            Styles::marked()
                        } else {
                            Styles::default()
                        };
                        Row::new(cells).style(style)
                    })
                    .collect::<Vec<_>>()
            };

            let widths = columns
                .iter()
                .map(|column| {
                    if fit_ids.contains(&column.id()) {
                        Constraint::Length(content_width(column, rows, pagination) as u16)
                    } else {
                        Constraint::Fill(1)
                    }
                })
                .collect::<Vec<_>>();

            (header_cells, widths, body)
        };

        let column_count = header_cells.len();
        let block = Block::default()
            .title(self.options.title.as_str())
            .borders(Borders::ALL)
            .border_style(if self.focus == TableFocus::Rows {
                Styles::active_border()
            } else {
                Styles::inactive_border()
            });

        let is_empty = body.is_empty();
        let table = Table::new(body, widths)
            .header(Row::new(header_cells))
            .block(block)
            .column_spacing(2)
            .highlight_style(Styles::selected())
            .highlight_symbol("▶ ");

        f.render_stateful_widget(table, area, &mut self.state);

        if is_empty && column_count > 0 {
            let message = if self.is_loading { "⟳ Loading..." } else { "No Data" };
            // Body starts below the top border and header line
            let body_area = Rect {
                x: area.x + 1,
                y: area.y + 2,
                width: area.width.saturating_sub(2),
                height: area.height.saturating_sub(3).min(1),
            };
            if body_area.height > 0 {
                let placeholder = Paragraph::new(message)
                    .style(Styles::inactive())
                    .alignment(Alignment::Center);
                f.render_widget(placeholder, body_area);
            }
        }
    }

    fn render_footer(&self, f: &mut Frame, area: Rect, pagination: TablePagination) {
        let nav_style = |enabled: bool| if enabled { Styles::info() } else { Styles::inactive() };

        let left = Line::from(vec![
            Span::styled(format!("[s] {}", pagination.page_size), Styles::title()),
            Span::raw(" rows per page"),
        ]);
        let right = Line::from(vec![
            Span::raw(pagination.total_label()),
            Span::styled(" │ ", Styles::inactive()),
            Span::raw(pagination.page_label()),
            Span::raw("  "),
            Span::styled("◀ Prev", nav_style(pagination.can_previous())),
            Span::raw(" "),
            Span::styled("Next ▶", nav_style(pagination.can_next())),
        ]);

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        f.render_widget(Paragraph::new(left), chunks[0]);
        f.render_widget(Paragraph::new(right).alignment(Alignment::Right), chunks[1]);
    }

    fn render_column_menu(&mut self, f: &mut Frame, area: Rect) {
        let entries = self.column_menu_entries();
        let popup = centered_rect(40, 60, area);
        f.render_widget(Clear, popup);

        let items: Vec<ListItem> = entries
            .iter()
            .map(|entry| ListItem::new(format!("{} {}", checkbox(entry.visible), entry.label)))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Columns (Space: toggle, Esc: close)")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        f.render_stateful_widget(list, popup, &mut self.menu_state);
    }
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Widest of the header and every cell of a fit-content column
fn content_width<T>(column: &VisibleColumn<'_, T>, rows: &[T], pagination: TablePagination) -> usize {
    match column {
        VisibleColumn::Select => 3,
        VisibleColumn::Number => (0..rows.len())
            .map(|i| pagination.row_number(i).to_string().len())
            .max()
            .unwrap_or(0)
            .max(1),
        VisibleColumn::Data(def) => rows
            .iter()
            .map(|row| def.render_cell(row).width())
            .chain(std::iter::once(def.header.render().width()))
            .max()
            .unwrap_or(0),
    }
}

/// Key reference for screens that host a table
pub const TABLE_HELP: &str = "Table:\n\
    ↑/↓ - Move cursor\n\
    Space - Select row\n\
    a - Select all on page\n\
    c - Clear selection\n\
    ←/→ or PgUp/PgDn - Previous/next page\n\
    s - Change rows per page\n\
    v - Show/hide columns\n\
    / - Search\n\
    r - Clear filters\n\
    1-9 - Bulk actions on selection";

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::storage::LocalStorage;

    #[derive(Debug, Clone)]
    struct Item {
        id: String,
        name: String,
    }

    impl TableRow for Item {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item {
                id: format!("id-{}", i),
                name: format!("Item {}", i),
            })
            .collect()
    }

    fn columns() -> Vec<ColumnDef<Item>> {
        vec![
            ColumnDef::accessor("name", "Name", |item: &Item| item.name.clone()),
            ColumnDef::accessor("id", "Id", |item: &Item| item.id.clone()).hideable(false),
        ]
    }

    fn table(selection: bool) -> TableView<Item> {
        let mut options = TableOptions::new("test-table").with_search("Search...");
        if selection {
            options = options.with_row_selection();
        }
        TableView::new(columns(), options, ColumnVisibility::seeded("test-table", &[]))
            .with_bulk_actions(vec![TableBulkAction::new("Export", BulkActionKind::Positive)])
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[tokio::test]
    async fn test_bulk_action_receives_domain_ids() {
        let rows = items(5);
        let pagination = TablePagination::new(5, 0, 10);
        let mut table = table(true);

        table.handle_key(key(KeyCode::Down), &rows, pagination).await;
        table.handle_key(key(KeyCode::Char(' ')), &rows, pagination).await;
        table.handle_key(key(KeyCode::Down), &rows, pagination).await;
        table.handle_key(key(KeyCode::Down), &rows, pagination).await;
        table.handle_key(key(KeyCode::Char(' ')), &rows, pagination).await;
        assert_eq!(table.selection().count(), 2);

        let action = table.handle_key(key(KeyCode::Char('1')), &rows, pagination).await;
        assert_eq!(
            action,
            TableAction::BulkAction {
                index: 0,
                ids: vec!["id-0".to_string(), "id-2".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn test_bulk_action_needs_selection_and_idle_action() {
        let rows = items(3);
        let pagination = TablePagination::new(3, 0, 10);
        let mut table = table(true);

        assert_eq!(table.handle_key(key(KeyCode::Char('1')), &rows, pagination).await, TableAction::None);
        assert_eq!(table.handle_key(key(KeyCode::Char('2')), &rows, pagination).await, TableAction::Ignored);

        table.handle_key(key(KeyCode::Char('a')), &rows, pagination).await;
        table.set_bulk_action_loading(0, true);
        assert_eq!(table.handle_key(key(KeyCode::Char('1')), &rows, pagination).await, TableAction::None);
    }

    #[tokio::test]
    async fn test_clear_selection_hides_summary_bar() {
        let rows = items(3);
        let pagination = TablePagination::new(3, 0, 10);
        let mut table = table(true);
        table.handle_key(key(KeyCode::Char('a')), &rows, pagination).await;

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| {
                let size = f.size();
                table.render(f, size, &rows, pagination)
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("3 row(s) selected"));

        table.handle_key(key(KeyCode::Char('c')), &rows, pagination).await;
        assert!(table.selection().is_empty());
        terminal
            .draw(|f| {
                let size = f.size();
                table.render(f, size, &rows, pagination)
            })
            .unwrap();
        assert!(!buffer_text(&terminal).contains("row(s) selected"));
    }

    #[tokio::test]
    async fn test_paging_requests_and_bounds() {
        let rows = items(10);
        let mut table = table(false);

        let first = TablePagination::new(25, 0, 10);
        assert_eq!(table.handle_key(key(KeyCode::Left), &rows, first).await, TableAction::None);
        assert_eq!(table.handle_key(key(KeyCode::Right), &rows, first).await, TableAction::PageChange(1));

        let last = TablePagination::new(25, 2, 10);
        assert_eq!(table.handle_key(key(KeyCode::PageDown), &rows, last).await, TableAction::None);
        assert_eq!(table.handle_key(key(KeyCode::PageUp), &rows, last).await, TableAction::PageChange(1));

        assert_eq!(table.handle_key(key(KeyCode::Char('s')), &rows, last).await, TableAction::PageSizeChange(20));
    }

    #[tokio::test]
    async fn test_page_change_clears_selection() {
        let rows = items(10);
        let pagination = TablePagination::new(25, 0, 10);
        let mut table = table(true);
        table.handle_key(key(KeyCode::Char('a')), &rows, pagination).await;
        table.handle_key(key(KeyCode::Right), &rows, pagination).await;
        assert!(table.selection().is_empty());
    }

    #[tokio::test]
    async fn test_search_focus_and_events() {
        let rows = items(1);
        let pagination = TablePagination::new(1, 0, 10);
        let mut table = table(false);

        table.handle_key(key(KeyCode::Char('/')), &rows, pagination).await;
        assert!(table.is_search_focused());
        assert_eq!(
            table.handle_key(key(KeyCode::Char('r')), &rows, pagination).await,
            TableAction::SearchChange("r".to_string())
        );
        assert_eq!(
            table.handle_key(key(KeyCode::Enter), &rows, pagination).await,
            TableAction::Search("r".to_string())
        );
        assert!(!table.is_search_focused());
        assert_eq!(table.handle_key(key(KeyCode::Char('r')), &rows, pagination).await, TableAction::ClearFilters);
    }

    #[tokio::test]
    async fn test_column_menu_lists_hideable_text_columns_and_persists() {
        let storage = LocalStorage::in_memory().await.unwrap();
        let options = TableOptions::new("menu-table");
        let visibility = ColumnVisibility::load(storage.clone(), "menu-table", &[]).await;
        let mut table = TableView::new(columns(), options, visibility);

        let entries = table.column_menu_entries();
        let labels: Vec<_> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Name"]);

        let rows = items(2);
        let pagination = TablePagination::new(2, 0, 10);
        table.handle_key(key(KeyCode::Char('v')), &rows, pagination).await;
        assert!(table.is_column_menu_open());
        let action = table.handle_key(key(KeyCode::Char(' ')), &rows, pagination).await;

        let mut expected = VisibilityState::new();
        expected.insert("name".to_string(), false);
        assert_eq!(action, TableAction::ColumnVisibilityChange(expected));
        assert_eq!(table.visible_column_ids(), vec!["number", "id"]);
        assert_eq!(storage.get_item("menu-table").await.unwrap().unwrap(), r#"{"name":false}"#);

        table.handle_key(key(KeyCode::Esc), &rows, pagination).await;
        assert!(!table.is_column_menu_open());
    }

    #[test]
    fn test_synthesized_columns_and_fit_content() {
        let table = table(true);
        assert_eq!(table.visible_column_ids(), vec!["select", "number", "name", "id"]);
        let ids = table.options().fit_content_ids();
        assert!(ids.contains(&"actions"));
    }

    #[test]
    fn test_empty_and_loading_render() {
        let mut table = table(false);
        let pagination = TablePagination::new(0, 0, 10);
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();

        terminal
            .draw(|f| {
                let size = f.size();
                table.render(f, size, &[], pagination)
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("No Data"));
        assert!(text.contains("Total count: 0"));
        assert!(text.contains("Page 1 of 0"));

        table.is_loading = true;
        terminal
            .draw(|f| {
                let size = f.size();
                table.render(f, size, &items(3), pagination)
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Loading..."));
        assert!(!text.contains("Item 0"));
    }

    #[test]
    fn test_rows_render_with_numbers() {
        let mut table = table(false);
        let rows = items(2);
        let pagination = TablePagination::new(12, 1, 10);
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).unwrap();
        terminal
            .draw(|f| {
                let size = f.size();
                table.render(f, size, &rows, pagination)
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("11"));
        assert!(text.contains("12"));
        assert!(text.contains("Item 1"));
        assert!(text.contains("Page 2 of 2"));
    }
}
