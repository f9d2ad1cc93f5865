//! Dashboard: headline metrics and the accounts table

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::debug;

use crate::auth::Route;
use crate::models::{ChangeType, MetricCard, PlatformUser, UserStatus};
use crate::sample_data;
use crate::storage::LocalStorage;
use crate::tui::components::table_view::{
    ColumnDef, ColumnVisibility, Pager, TableAction, TableOptions, TableRow, TableView, TABLE_HELP,
};
use crate::tui::traits::{Paginated, Screen, ScreenAction};
use crate::tui::ui::{render_page_header, Styles};

pub const DASHBOARD_TABLE_KEY: &str = "dashboard-table";

impl TableRow for PlatformUser {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct DashboardScreen {
    metrics: Vec<MetricCard>,
    users: Vec<PlatformUser>,
    pager: Pager,
    pub table: TableView<PlatformUser>,
}

impl DashboardScreen {
    pub async fn new(storage: Option<LocalStorage>) -> Self {
        let options = TableOptions::new(DASHBOARD_TABLE_KEY).with_title("Accounts");
        let default_hidden = TableView::<PlatformUser>::default_hidden(&options);
        let visibility = match storage {
            Some(storage) => ColumnVisibility::load(storage, DASHBOARD_TABLE_KEY, &default_hidden).await,
            None => ColumnVisibility::seeded(DASHBOARD_TABLE_KEY, &default_hidden),
        };

        let users = sample_data::users();
        let mut pager = Pager::default();
        pager.set_total_count(users.len());

        Self {
            metrics: sample_data::metrics(),
            users,
            pager,
            table: TableView::new(user_columns(), options, visibility),
        }
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn apply_table_action(&mut self, action: TableAction) {
        match action {
            TableAction::PageChange(page) => {
                self.pager.set_current_page(page);
                self.table.reset_page_state();
            }
            TableAction::PageSizeChange(size) => {
                self.pager.set_page_size(size);
                self.table.reset_page_state();
            }
            TableAction::ColumnVisibilityChange(state) => {
                debug!("Dashboard columns now {:?}", state);
            }
            _ => {}
        }
    }

    fn draw_metrics(&self, f: &mut Frame, area: Rect) {
        let count = self.metrics.len().max(1) as u32;
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..count).map(|_| Constraint::Ratio(1, count)).collect::<Vec<_>>())
            .split(area);

        for (metric, card) in self.metrics.iter().zip(cards.iter()) {
            let mut lines = vec![
                Line::from(Span::styled(metric.label.clone(), Styles::inactive())),
                Line::from(Span::styled(
                    metric.value.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
            ];
            if let Some(change) = &metric.change {
                let color = match change.change_type {
                    ChangeType::Increase => Color::Green,
                    ChangeType::Decrease => Color::Red,
                    ChangeType::Neutral => Color::Gray,
                };
                lines.push(Line::from(Span::styled(change.display(), Style::default().fg(color))));
            }
            let block = Block::default().borders(Borders::ALL).border_style(Styles::inactive_border());
            f.render_widget(Paragraph::new(lines).block(block), *card);
        }
    }
}

fn user_columns() -> Vec<ColumnDef<PlatformUser>> {
    vec![
        ColumnDef::accessor("name", "Name", |u: &PlatformUser| u.name.clone()),
        ColumnDef::accessor("email", "Email", |u: &PlatformUser| u.email.clone()),
        ColumnDef::accessor("role", "Role", |u: &PlatformUser| u.role.clone()),
        ColumnDef::new("status", "Status", |u: &PlatformUser| {
            let style = match u.status {
                UserStatus::Active => Style::default().fg(Color::Green),
                UserStatus::Inactive => Style::default().fg(Color::Gray),
            };
            Span::styled(format!(" {} ", u.status.as_str()), style.add_modifier(Modifier::REVERSED))
        }),
        ColumnDef::accessor("created_at", "Created At", |u: &PlatformUser| u.created_at.clone()),
    ]
}

impl Screen for DashboardScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(5), Constraint::Min(8)])
            .split(area);

        render_page_header(f, chunks[0], "Dashboard", "SMS Insights");
        self.draw_metrics(f, chunks[1]);

        let rows = self.pager.slice(&self.users);
        self.table.render(f, chunks[2], rows, self.pager.descriptor());
    }

    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction> {
        let rows = self.pager.slice(&self.users);
        let action = self.table.handle_key(key, rows, self.pager.descriptor()).await;
        self.apply_table_action(action);
        Ok(ScreenAction::None)
    }

    fn route(&self) -> Route {
        Route::Dashboard
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
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_single_page_of_users_cannot_advance() {
        let mut screen = DashboardScreen::new(None).await;
        assert_eq!(screen.pager().descriptor().total_count, sample_data::users().len());
        assert_eq!(screen.pager().descriptor().page_count, 1);

        screen.handle_key_event(key(KeyCode::Right)).await.unwrap();
        assert_eq!(screen.pager().get_current_page(), 0);
    }

    #[tokio::test]
    async fn test_page_size_change_returns_to_first_page() {
        let mut screen = DashboardScreen::new(None).await;
        screen.apply_table_action(TableAction::PageChange(1));
        screen.apply_table_action(TableAction::PageSizeChange(20));
        assert_eq!(screen.pager().get_current_page(), 0);
        assert_eq!(screen.pager().descriptor().page_size, 20);
    }

    #[tokio::test]
    async fn test_renders_header_and_metrics() {
        let mut screen = DashboardScreen::new(None).await;
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal
            .draw(|f| {
                let size = f.size();
                screen.draw(f, size);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = (0..buffer.area.height)
            .map(|y| (0..buffer.area.width).map(|x| buffer.get(x, y).symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("Dashboard"));
        assert!(text.contains("SMS Insights"));
        assert!(text.contains("Accounts"));
        assert!(text.contains("Created At"));
        for metric in sample_data::metrics() {
            assert!(text.contains(&metric.label), "{}", metric.label);
        }
    }
}
