//! Main console application state and logic

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use super::components::toast::ToastStack;
use super::events::AppEvent;
use super::screens::{DashboardScreen, LoginScreen, LogsScreen, SmsSenderScreen};
use super::traits::{Screen, ScreenAction};
use super::ui::{centered_rect, Styles};
use crate::auth::{authorize, post_login_destination, AuthBackend, AuthService, Route, RouteDecision};
use crate::config::Config;
use crate::export::export_logs;
use crate::models::{AuthUser, LoginCredentials, SendSmsPayload};
use crate::sms::SmsClient;
use crate::storage::LocalStorage;

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Sidebar entries and the function key that opens each
const NAV_ITEMS: [(Route, &str); 3] = [
    (Route::Dashboard, "F2"),
    (Route::SmsSender, "F3"),
    (Route::Logs, "F4"),
];

/// Main console application state
pub struct App {
    /// Application configuration
    pub config: Config,
    auth: AuthService,
    backend: Arc<dyn AuthBackend>,
    sms: SmsClient,

    /// Route currently on screen
    pub current_route: Route,
    /// Path the user asked for before being sent to login
    pub pending_redirect: Option<String>,
    /// Signed-in user, if any
    pub user: Option<AuthUser>,

    // Screen states
    pub login: LoginScreen,
    pub dashboard: DashboardScreen,
    pub sms_sender: SmsSenderScreen,
    pub logs: LogsScreen,

    // Global application state
    pub toasts: ToastStack,
    pub should_quit: bool,
    pub show_help_popup: bool,

    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    /// Create the application and open the dashboard, or login when signed out
    pub async fn new(
        config: Config,
        storage: LocalStorage,
        backend: Arc<dyn AuthBackend>,
        sms: SmsClient,
    ) -> Result<Self> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let auth = AuthService::new(storage.clone());
        let user = auth.get_user().await?;

        let mut app = Self {
            toasts: ToastStack::new(config.toast_duration()),
            config,
            auth,
            backend,
            sms,

            current_route: Route::Login,
            pending_redirect: None,
            user,

            login: LoginScreen::new(),
            dashboard: DashboardScreen::new(Some(storage.clone())).await,
            sms_sender: SmsSenderScreen::new(),
            logs: LogsScreen::new(Some(storage)).await,

            should_quit: false,
            show_help_popup: false,

            events_tx,
            events_rx,
        };

        app.navigate_to(Route::Dashboard).await?;
        Ok(app)
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Console started on {}", self.current_route.path());

        loop {
            terminal.draw(|f| self.draw(f))?;

            while let Ok(app_event) = self.events_rx.try_recv() {
                self.handle_app_event(app_event).await?;
            }
            self.toasts.expire(Local::now());

            if event::poll(EVENT_POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key).await?;
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!("Console closed");
        Ok(())
    }

    /// Wait for the next background result and apply it
    pub async fn process_next_event(&mut self) -> Result<()> {
        if let Some(app_event) = self.events_rx.recv().await {
            self.handle_app_event(app_event).await?;
        }
        Ok(())
    }

    fn is_editing(&self) -> bool {
        match self.current_route {
            Route::Login => self.login.is_editing(),
            Route::Dashboard => self.dashboard.is_editing(),
            Route::SmsSender => self.sms_sender.is_editing(),
            Route::Logs => self.logs.is_editing(),
        }
    }

    /// Handle keyboard input events
    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Global shortcuts
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::F(10) => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::F(1) => {
                self.show_help_popup = !self.show_help_popup;
                return Ok(());
            }
            KeyCode::Char('?') if !self.is_editing() => {
                self.show_help_popup = !self.show_help_popup;
                return Ok(());
            }
            KeyCode::Esc if self.show_help_popup => {
                self.show_help_popup = false;
                return Ok(());
            }
            KeyCode::Esc if !self.is_editing() && !self.toasts.is_empty() => {
                self.toasts.dismiss_latest();
                return Ok(());
            }
            KeyCode::Char('q') if !self.is_editing() => {
                self.should_quit = true;
                return Ok(());
            }
            _ => {}
        }

        if self.show_help_popup {
            return Ok(());
        }

        let target = match key.code {
            KeyCode::F(2) => Some(Route::Dashboard),
            KeyCode::F(3) => Some(Route::SmsSender),
            KeyCode::F(4) => Some(Route::Logs),
            _ => None,
        };
        if let Some(route) = target {
            return self.navigate_to(route).await;
        }
        if key.code == KeyCode::F(9) && self.current_route != Route::Login {
            return self.logout().await;
        }

        // Screen-specific event handling
        let action = match self.current_route {
            Route::Login => self.login.handle_key_event(key).await?,
            Route::Dashboard => self.dashboard.handle_key_event(key).await?,
            Route::SmsSender => self.sms_sender.handle_key_event(key).await?,
            Route::Logs => self.logs.handle_key_event(key).await?,
        };
        self.apply_action(action).await
    }

    /// Carry out what a screen asked for
    pub async fn apply_action(&mut self, action: ScreenAction) -> Result<()> {
        match action {
            ScreenAction::None => {}
            ScreenAction::NavigateTo(route) => self.navigate_to(route).await?,
            ScreenAction::Logout => self.logout().await?,
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::Notify(toast) => self.toasts.push(toast),
            ScreenAction::Login(credentials) => self.spawn_login(credentials),
            ScreenAction::SendSms(payload) => self.spawn_send(payload),
            ScreenAction::SendSmsBatch(path) => self.spawn_batch(path),
            ScreenAction::ExportLogs(ids) => self.spawn_export(ids),
        }
        Ok(())
    }

    fn spawn_login(&self, credentials: LoginCredentials) {
        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.login(&credentials).await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::LoginFinished(result));
        });
    }

    fn spawn_send(&self, payload: SendSmsPayload) {
        let sms = self.sms.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = sms.send_sms(&payload).await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::SmsSent {
                to: payload.to,
                result,
            });
        });
    }

    fn spawn_batch(&self, path: PathBuf) {
        let sms = self.sms.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = sms.send_sms_batch(&path).await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::BatchSent(result));
        });
    }

    fn spawn_export(&self, ids: Vec<String>) {
        let entries = self.logs.entries_by_ids(&ids);
        let dir = self.config.export_dir.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let count = entries.len();
            let result = match tokio::task::spawn_blocking(move || export_logs(&entries, &dir)).await {
                Ok(Ok(path)) => Ok((path, count)),
                Ok(Err(e)) => Err(e.to_string()),
                Err(e) => Err(format!("Export task failed: {}", e)),
            };
            let _ = tx.send(AppEvent::ExportFinished(result));
        });
    }

    /// Apply the result of a background task
    pub async fn handle_app_event(&mut self, app_event: AppEvent) -> Result<()> {
        match app_event {
            AppEvent::LoginFinished(result) => {
                if let Some(toast) = self.login.finish_login(&result) {
                    self.toasts.push(toast);
                }
                if let Ok(response) = result.as_ref() {
                    if !response.success {
                        return Ok(());
                    }
                    match self.auth.store_login(response).await? {
                        Some(session) => {
                            self.user = session.user;
                            let destination = post_login_destination(self.pending_redirect.take().as_deref());
                            self.navigate_to(destination).await?;
                        }
                        None => {
                            warn!("Login reply carried no user");
                            self.toasts.error("Login failed. Please try again.");
                        }
                    }
                }
            }
            AppEvent::SmsSent { to, result } => {
                let toast = self.sms_sender.finish_single(&to, &result);
                self.toasts.push(toast);
            }
            AppEvent::BatchSent(result) => {
                let toast = self.sms_sender.finish_batch(&result);
                self.toasts.push(toast);
            }
            AppEvent::ExportFinished(result) => {
                if let Err(e) = &result {
                    error!("Log export failed: {}", e);
                }
                let toast = self.logs.finish_export(&result);
                self.toasts.push(toast);
            }
        }
        Ok(())
    }

    /// Navigate through the auth guard
    pub async fn navigate_to(&mut self, target: Route) -> Result<()> {
        let is_authenticated = self.auth.is_authenticated().await?;
        match authorize(target, is_authenticated) {
            RouteDecision::Allow(route) => self.show(route),
            RouteDecision::Redirect { to, redirect } => {
                debug!("Redirecting {} to {}", target.path(), to.path());
                if redirect.is_some() {
                    self.pending_redirect = redirect;
                }
                self.show(to);
            }
        }
        Ok(())
    }

    fn show(&mut self, route: Route) {
        if self.current_route == route {
            return;
        }
        debug!("Showing {}", route.path());
        self.current_route = route;
        match route {
            Route::Login => self.login.on_enter(),
            Route::Dashboard => self.dashboard.on_enter(),
            Route::SmsSender => self.sms_sender.on_enter(),
            Route::Logs => self.logs.on_enter(),
        }
    }

    /// End the session and return to the login page
    pub async fn logout(&mut self) -> Result<()> {
        self.auth.clear_auth().await?;
        info!("Signed out");
        self.user = None;
        self.pending_redirect = None;
        self.show(Route::Login);
        self.toasts.info("Signed out");
        Ok(())
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        // Main layout: status bar at bottom, content area above
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let content = if self.current_route == Route::Login {
            chunks[0]
        } else {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(22), Constraint::Min(0)])
                .split(chunks[0]);
            self.draw_sidebar(f, columns[0]);
            columns[1]
        };

        match self.current_route {
            Route::Login => self.login.draw(f, content),
            Route::Dashboard => self.dashboard.draw(f, content),
            Route::SmsSender => self.sms_sender.draw(f, content),
            Route::Logs => self.logs.draw(f, content),
        }

        self.draw_status_bar(f, chunks[1]);
        self.toasts.render(f, size);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_sidebar(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" SMS ADMIN ")
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(inner);

        let items: Vec<ListItem> = NAV_ITEMS
            .iter()
            .map(|(route, key)| {
                let style = if *route == self.current_route {
                    Styles::selected()
                } else {
                    Styles::default()
                };
                ListItem::new(Line::from(Span::styled(format!("{} {}", key, route.title()), style)))
            })
            .collect();
        f.render_widget(List::new(items), chunks[0]);

        let name = self
            .user
            .as_ref()
            .map(|u| if u.name.is_empty() { u.email.clone() } else { u.name.clone() })
            .unwrap_or_default();
        let footer = Paragraph::new(vec![
            Line::from(Span::styled(name, Styles::info())),
            Line::from(Span::styled("F9 Logout", Styles::error())),
        ]);
        f.render_widget(footer, chunks[1]);
    }

    /// Draw status bar with current route and shortcuts
    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = format!(
            "SMS Admin - {} | F1: Help | F10: Quit",
            self.current_route.title()
        );
        f.render_widget(Paragraph::new(text).style(Style::default().fg(Color::Gray)), area);
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 70, area);

        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(self.get_context_help())
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(help_popup, popup_area);
    }

    /// Get context-sensitive help content
    fn get_context_help(&self) -> String {
        let global_help = "Global Shortcuts:\n\
            F1 / ? - Toggle this help\n\
            F2 / F3 / F4 - Dashboard / SMS Sender / Logs\n\
            F9 - Logout\n\
            Esc - Dismiss notification\n\
            F10 / q - Quit\n\n";

        let screen_help = match self.current_route {
            Route::Login => self.login.help(),
            Route::Dashboard => self.dashboard.help(),
            Route::SmsSender => self.sms_sender.help(),
            Route::Logs => self.logs.help(),
        };

        format!("{}{}", global_help, screen_help)
    }
}
