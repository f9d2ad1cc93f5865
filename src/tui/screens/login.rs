//! Login screen: the sign-in form in front of every private route

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tracing::debug;

use crate::auth::Route;
use crate::forms::{LoginSchema, SubmitError};
use crate::models::LoginResponse;
use crate::tui::components::form_field::{submit_line, FieldKind, FieldSpec, FormKey, FormView};
use crate::tui::components::toast::Toast;
use crate::tui::traits::{Screen, ScreenAction};
use crate::tui::ui::{centered_rect, Styles};

pub struct LoginScreen {
    pub form: FormView<LoginSchema>,
    email: FieldSpec,
    password: FieldSpec,
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginScreen {
    pub fn new() -> Self {
        Self {
            form: FormView::new(),
            email: FieldSpec::new("email", "Email", FieldKind::Text).with_placeholder("name@example.com"),
            password: FieldSpec::new("password", "Password", FieldKind::Password)
                .with_placeholder("Enter your password"),
        }
    }

    /// Settle a finished login request; failures come back as a notification
    pub fn finish_login(&mut self, result: &Result<LoginResponse, String>) -> Option<Toast> {
        self.form.form.finish_submit();
        match result {
            Ok(response) if response.success => {
                self.form.reset();
                None
            }
            Ok(response) => {
                let message = if response.message.is_empty() {
                    "Login failed. Please try again.".to_string()
                } else {
                    response.message.clone()
                };
                Some(Toast::error(message))
            }
            Err(message) => Some(Toast::error(message.clone())),
        }
    }
}

impl Screen for LoginScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let card = centered_rect(50, 70, area);
        f.render_widget(Clear, card);
        let block = Block::default()
            .title(" SMS ADMIN ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let inner = block.inner(card);
        f.render_widget(block, card);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(self.email.height()),
                Constraint::Length(self.password.height()),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let heading = Paragraph::new(vec![
            Line::from(Span::styled("Admin", Styles::title())),
            Line::from(Span::styled("Sign in to your admin account", Styles::inactive())),
        ])
        .alignment(Alignment::Center);
        f.render_widget(heading, chunks[0]);

        let (email, password) = (&self.email, &self.password);
        self.form.render(f, inner, |f, _area, _form, field, is_submitting| {
            field.render(f, chunks[1], email);
            field.render(f, chunks[2], password);
            f.render_widget(
                Paragraph::new(submit_line("Sign in", "Signing in...", is_submitting)).alignment(Alignment::Center),
                chunks[3],
            );
        });
    }

    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction> {
        if self.form.handle_key(key) != FormKey::Submit {
            return Ok(ScreenAction::None);
        }

        match self.form.form.begin_submit() {
            Ok(credentials) => Ok(ScreenAction::Login(credentials)),
            Err(SubmitError::AlreadySubmitting) => Ok(ScreenAction::None),
            Err(SubmitError::Invalid(errors)) => {
                debug!("Login form invalid: {:?}", errors.keys().collect::<Vec<_>>());
                Ok(ScreenAction::None)
            }
        }
    }

    fn route(&self) -> Route {
        Route::Login
    }

    fn is_editing(&self) -> bool {
        true
    }

    fn on_enter(&mut self) {
        if !self.form.is_submitting() {
            self.form.reset();
        }
    }

    fn help(&self) -> &'static str {
        "Login:\n\
        Tab / ↑↓ - Move between fields\n\
        Enter - Sign in"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthUser;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn type_text(screen: &mut LoginScreen, text: &str) {
        for c in text.chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_invalid_form_does_not_submit() {
        let mut screen = LoginScreen::new();
        assert_eq!(screen.route(), Route::Login);
        type_text(&mut screen, "admin").await;
        let action = screen.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(action, ScreenAction::None);
        assert!(screen.form.form.state("email").unwrap().is_invalid());
        assert!(!screen.form.is_submitting());
    }

    #[tokio::test]
    async fn test_valid_form_requests_login_once() {
        let mut screen = LoginScreen::new();
        type_text(&mut screen, "admin@gmail.com").await;
        screen.handle_key_event(key(KeyCode::Tab)).await.unwrap();
        type_text(&mut screen, "12345").await;

        let action = screen.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        assert!(matches!(action, ScreenAction::Login(ref c) if c.email == "admin@gmail.com" && c.password == "12345"));
        assert_eq!(screen.handle_key_event(key(KeyCode::Enter)).await.unwrap(), ScreenAction::None);

        let reply = LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            user: Some(AuthUser {
                email: "admin@gmail.com".to_string(),
                name: "Admin User".to_string(),
            }),
        };
        assert!(screen.finish_login(&Ok(reply)).is_none());
        assert_eq!(screen.form.form.text("email"), "");
    }

    #[test]
    fn test_rejected_login_toasts_message() {
        let mut screen = LoginScreen::new();
        let toast = screen
            .finish_login(&Err("Invalid email or password".to_string()))
            .unwrap();
        assert_eq!(toast.message, "Invalid email or password");

        let toast = screen
            .finish_login(&Ok(LoginResponse {
                success: false,
                message: String::new(),
                user: None,
            }))
            .unwrap();
        assert_eq!(toast.message, "Login failed. Please try again.");
    }
}
