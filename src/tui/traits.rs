//! Core traits shared by the console screens

use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use super::components::toast::Toast;
use crate::auth::Route;
use crate::models::{LoginCredentials, SendSmsPayload};

/// Actions that can be returned from screen event handling
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// No action taken
    None,
    /// Navigate to a route, through the auth guard
    NavigateTo(Route),
    /// End the session and return to login
    Logout,
    /// Quit the application
    Quit,
    /// Show a transient notification
    Notify(Toast),
    /// Run a login request
    Login(LoginCredentials),
    /// Send one SMS
    SendSms(SendSmsPayload),
    /// Upload a recipients CSV
    SendSmsBatch(PathBuf),
    /// Write the given log entries to a CSV file
    ExportLogs(Vec<String>),
}

/// Core trait for all console screens
pub trait Screen {
    /// Draw the screen content
    fn draw(&mut self, f: &mut Frame, area: Rect);

    /// Handle keyboard input and return an action for the app
    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<ScreenAction>;

    /// Route this screen is mounted at
    fn route(&self) -> Route;

    /// Whether plain characters are being typed into an input
    fn is_editing(&self) -> bool {
        false
    }

    /// Screen-specific shortcuts for the help popup
    fn help(&self) -> &'static str {
        ""
    }

    /// Called when screen becomes active
    fn on_enter(&mut self) {}
}

/// Trait for screens with paginated content
pub trait Paginated {
    /// Get current page number (0-based)
    fn get_current_page(&self) -> usize;

    /// Set current page, clamped to the last page
    fn set_current_page(&mut self, page: usize);

    /// Get total number of pages
    fn get_total_pages(&self) -> usize;

    /// Go to first page
    fn go_to_first_page(&mut self) {
        self.set_current_page(0);
    }
}

/// Trait for focus movement and text editing across form fields
pub trait FormHandler {
    /// Get current field index
    fn get_current_field(&self) -> usize;

    /// Set current field
    fn set_current_field(&mut self, field: usize);

    /// Get total number of fields
    fn get_field_count(&self) -> usize;

    /// Move to next field
    fn next_field(&mut self) {
        let total = self.get_field_count();
        if total == 0 {
            return;
        }
        let current = self.get_current_field();
        self.set_current_field((current + 1) % total);
    }

    /// Move to previous field
    fn previous_field(&mut self) {
        let total = self.get_field_count();
        if total == 0 {
            return;
        }
        let current = self.get_current_field();
        self.set_current_field(if current == 0 { total - 1 } else { current - 1 });
    }

    /// Handle character input for current field
    fn handle_char_input(&mut self, c: char);

    /// Handle backspace for current field
    fn handle_backspace(&mut self);

    /// Handle delete for current field
    fn handle_delete(&mut self);
}
