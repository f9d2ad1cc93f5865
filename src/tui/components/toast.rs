//! Transient notifications stacked over the active screen

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::ui::Styles;

/// Types of notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// Notification with kind, content and creation time
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: DateTime<Local>,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at: Local::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Error)
    }

    fn prefix(&self) -> &'static str {
        match self.kind {
            ToastKind::Info => "ℹ",
            ToastKind::Success => "✓",
            ToastKind::Error => "✗",
        }
    }
}

/// Stack of live notifications, newest last
pub struct ToastStack {
    toasts: VecDeque<Toast>,
    pub max_visible: usize,
    pub auto_clear_timeout: Duration,
}

impl Default for ToastStack {
    fn default() -> Self {
        Self::new(Duration::from_millis(4000))
    }
}

impl ToastStack {
    pub fn new(auto_clear_timeout: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            max_visible: 3,
            auto_clear_timeout,
        }
    }

    pub fn push(&mut self, toast: Toast) {
        self.toasts.push_back(toast);
        while self.toasts.len() > self.max_visible {
            self.toasts.pop_front();
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Toast::error(message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Toast::info(message));
    }

    /// Drop notifications older than the timeout
    pub fn expire(&mut self, now: DateTime<Local>) {
        let timeout = self.auto_clear_timeout;
        self.toasts.retain(|toast| {
            now.signed_duration_since(toast.created_at)
                .to_std()
                .map_or(true, |elapsed| elapsed <= timeout)
        });
    }

    /// Dismiss the newest notification
    pub fn dismiss_latest(&mut self) -> Option<Toast> {
        self.toasts.pop_back()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Render the stack in the top-right corner of `area`
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let width = area.width.min(48);
        let mut y = area.y;

        for toast in self.toasts.iter().rev() {
            if y + 3 > area.y + area.height {
                break;
            }
            let rect = Rect {
                x: area.x + area.width - width,
                y,
                width,
                height: 3,
            };
            let style = match toast.kind {
                ToastKind::Info => Styles::info(),
                ToastKind::Success => Styles::success(),
                ToastKind::Error => Styles::error(),
            };

            f.render_widget(Clear, rect);
            let paragraph = Paragraph::new(format!("{} {}", toast.prefix(), toast.message))
                .style(style)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).border_style(style));
            f.render_widget(paragraph, rect);
            y += 3;
        }
    }
}
