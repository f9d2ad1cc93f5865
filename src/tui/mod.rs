//! SMS admin console terminal user interface
//!
//! A login gate in front of the dashboard, the SMS sender and the log viewer.

pub mod app;
pub mod components;
pub mod events;
pub mod screens;
pub mod traits;
pub mod ui;

pub use app::App;
pub use events::AppEvent;

pub use screens::{DashboardScreen, LoginScreen, LogsScreen, SmsSenderScreen};
