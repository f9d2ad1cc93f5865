//! Screen modules for the console

pub mod dashboard;
pub mod login;
pub mod logs;
pub mod sms_sender;

// Re-export all screens
pub use dashboard::DashboardScreen;
pub use login::LoginScreen;
pub use logs::LogsScreen;
pub use sms_sender::{SendMode, SmsSenderScreen};
