//! SMS admin console: login gate, dashboard, single and bulk SMS sending, and delivery logs

pub mod auth;
pub mod cli;
pub mod config;
pub mod export;
pub mod forms;
pub mod models;
pub mod sample_data;
pub mod sms;
pub mod storage;
pub mod tui;
