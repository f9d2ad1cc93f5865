//! Client for the external SMS API (single send and CSV batch upload)

pub mod client;
pub mod errors;
pub mod preview;

pub use client::SmsClient;
pub use errors::SmsError;
pub use preview::{preview_csv, CsvPreview, CSV_TEMPLATE_HEADER, CSV_TEMPLATE_ROWS};
