//! CSV export of selected log entries

use std::path::{Path, PathBuf};

use chrono::Local;
use csv::Writer;
use thiserror::Error;
use tracing::info;

use crate::models::SmsLogEntry;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing selected to export")]
    Empty,

    #[error("Failed to create export directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write CSV: {0}")]
    Io(#[from] std::io::Error),
}

const HEADERS: [&str; 7] = [
    "id",
    "subaccount",
    "date_sent_received",
    "destination",
    "source",
    "cost",
    "status",
];

/// Entries whose ids appear in `ids`, in `entries` order
pub fn select_entries(entries: &[SmsLogEntry], ids: &[String]) -> Vec<SmsLogEntry> {
    entries
        .iter()
        .filter(|entry| ids.iter().any(|id| *id == entry.id))
        .cloned()
        .collect()
}

/// Write `entries` to a timestamped CSV in `dir` and return its path
pub fn export_logs(entries: &[SmsLogEntry], dir: &Path) -> Result<PathBuf, ExportError> {
    if entries.is_empty() {
        return Err(ExportError::Empty);
    }

    std::fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let file_name = format!("sms-logs-{}.csv", Local::now().format("%Y%m%d-%H%M%S%3f"));
    let path = dir.join(file_name);

    let mut writer = Writer::from_path(&path)?;
    writer.write_record(HEADERS)?;
    for entry in entries {
        writer.write_record([
            entry.id.as_str(),
            entry.subaccount.as_str(),
            entry.date_sent_received.as_str(),
            entry.destination.as_str(),
            entry.source.as_str(),
            entry.cost.as_str(),
            entry.status.as_str(),
        ])?;
    }
    writer.flush()?;

    info!("Exported {} log entries to {}", entries.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_data;
    use tempfile::TempDir;

    #[test]
    fn test_export_selected_entries() {
        let temp_dir = TempDir::new().unwrap();
        let export_dir = temp_dir.path().join("exports");
        let selected = select_entries(&sample_data::logs(), &["3".to_string(), "1".to_string()]);
        assert_eq!(selected.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), vec!["1", "3"]);

        let path = export_logs(&selected, &export_dir).unwrap();
        assert!(path.starts_with(&export_dir));
        assert_eq!(path.extension().unwrap(), "csv");

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().len(), 7);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][3], "+639950472420");
        assert_eq!(&rows[0][6], "Delivered");
        // Commas inside the date survive quoting
        assert_eq!(&rows[1][2], "Dec 03, 2025 10:32 AM (UTC+08:00)");
    }

    #[test]
    fn test_export_nothing_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(export_logs(&[], temp_dir.path()), Err(ExportError::Empty)));
    }
}
