//! Local inspection of a recipients CSV before it is uploaded

use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

/// Header line the batch endpoint expects
pub const CSV_TEMPLATE_HEADER: &str = "phone,name,message";

/// Example rows shown under the template header
pub const CSV_TEMPLATE_ROWS: [&str; 2] = ["+1234567890,John,Hello John!", "+1234567891,Jane,Hello Jane!"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvPreview {
    pub headers: Vec<String>,
    pub rows: usize,
}

impl CsvPreview {
    /// Whether the header row starts with the template columns
    pub fn matches_template(&self) -> bool {
        let expected: Vec<&str> = CSV_TEMPLATE_HEADER.split(',').collect();
        self.headers.len() >= expected.len()
            && self
                .headers
                .iter()
                .zip(expected)
                .all(|(actual, wanted)| actual.trim().eq_ignore_ascii_case(wanted))
    }
}

/// Read the header and count data rows
pub fn preview_csv(path: &Path) -> Result<CsvPreview, csv::Error> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = 0;
    for record in reader.records() {
        record?;
        rows += 1;
    }

    debug!("Previewed {}: {} data rows", path.display(), rows);
    Ok(CsvPreview { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_preview_counts_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("recipients.csv");
        let content = format!("{}\n{}\n{}\n", CSV_TEMPLATE_HEADER, CSV_TEMPLATE_ROWS[0], CSV_TEMPLATE_ROWS[1]);
        std::fs::write(&path, content).unwrap();

        let preview = preview_csv(&path).unwrap();
        assert_eq!(preview.rows, 2);
        assert!(preview.matches_template());
    }

    #[test]
    fn test_preview_flags_other_headers() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("other.csv");
        std::fs::write(&path, "number,text\n+1,hi\n").unwrap();

        let preview = preview_csv(&path).unwrap();
        assert_eq!(preview.rows, 1);
        assert!(!preview.matches_template());
    }

    #[test]
    fn test_preview_missing_file() {
        assert!(preview_csv(Path::new("/no/such/file.csv")).is_err());
    }
}
