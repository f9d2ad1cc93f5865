//! Field values, error maps, and the `Schema` trait forms validate against

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// Value held by a single form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(Option<PathBuf>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(value) => value,
            FieldValue::File(_) => "",
        }
    }

    pub fn as_file(&self) -> Option<&Path> {
        match self {
            FieldValue::File(path) => path.as_deref(),
            FieldValue::Text(_) => None,
        }
    }

    /// String form used for input props; files show their name
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(value) => value.clone(),
            FieldValue::File(Some(path)) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            FieldValue::File(None) => String::new(),
        }
    }
}

pub type FormValues = BTreeMap<String, FieldValue>;

/// Validation messages keyed by field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Validation rules and defaults for one kind of form
pub trait Schema {
    /// Typed result of a successful validation
    type Output;

    /// Field names with their initial values, in display order
    fn default_values() -> Vec<(&'static str, FieldValue)>;

    fn validate(values: &FormValues) -> Result<Self::Output, FieldErrors>;
}

/// Collects failed checks field by field
#[derive(Debug, Default)]
pub struct Validation {
    errors: FieldErrors,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field` unless `ok`
    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.errors
                .entry(field.to_string())
                .or_default()
                .push(message.to_string());
        }
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish<T>(self, output: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.errors.is_empty() {
            Ok(output())
        } else {
            Err(self.errors)
        }
    }
}

/// Text of `field`, or empty when missing
pub fn text_of<'a>(values: &'a FormValues, field: &str) -> &'a str {
    values.get(field).map(FieldValue::as_text).unwrap_or("")
}

/// Dot-separated local part without leading, trailing or doubled dots,
/// hyphenated domain labels and an alphabetic top-level domain
const EMAIL_PATTERN: &str =
    r"^(?:[A-Za-z0-9_'+-]+\.)*[A-Za-z0-9_'+-]*[A-Za-z0-9_+-]@(?:[A-Za-z0-9][A-Za-z0-9-]*\.)+[A-Za-z]{2,}$";

static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX
        .get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
        .as_ref()
        .map_or(false, |re| re.is_match(value))
}

pub fn is_csv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"))
}
