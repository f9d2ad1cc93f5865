//! Validation schemas for the login and SMS sender forms

use std::path::PathBuf;

use super::schema::{is_csv_file, is_valid_email, text_of, FieldErrors, FieldValue, FormValues, Schema, Validation};
use crate::models::{LoginCredentials, SendSmsPayload};

/// Longest single SMS body accepted by the sender form
pub const MAX_MESSAGE_CHARS: usize = 160;

pub struct LoginSchema;

impl Schema for LoginSchema {
    type Output = LoginCredentials;

    fn default_values() -> Vec<(&'static str, FieldValue)> {
        vec![("email", FieldValue::text("")), ("password", FieldValue::text(""))]
    }

    fn validate(values: &FormValues) -> Result<LoginCredentials, FieldErrors> {
        let email = text_of(values, "email");
        let password = text_of(values, "password");

        let mut validation = Validation::new();
        validation
            .check("email", is_valid_email(email), "Please enter a valid email address")
            .check("password", !password.is_empty(), "Password is required");

        validation.finish(|| LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

pub struct SendToOneSchema;

impl Schema for SendToOneSchema {
    type Output = SendSmsPayload;

    fn default_values() -> Vec<(&'static str, FieldValue)> {
        vec![
            ("from", FieldValue::text("")),
            ("to", FieldValue::text("")),
            ("text", FieldValue::text("")),
        ]
    }

    fn validate(values: &FormValues) -> Result<SendSmsPayload, FieldErrors> {
        let from = text_of(values, "from");
        let to = text_of(values, "to");
        let text = text_of(values, "text");

        let mut validation = Validation::new();
        validation
            .check("from", !from.is_empty(), "Sender ID is required")
            .check("to", !to.is_empty(), "Recipient number is required")
            .check("text", !text.is_empty(), "Message is required")
            .check(
                "text",
                text.chars().count() <= MAX_MESSAGE_CHARS,
                "Message must be 160 characters or less",
            );

        validation.finish(|| SendSmsPayload {
            to: to.to_string(),
            from: from.to_string(),
            message: text.to_string(),
        })
    }
}

pub struct SendToManySchema;

impl Schema for SendToManySchema {
    type Output = PathBuf;

    fn default_values() -> Vec<(&'static str, FieldValue)> {
        vec![("file", FieldValue::File(None))]
    }

    fn validate(values: &FormValues) -> Result<PathBuf, FieldErrors> {
        let file = values.get("file").and_then(FieldValue::as_file);

        let mut validation = Validation::new();
        match file {
            None => {
                validation.check("file", false, "CSV file is required");
            }
            Some(path) => {
                validation.check("file", is_csv_file(path), "File must be a CSV file");
            }
        }

        validation.finish(|| file.map(|path| path.to_path_buf()).unwrap_or_default())
    }
}
