//! Schema-validated forms: field state, submission, and the concrete schemas

pub mod form;
pub mod schema;
pub mod schemas;

pub use form::{FieldApi, FieldMeta, FieldState, Form, InputProps, SubmitError};
pub use schema::{FieldErrors, FieldValue, FormValues, Schema, Validation};
pub use schemas::{LoginSchema, SendToManySchema, SendToOneSchema, MAX_MESSAGE_CHARS};
