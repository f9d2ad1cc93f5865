//! Schema-validated form state shared by every screen and CLI command

use std::future::Future;
use std::marker::PhantomData;

use thiserror::Error;
use tracing::debug;

use super::schema::{FieldErrors, FieldValue, FormValues, Schema};

/// Interaction and validation status of one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMeta {
    pub is_touched: bool,
    pub errors: Vec<String>,
}

impl FieldMeta {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    pub name: String,
    pub value: FieldValue,
    pub meta: FieldMeta,
}

impl FieldState {
    /// Only fields the user has touched are ever shown as invalid
    pub fn is_invalid(&self) -> bool {
        self.meta.is_touched && !self.meta.is_valid()
    }
}

/// Props a field renderer binds to its input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputProps {
    pub name: String,
    pub id: String,
    pub value: String,
    pub invalid: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error("Form validation failed")]
    Invalid(FieldErrors),
}

pub struct Form<S: Schema> {
    fields: Vec<FieldState>,
    defaults: Vec<(String, FieldValue)>,
    is_submitting: bool,
    _schema: PhantomData<S>,
}

impl<S: Schema> Default for Form<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> Form<S> {
    /// Form seeded with the schema's default values
    pub fn new() -> Self {
        Self::with_defaults(
            S::default_values()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }

    pub fn with_defaults(defaults: Vec<(String, FieldValue)>) -> Self {
        let fields = defaults
            .iter()
            .map(|(name, value)| FieldState {
                name: name.clone(),
                value: value.clone(),
                meta: FieldMeta::default(),
            })
            .collect();

        Self {
            fields,
            defaults,
            is_submitting: false,
            _schema: PhantomData,
        }
    }

    pub fn fields(&self) -> &[FieldState] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn state(&self, name: &str) -> Option<&FieldState> {
        self.fields.iter().find(|field| field.name == name)
    }

    fn state_mut(&mut self, name: &str) -> Option<&mut FieldState> {
        self.fields.iter_mut().find(|field| field.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.state(name).map(|field| &field.value)
    }

    /// Text value of a field, empty when missing or not text
    pub fn text(&self, name: &str) -> &str {
        self.value(name).map(FieldValue::as_text).unwrap_or("")
    }

    pub fn values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.value.clone()))
            .collect()
    }

    /// Handle bound to one field, if it exists
    pub fn field(&mut self, name: &str) -> Option<FieldApi<'_>> {
        self.state_mut(name).map(|state| FieldApi { state })
    }

    pub fn handle_change(&mut self, name: &str, value: FieldValue) {
        if let Some(mut field) = self.field(name) {
            field.handle_change(value);
        }
    }

    pub fn handle_blur(&mut self, name: &str) {
        if let Some(mut field) = self.field(name) {
            field.handle_blur();
        }
    }

    /// Replace a value programmatically (file pickers and the like)
    pub fn set_field_value(&mut self, name: &str, value: FieldValue) {
        self.handle_change(name, value);
    }

    pub fn input_props(&self, name: &str) -> Option<InputProps> {
        self.state(name).map(input_props_for)
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Validate without touching any field state
    pub fn validate(&self) -> Result<S::Output, FieldErrors> {
        S::validate(&self.values())
    }

    /// First half of a submission: validate and, on success, enter the submitting state
    pub fn begin_submit(&mut self) -> Result<S::Output, SubmitError> {
        if self.is_submitting {
            return Err(SubmitError::AlreadySubmitting);
        }

        let result = S::validate(&self.values());
        let errors = match &result {
            Ok(_) => FieldErrors::new(),
            Err(errors) => errors.clone(),
        };

        for field in &mut self.fields {
            field.meta.is_touched = true;
            field.meta.errors = errors.get(&field.name).cloned().unwrap_or_default();
        }

        match result {
            Ok(output) => {
                self.is_submitting = true;
                Ok(output)
            }
            Err(errors) => {
                debug!("Form validation failed for {} field(s)", errors.len());
                Err(SubmitError::Invalid(errors))
            }
        }
    }

    /// Second half of a submission: leave the submitting state
    pub fn finish_submit(&mut self) {
        self.is_submitting = false;
    }

    /// Validate, then run `on_submit` with the typed values while `is_submitting` is set
    pub async fn handle_submit<F, Fut, R>(&mut self, on_submit: F) -> Result<R, SubmitError>
    where
        F: FnOnce(S::Output) -> Fut,
        Fut: Future<Output = R>,
    {
        let output = self.begin_submit()?;
        let result = on_submit(output).await;
        self.finish_submit();
        Ok(result)
    }

    /// Restore defaults and forget all interaction state
    pub fn reset(&mut self) {
        let submitting = self.is_submitting;
        *self = Self::with_defaults(std::mem::take(&mut self.defaults));
        self.is_submitting = submitting;
    }
}

fn input_props_for(state: &FieldState) -> InputProps {
    InputProps {
        name: state.name.clone(),
        id: state.name.clone(),
        value: state.value.display(),
        invalid: state.is_invalid(),
    }
}

/// Minimal per-field handle: value, change/blur handlers, and input props
pub struct FieldApi<'a> {
    state: &'a mut FieldState,
}

impl<'a> FieldApi<'a> {
    pub fn state(&self) -> &FieldState {
        self.state
    }

    pub fn value(&self) -> &FieldValue {
        &self.state.value
    }

    pub fn handle_change(&mut self, value: FieldValue) {
        self.state.value = value;
        self.state.meta.is_touched = true;
        self.state.meta.errors.clear();
    }

    pub fn handle_blur(&mut self) {
        self.state.meta.is_touched = true;
    }

    pub fn input_props(&self) -> InputProps {
        input_props_for(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::schema::{text_of, Validation};

    struct NameSchema;

    impl Schema for NameSchema {
        type Output = String;

        fn default_values() -> Vec<(&'static str, FieldValue)> {
            vec![("name", FieldValue::text("")), ("nickname", FieldValue::text("bob"))]
        }

        fn validate(values: &FormValues) -> Result<String, FieldErrors> {
            let name = text_of(values, "name");
            let mut validation = Validation::new();
            validation.check("name", !name.is_empty(), "Name is required");
            validation.finish(|| name.to_string())
        }
    }

    #[test]
    fn test_defaults_and_props() {
        let form = Form::<NameSchema>::new();
        assert_eq!(form.field_names().collect::<Vec<_>>(), vec!["name", "nickname"]);
        let props = form.input_props("nickname").unwrap();
        assert_eq!(props.value, "bob");
        assert_eq!(props.id, "nickname");
        assert!(!props.invalid);
    }

    #[test]
    fn test_errors_only_show_after_submit_and_clear_on_change() {
        let mut form = Form::<NameSchema>::new();
        assert!(form.validate().is_err());
        assert!(!form.state("name").unwrap().is_invalid());

        let err = form.begin_submit().unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(ref e) if e.contains_key("name")));
        assert!(!form.is_submitting());
        let state = form.state("name").unwrap();
        assert!(state.is_invalid());
        assert_eq!(state.meta.errors, vec!["Name is required".to_string()]);
        assert!(!form.state("nickname").unwrap().is_invalid());

        form.handle_change("name", FieldValue::text("Ann"));
        assert!(!form.state("name").unwrap().is_invalid());
    }

    #[test]
    fn test_blur_marks_touched() {
        let mut form = Form::<NameSchema>::new();
        form.field("name").unwrap().handle_blur();
        assert!(form.state("name").unwrap().meta.is_touched);
        assert!(!form.state("nickname").unwrap().meta.is_touched);
    }

    #[test]
    fn test_second_submit_rejected_while_submitting() {
        let mut form = Form::<NameSchema>::new();
        form.handle_change("name", FieldValue::text("Ann"));
        assert_eq!(form.begin_submit().unwrap(), "Ann");
        assert!(form.is_submitting());
        assert_eq!(form.begin_submit().unwrap_err(), SubmitError::AlreadySubmitting);
        form.finish_submit();
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_handle_submit_runs_handler_only_when_valid() {
        let mut form = Form::<NameSchema>::new();
        let mut calls = 0;
        let result = form.handle_submit(|_| async { calls += 1 }).await;
        assert!(result.is_err());
        assert_eq!(calls, 0);

        form.handle_change("name", FieldValue::text("Ann"));
        let greeting = form
            .handle_submit(|name| async move { format!("hello {}", name) })
            .await
            .unwrap();
        assert_eq!(greeting, "hello Ann");
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut form = Form::<NameSchema>::new();
        form.handle_change("nickname", FieldValue::text("robert"));
        let _ = form.begin_submit();
        form.reset();
        assert_eq!(form.text("nickname"), "bob");
        assert!(form.fields().iter().all(|f| f.meta == FieldMeta::default()));
    }
}
