//! Reusable UI components for the console
//!
//! Screens compose these instead of drawing inputs, tables and
//! notifications themselves.

pub mod form_field;
pub mod search_input;
pub mod table_view;
pub mod toast;

pub use form_field::{FieldKind, FieldRenderer, FieldSpec, FormKey, FormView};
pub use search_input::{SearchEvent, SearchInput};
pub use table_view::{TableAction, TableBulkAction, TableOptions, TableView};
pub use toast::{Toast, ToastKind, ToastStack};
