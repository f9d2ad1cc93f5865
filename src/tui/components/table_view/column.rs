//! Column definitions for the generic table

use ratatui::text::{Line, Span};

/// Id of the synthesized selection checkbox column
pub const SELECT_COLUMN_ID: &str = "select";
/// Id of the synthesized row-number column
pub const NUMBER_COLUMN_ID: &str = "number";
/// Id conventionally used for per-row action columns
pub const ACTIONS_COLUMN_ID: &str = "actions";

/// Records shown in a table must carry a stable domain id
pub trait TableRow {
    fn id(&self) -> &str;
}

/// Column header: a plain label or a custom renderer
pub enum ColumnHeader {
    Text(String),
    Custom(Box<dyn Fn() -> Line<'static>>),
}

impl ColumnHeader {
    /// Plain label, if this header has one
    pub fn label(&self) -> Option<&str> {
        match self {
            ColumnHeader::Text(label) => Some(label),
            ColumnHeader::Custom(_) => None,
        }
    }

    pub fn render(&self) -> Line<'static> {
        match self {
            ColumnHeader::Text(label) => Line::from(label.clone()),
            ColumnHeader::Custom(render) => render(),
        }
    }
}

type CellRenderer<T> = Box<dyn Fn(&T) -> Span<'static>>;

pub struct ColumnDef<T> {
    pub id: String,
    pub header: ColumnHeader,
    cell: CellRenderer<T>,
    pub enable_hiding: bool,
    pub enable_sorting: bool,
}

impl<T> ColumnDef<T> {
    /// Column with a text header and a styled cell renderer
    pub fn new(
        id: &str,
        header: &str,
        cell: impl Fn(&T) -> Span<'static> + 'static,
    ) -> Self {
        Self {
            id: id.to_string(),
            header: ColumnHeader::Text(header.to_string()),
            cell: Box::new(cell),
            enable_hiding: true,
            enable_sorting: false,
        }
    }

    /// Column whose cell is the plain text returned by `accessor`
    pub fn accessor(id: &str, header: &str, accessor: impl Fn(&T) -> String + 'static) -> Self {
        Self::new(id, header, move |row| Span::raw(accessor(row)))
    }

    pub fn with_custom_header(mut self, header: impl Fn() -> Line<'static> + 'static) -> Self {
        self.header = ColumnHeader::Custom(Box::new(header));
        self
    }

    pub fn hideable(mut self, enable_hiding: bool) -> Self {
        self.enable_hiding = enable_hiding;
        self
    }

    pub fn sortable(mut self, enable_sorting: bool) -> Self {
        self.enable_sorting = enable_sorting;
        self
    }

    pub fn render_cell(&self, row: &T) -> Span<'static> {
        (self.cell)(row)
    }

    /// Whether the column appears in the visibility menu
    pub fn in_column_menu(&self) -> bool {
        self.enable_hiding && self.header.label().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: String,
    }

    #[test]
    fn test_accessor_and_menu_eligibility() {
        let column = ColumnDef::<Row>::accessor("name", "Name", |row| row.name.clone());
        let row = Row { name: "Ann".to_string() };
        assert_eq!(column.render_cell(&row).content, "Ann");
        assert!(column.in_column_menu());
        assert!(!column.enable_sorting);

        let fixed = ColumnDef::<Row>::accessor("name", "Name", |row| row.name.clone()).hideable(false);
        assert!(!fixed.in_column_menu());

        let custom = ColumnDef::<Row>::accessor("name", "Name", |row| row.name.clone())
            .with_custom_header(|| Line::from("★"));
        assert!(!custom.in_column_menu());
        assert_eq!(custom.header.render(), Line::from("★"));
    }
}
