//! Row selection keyed by position on the rendered page

use std::collections::BTreeSet;

use super::column::TableRow;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    selected: BTreeSet<usize>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, row_index: usize) -> bool {
        self.selected.contains(&row_index)
    }

    pub fn set(&mut self, row_index: usize, selected: bool) {
        if selected {
            self.selected.insert(row_index);
        } else {
            self.selected.remove(&row_index);
        }
    }

    pub fn toggle(&mut self, row_index: usize) {
        let selected = !self.is_selected(row_index);
        self.set(row_index, selected);
    }

    /// True when every one of `page_len` rows is selected (and there is at least one)
    pub fn all_selected(&self, page_len: usize) -> bool {
        page_len > 0 && (0..page_len).all(|i| self.selected.contains(&i))
    }

    /// Select every row on the page, or clear them if all were already selected
    pub fn toggle_all(&mut self, page_len: usize) {
        if self.all_selected(page_len) {
            self.clear();
        } else {
            self.selected.extend(0..page_len);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    /// Domain ids of the selected rows present in `rows`
    pub fn selected_ids<T: TableRow>(&self, rows: &[T]) -> Vec<String> {
        self.indices()
            .filter_map(|i| rows.get(i))
            .map(|row| row.id().to_string())
            .collect()
    }
}
