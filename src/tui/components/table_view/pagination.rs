//! Pagination descriptor shown by the table and the screen-side pager that owns it

use crate::tui::traits::Paginated;

/// Page sizes offered by the footer selector
pub const PAGE_SIZES: [usize; 5] = [10, 20, 30, 40, 50];

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of pages needed for `total_count` rows
pub fn page_count(total_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    (total_count + page_size - 1) / page_size
}

/// Read-only pagination state handed to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TablePagination {
    pub total_count: usize,
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
}

impl TablePagination {
    pub fn new(total_count: usize, page_index: usize, page_size: usize) -> Self {
        Self {
            total_count,
            page_index,
            page_size,
            page_count: page_count(total_count, page_size),
        }
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    /// False on the last page and whenever there are no pages at all
    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }

    /// 1-based number of a row across all pages
    pub fn row_number(&self, row_index: usize) -> usize {
        row_index + 1 + self.page_index * self.page_size
    }

    /// Next entry of `PAGE_SIZES`, wrapping around
    pub fn next_page_size(&self) -> usize {
        let position = PAGE_SIZES.iter().position(|size| *size == self.page_size);
        match position {
            Some(i) => PAGE_SIZES[(i + 1) % PAGE_SIZES.len()],
            None => PAGE_SIZES[0],
        }
    }

    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page_index + 1, self.page_count)
    }

    pub fn total_label(&self) -> String {
        format!("Total count: {}", self.total_count)
    }
}

/// Client-side pager owned by a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    total_count: usize,
    page_index: usize,
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            total_count: 0,
            page_index: 0,
            page_size,
        }
    }

    /// Update the row total, pulling the page index back into range
    pub fn set_total_count(&mut self, total_count: usize) {
        self.total_count = total_count;
        let pages = page_count(total_count, self.page_size);
        if self.page_index >= pages {
            self.page_index = pages.saturating_sub(1);
        }
    }

    /// Changing the page size always returns to the first page
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        self.page_index = 0;
    }

    pub fn descriptor(&self) -> TablePagination {
        TablePagination::new(self.total_count, self.page_index, self.page_size)
    }

    /// Rows of the current page
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = (self.page_index * self.page_size).min(rows.len());
        let end = (start + self.page_size).min(rows.len());
        &rows[start..end]
    }
}

impl Paginated for Pager {
    fn get_current_page(&self) -> usize {
        self.page_index
    }

    fn set_current_page(&mut self, page: usize) {
        self.page_index = page.min(self.get_total_pages().saturating_sub(1));
    }

    fn get_total_pages(&self) -> usize {
        page_count(self.total_count, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(9, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn test_row_numbering_across_pages() {
        let pagination = TablePagination::new(45, 2, 20);
        assert_eq!(pagination.row_number(0), 41);
        assert_eq!(pagination.row_number(4), 45);
        assert_eq!(TablePagination::new(9, 0, 10).row_number(0), 1);
    }

    #[test]
    fn test_previous_next_bounds() {
        let first = TablePagination::new(25, 0, 10);
        assert!(!first.can_previous());
        assert!(first.can_next());

        let last = TablePagination::new(25, 2, 10);
        assert!(last.can_previous());
        assert!(!last.can_next());

        let empty = TablePagination::new(0, 0, 10);
        assert!(!empty.can_previous());
        assert!(!empty.can_next());
        assert_eq!(empty.page_label(), "Page 1 of 0");
    }

    #[test]
    fn test_page_size_cycle() {
        assert_eq!(TablePagination::new(0, 0, 10).next_page_size(), 20);
        assert_eq!(TablePagination::new(0, 0, 50).next_page_size(), 10);
        assert_eq!(TablePagination::new(0, 0, 7).next_page_size(), 10);
    }

    #[test]
    fn test_pager_size_change_resets_index() {
        let mut pager = Pager::new(10);
        pager.set_total_count(35);
        pager.set_current_page(2);
        assert_eq!(pager.get_current_page(), 2);

        pager.set_page_size(20);
        assert_eq!(pager.get_current_page(), 0);
        assert_eq!(pager.get_total_pages(), 2);
    }

    #[test]
    fn test_pager_clamps_requested_page() {
        let mut pager = Pager::new(10);
        pager.set_total_count(25);
        pager.set_current_page(999);
        assert_eq!(pager.get_current_page(), 2);
        assert_eq!(pager.descriptor().page_label(), "Page 3 of 3");

        pager.go_to_first_page();
        assert_eq!(pager.get_current_page(), 0);

        pager.set_total_count(0);
        pager.set_current_page(4);
        assert_eq!(pager.get_current_page(), 0);
    }

    #[test]
    fn test_pager_slice_and_clamp() {
        let rows: Vec<usize> = (0..9).collect();
        let mut pager = Pager::new(4);
        pager.set_total_count(rows.len());
        pager.set_current_page(2);
        assert_eq!(pager.slice(&rows), &[8]);

        pager.set_total_count(3);
        assert_eq!(pager.get_current_page(), 0);
        assert_eq!(pager.slice(&rows[..3]), &[0, 1, 2]);

        pager.set_total_count(0);
        assert_eq!(pager.get_current_page(), 0);
        assert!(pager.slice::<usize>(&[]).is_empty());
    }
}
