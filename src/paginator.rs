//! Pull-based paging over the raw records of a view.

use crate::table::{Record, TableView};

/// Number of records shown per page.
pub const PAGE_SIZE: usize = 5;

/// One batch of consecutive records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'v, 'a> {
    /// Zero-based position of the first record within the view.
    pub offset: usize,
    pub records: &'v [&'a Record],
}

impl Page<'_, '_> {
    /// 1-based positions paired with their records.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &Record)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (self.offset + i + 1, *r))
    }
}

/// Walks a view front to back, one page per request.
///
/// The only state is the cursor, so a paginator can be dropped at any time
/// and [`rewind`](Paginator::rewind) starts the sequence again. There is no
/// wraparound once the end is reached.
#[derive(Debug, Clone)]
pub struct Paginator<'v, 'a> {
    view: &'v TableView<'a>,
    cursor: usize,
    page_size: usize,
}

impl<'v, 'a> Paginator<'v, 'a> {
    pub fn new(view: &'v TableView<'a>) -> Self {
        Self::with_page_size(view, PAGE_SIZE)
    }

    /// # Panics
    ///
    /// Panics if `page_size` is zero.
    pub fn with_page_size(view: &'v TableView<'a>, page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        Self {
            view,
            cursor: 0,
            page_size,
        }
    }

    /// Returns the next page, or `None` once every record has been handed out.
    pub fn next_page(&mut self) -> Option<Page<'v, 'a>> {
        let rows: &'v [&'a Record] = self.view.rows();
        if self.cursor >= rows.len() {
            return None;
        }

        let end = (self.cursor + self.page_size).min(rows.len());
        let page = Page {
            offset: self.cursor,
            records: &rows[self.cursor..end],
        };
        self.cursor = end;
        Some(page)
    }

    pub fn has_more(&self) -> bool {
        self.cursor < self.view.len()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl<'v, 'a> Iterator for Paginator<'v, 'a> {
    type Item = Page<'v, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_page()
    }
}
