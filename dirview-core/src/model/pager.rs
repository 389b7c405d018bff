//! 1-based pagination cursor shared by the category and search views.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    #[inline]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[inline]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages for `len` items; never less than one.
    #[inline]
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    /// Index range of the visible slice.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(len);
        let end = (self.page * self.page_size).min(len);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self, len: usize) -> bool {
        self.page < self.total_pages(len)
    }

    /// Advance one page. Returns false at the last page.
    pub fn next(&mut self, len: usize) -> bool {
        if self.has_next(len) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. Returns false on the first page.
    pub fn prev(&mut self) -> bool {
        if self.has_prev() {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Pull the cursor back inside `[1, total_pages(len)]`.
    pub fn clamp(&mut self, len: usize) {
        self.page = self.page.clamp(1, self.total_pages(len));
    }
}
