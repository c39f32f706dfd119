// In crates/table/src/view.rs

use core_types::{TradeRecord, TradeTable};
use serde::Serialize;

use crate::filter::{TradeFilter, filter};
use crate::pager::{PAGE_SIZE, page_label, paginate, total_pages};

/// The page and filter currently applied to the trade table.
///
/// Holds no rows. Every call to [`PageView::current`] re-filters and
/// re-paginates the source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageView {
    page: usize,
    page_size: usize,
    filter: TradeFilter,
}

impl Default for PageView {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: PAGE_SIZE,
            filter: TradeFilter::default(),
        }
    }
}

/// The visible rows of the table after filtering and pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a TradeRecord>,
    pub page: usize,
    pub total_pages: usize,
    /// Rows matching the filter across all pages.
    pub matched: usize,
}

impl TablePage<'_> {
    pub fn label(&self) -> String {
        page_label(self.page, self.total_pages)
    }
}

impl PageView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn filter(&self) -> TradeFilter {
        self.filter
    }

    /// Replaces the filter and goes back to the first page.
    pub fn set_filter(&mut self, filter: TradeFilter) {
        self.filter = filter;
        self.page = 1;
    }

    /// Advances one page, stopping at the last page of the filtered table.
    pub fn next(&mut self, table: &TradeTable) {
        let last = self.last_page(table);
        self.page = (self.page + 1).min(last);
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn go_to(&mut self, page: usize, table: &TradeTable) {
        self.page = page.clamp(1, self.last_page(table));
    }

    /// Filters and paginates `table` with the current settings.
    pub fn current<'a>(&self, table: &'a TradeTable) -> TablePage<'a> {
        let matched = filter(table.records(), self.filter);
        let page = paginate(&matched, self.page, self.page_size);

        TablePage {
            rows: page.rows.to_vec(),
            page: page.page,
            total_pages: page.total_pages,
            matched: matched.len(),
        }
    }

    fn last_page(&self, table: &TradeTable) -> usize {
        let matched = table
            .records()
            .iter()
            .filter(|t| self.filter.matches(t))
            .count();
        total_pages(matched, self.page_size)
    }
}
