// In crates/table/src/pager.rs

/// Rows shown per table page.
pub const PAGE_SIZE: usize = 20;

/// One page of a slice, with the clamped page number it was cut at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub rows: &'a [T],
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

impl<T> Page<'_, T> {
    pub fn label(&self) -> String {
        page_label(self.page, self.total_pages)
    }
}

/// Number of pages needed for `count` rows. Never below one.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Clamps a 1-based page number into `1..=total_pages(count, page_size)`.
pub fn clamp_page(page: usize, count: usize, page_size: usize) -> usize {
    page.clamp(1, total_pages(count, page_size))
}

pub fn page_label(page: usize, total_pages: usize) -> String {
    format!("Page {} / {}", page, total_pages)
}

/// Cuts the `page`-th slice of `items`, clamping out-of-range pages.
///
/// # Arguments
/// * `items` - The full (already filtered) collection.
/// * `page` - 1-based page number. Zero and pages past the end are clamped.
/// * `page_size` - Rows per page; a size of zero is treated as one.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let size = page_size.max(1);
    let total = total_pages(items.len(), size);
    let page = page.clamp(1, total);

    let start = ((page - 1) * size).min(items.len());
    let end = (page * size).min(items.len());

    Page {
        rows: &items[start..end],
        page,
        total_pages: total,
        total_rows: items.len(),
    }
}
