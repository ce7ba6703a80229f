//! Page arithmetic shared by the controller and the front end.

use std::ops::RangeInclusive;

/// Number of pages needed to show `total_count` items, `page_size` at a time.
pub fn total_pages(total_count: i64, page_size: u32) -> u32 {
    if total_count <= 0 || page_size == 0 {
        return 0;
    }
    let pages = (total_count as u64).div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Whether `page` addresses an existing page.
pub fn is_valid_page(page: u32, total_pages: u32) -> bool {
    page >= 1 && page <= total_pages
}

/// A run of at most `width` page numbers centred on `current`, clamped to
/// `1..=total`. Empty when there are no pages.
pub fn page_window(current: u32, total: u32, width: u32) -> RangeInclusive<u32> {
    if total == 0 || width == 0 {
        return RangeInclusive::new(1, 0);
    }
    let width = width.min(total);
    let current = current.clamp(1, total);
    let start = current.saturating_sub(width / 2).max(1);
    let start = start.min(total - width + 1);
    start..=start + width - 1
}
