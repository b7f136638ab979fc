//! Pagination math shared by the notification controller and the project
//! listing. Pages are 1-based; slicing is pure index arithmetic.

/// Selectable page sizes.
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [5, 10, 20, 50];

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Whether `size` is one of the selectable page sizes.
pub fn is_valid_page_size(size: u32) -> bool {
    PAGE_SIZE_OPTIONS.contains(&size)
}

/// Number of pages needed for `len` items. Always at least 1, so an empty
/// list still has a valid page 1.
pub fn total_pages(len: usize, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    let pages = (len as u64).div_ceil(size);
    pages.max(1) as u32
}

/// Clamp a 1-based page number into the valid range for `len` items.
pub fn clamp_page(page: u32, len: usize, page_size: u32) -> u32 {
    page.clamp(1, total_pages(len, page_size))
}

/// Half-open index bounds of `page` within `len` items. The page number is
/// clamped first, so out-of-range requests resolve to the last page.
pub fn page_bounds(page: u32, len: usize, page_size: u32) -> (usize, usize) {
    let page = clamp_page(page, len, page_size) as usize;
    let size = page_size.max(1) as usize;
    let start = ((page - 1) * size).min(len);
    let end = (start + size).min(len);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_one_page() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(page_bounds(1, 0, 10), (0, 0));
    }

    #[test]
    fn twenty_three_items_at_ten_per_page() {
        assert_eq!(total_pages(23, 10), 3);
        assert_eq!(page_bounds(1, 23, 10), (0, 10));
        assert_eq!(page_bounds(2, 23, 10), (10, 20));
        assert_eq!(page_bounds(3, 23, 10), (20, 23));
    }

    #[test]
    fn page_past_end_clamps_to_last() {
        assert_eq!(clamp_page(4, 23, 10), 3);
        assert_eq!(page_bounds(4, 23, 10), (20, 23));
    }

    #[test]
    fn page_zero_clamps_to_first() {
        assert_eq!(clamp_page(0, 23, 10), 1);
        assert_eq!(page_bounds(0, 23, 10), (0, 10));
    }

    #[test]
    fn exact_multiple_has_full_last_page() {
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(page_bounds(2, 20, 10), (10, 20));
    }

    #[test]
    fn single_partial_page() {
        assert_eq!(total_pages(3, 10), 1);
        assert_eq!(page_bounds(1, 3, 10), (0, 3));
    }

    #[test]
    fn page_size_options() {
        for size in PAGE_SIZE_OPTIONS {
            assert!(is_valid_page_size(size));
        }
        assert!(!is_valid_page_size(0));
        assert!(!is_valid_page_size(25));
    }
}
