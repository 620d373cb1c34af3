//! Client-side paging helpers for list screens.

/// Number of pages needed for `total` items at `per_page` each.
///
/// Zero items still occupy one (empty) page so screens always have a current
/// page to stand on.
#[must_use]
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 || total == 0 {
        return 1;
    }
    total.div_ceil(per_page)
}

/// The slice of `items` belonging to zero-based `page`.
///
/// Out-of-range pages yield an empty slice rather than panicking.
#[must_use]
pub fn page_slice<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    if per_page == 0 {
        return items;
    }
    let start = page.saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = (start + per_page).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_still_has_one_page() {
        assert_eq!(page_count(0, 10), 1);
    }

    #[test]
    fn partial_last_page_counts() {
        assert_eq!(page_count(21, 10), 3);
        assert_eq!(page_count(20, 10), 2);
    }

    #[test]
    fn slices_follow_page_boundaries() {
        let items: Vec<u32> = (0..5).collect();
        assert_eq!(page_slice(&items, 0, 2), &[0, 1]);
        assert_eq!(page_slice(&items, 2, 2), &[4]);
        assert_eq!(page_slice(&items, 3, 2), &[] as &[u32]);
    }
}
