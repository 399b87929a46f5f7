//! Page counting and the numbered page window shown under a listing.

use serde::Serialize;

/// Most numbered entries shown at once before ellipses kick in.
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// One slot of the page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Number of pages needed for `total_count` results. Always at least 1.
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

pub fn has_previous(current: u32) -> bool {
    current > 1
}

pub fn has_next(current: u32, total: u32) -> bool {
    current < total
}

/// Build the page selector for `current` out of `total` pages.
///
/// ```
/// use tcgshop_core::pagination::{page_window, PageItem::*};
/// assert_eq!(page_window(1, 3), vec![Page(1), Page(2), Page(3)]);
/// assert_eq!(
///     page_window(5, 10),
///     vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
/// );
/// ```
pub fn page_window(current: u32, total: u32) -> Vec<PageItem> {
    let total = total.max(1);

    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(PageItem::Page).collect();
    }

    let mut items = Vec::with_capacity(7);
    if current <= 3 {
        items.extend((1..=4).map(PageItem::Page));
        items.push(PageItem::Ellipsis);
        items.push(PageItem::Page(total));
    } else if current >= total - 2 {
        items.push(PageItem::Page(1));
        items.push(PageItem::Ellipsis);
        items.extend((total - 3..=total).map(PageItem::Page));
    } else {
        items.push(PageItem::Page(1));
        items.push(PageItem::Ellipsis);
        items.extend((current - 1..=current + 1).map(PageItem::Page));
        items.push(PageItem::Ellipsis);
        items.push(PageItem::Page(total));
    }
    items
}

/// Everything the page selector renders for one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub current: u32,
    pub total_pages: u32,
    pub items: Vec<PageItem>,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageWindow {
    pub fn new(current: u32, total_count: u64, page_size: u32) -> Self {
        let total = total_pages(total_count, page_size);
        Self {
            current,
            total_pages: total,
            items: page_window(current, total),
            has_previous: has_previous(current),
            has_next: has_next(current, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PageItem::*;
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(41, 20), 3);
        assert_eq!(total_pages(40, 20), 2);
    }

    #[test]
    fn total_pages_is_at_least_one() {
        assert_eq!(total_pages(0, 20), 1);
        assert_eq!(total_pages(10, 0), 1);
    }

    #[test]
    fn near_start_shows_first_four() {
        assert_eq!(
            page_window(2, 9),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(9)]
        );
    }

    #[test]
    fn near_end_shows_last_four() {
        assert_eq!(
            page_window(8, 9),
            vec![Page(1), Ellipsis, Page(6), Page(7), Page(8), Page(9)]
        );
    }

    #[test]
    fn exactly_five_pages_has_no_ellipsis() {
        assert_eq!(page_window(3, 5).len(), 5);
        assert!(!page_window(3, 5).contains(&Ellipsis));
    }

    #[test]
    fn window_for_listing() {
        let window = PageWindow::new(1, 45, 20);
        assert_eq!(window.total_pages, 3);
        assert_eq!(window.items, vec![Page(1), Page(2), Page(3)]);
        assert!(!window.has_previous);
        assert!(window.has_next);
    }

    #[test]
    fn previous_and_next_bounds() {
        assert!(!has_previous(1));
        assert!(has_previous(2));
        assert!(has_next(2, 3));
        assert!(!has_next(3, 3));
    }
}
