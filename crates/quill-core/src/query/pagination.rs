use serde::Serialize;

/// Posts per listing page.
pub const PAGE_SIZE: u64 = 3;

/// The slice of a result set selected by a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u64,
    pub offset: u64,
}

/// Resolve a raw `page` parameter against `total` results.
///
/// Missing, non-numeric and values below 1 select page 1; values past the end
/// select the last page. An empty result set still has one (empty) page.
pub fn resolve_page(requested: Option<&str>, total: u64, per_page: u64) -> PageWindow {
    let per_page = per_page.max(1);
    let num_pages = total.div_ceil(per_page).max(1);

    let number = requested.map_or(1, parse_page).clamp(1, num_pages);

    PageWindow {
        number,
        num_pages,
        per_page,
        offset: (number - 1) * per_page,
    }
}

/// Parse a page number; digit strings too long for `u64` saturate.
fn parse_page(raw: &str) -> u64 {
    let raw = raw.trim();
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return digits.parse().unwrap_or(u64::MAX);
    }
    1
}

/// One page of results plus navigation metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u64>,
    pub previous_page_number: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow, total: u64) -> Self {
        let has_next = window.number < window.num_pages;
        let has_previous = window.number > 1;
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            per_page: window.per_page,
            total,
            has_next,
            has_previous,
            next_page_number: has_next.then(|| window.number + 1),
            previous_page_number: has_previous.then(|| window.number - 1),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            per_page: self.per_page,
            total: self.total,
            has_next: self.has_next,
            has_previous: self.has_previous,
            next_page_number: self.next_page_number,
            previous_page_number: self.previous_page_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_zero_and_garbage_select_first_page() {
        for raw in [None, Some("0"), Some("-4"), Some("abc"), Some("")] {
            let window = resolve_page(raw, 7, PAGE_SIZE);
            assert_eq!(window.number, 1, "page {raw:?}");
            assert_eq!(window.offset, 0);
        }
    }

    #[test]
    fn pages_past_the_end_clamp_to_last() {
        let window = resolve_page(Some("99"), 7, PAGE_SIZE);
        assert_eq!(window.num_pages, 3);
        assert_eq!(window.number, 3);
        assert_eq!(window.offset, 6);

        let huge = resolve_page(Some("99999999999999999999"), 7, PAGE_SIZE);
        assert_eq!(huge.number, 3);
        assert_eq!(huge.offset, 6);
    }

    #[test]
    fn in_range_page_is_kept() {
        let window = resolve_page(Some(" 2 "), 7, PAGE_SIZE);
        assert_eq!(window.number, 2);
        assert_eq!(window.offset, 3);
    }

    #[test]
    fn empty_results_have_one_page() {
        let window = resolve_page(Some("5"), 0, PAGE_SIZE);
        assert_eq!(window.num_pages, 1);
        assert_eq!(window.number, 1);
    }

    #[test]
    fn page_navigation_flags() {
        let page = Page::new(vec![4, 5, 6], resolve_page(Some("2"), 7, PAGE_SIZE), 7);
        assert!(page.has_next);
        assert!(page.has_previous);
        assert_eq!(page.next_page_number, Some(3));
        assert_eq!(page.previous_page_number, Some(1));

        let last = page.map(|n| n * 10);
        assert_eq!(last.items, vec![40, 50, 60]);
    }
}
