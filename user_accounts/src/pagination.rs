//! Page-number pagination with a windowed list of page links

const INNER_WINDOW: u32 = 4;
const OUTER_WINDOW: u32 = 1;

/// One entry of the page link list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Gap,
}

impl PageItem {
    pub fn number(&self) -> Option<u32> {
        match self {
            PageItem::Page(n) => Some(*n),
            PageItem::Gap => None,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, PageItem::Gap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub per_page: u32,
    pub total_entries: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Build pagination for a requested page, clamping it into `1..=total_pages`
    pub fn new(requested_page: Option<u32>, per_page: u32, total_entries: u64) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total_entries.div_ceil(per_page as u64).max(1);
        let total_pages = u32::try_from(total_pages).unwrap_or(u32::MAX);
        let current_page = requested_page.unwrap_or(1).clamp(1, total_pages);

        Self {
            current_page,
            per_page,
            total_entries,
            total_pages,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.current_page as u64 - 1) * self.per_page as u64
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn previous_page(&self) -> Option<u32> {
        self.has_previous().then(|| self.current_page - 1)
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.current_page + 1)
    }

    /// Whether a pagination control is worth rendering at all
    pub fn needs_links(&self) -> bool {
        self.total_pages > 1
    }

    /// Page links around the current page, with the first and last pages
    /// always reachable and gaps where pages are skipped
    pub fn page_items(&self) -> Vec<PageItem> {
        let total = self.total_pages;
        let current = self.current_page as i64;

        let mut window_from = current - INNER_WINDOW as i64;
        let mut window_to = current + INNER_WINDOW as i64;

        if window_to > total as i64 {
            window_from -= window_to - total as i64;
            window_to = total as i64;
        }
        if window_from < 1 {
            window_to = (window_to + 1 - window_from).min(total as i64);
            window_from = 1;
        }
        let (window_from, window_to) = (window_from as u32, window_to as u32);

        let mut items = Vec::new();

        if OUTER_WINDOW + 3 < window_from {
            items.extend((1..=OUTER_WINDOW + 1).map(PageItem::Page));
            items.push(PageItem::Gap);
        } else {
            items.extend((1..window_from).map(PageItem::Page));
        }

        items.extend((window_from..=window_to).map(PageItem::Page));

        if total > window_to + OUTER_WINDOW + 2 {
            items.push(PageItem::Gap);
            items.extend((total - OUTER_WINDOW..=total).map(PageItem::Page));
        } else {
            items.extend((window_to + 1..=total).map(PageItem::Page));
        }

        items
    }
}
