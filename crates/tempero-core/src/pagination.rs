//! Page slicing and compressed page-number links

use std::ops::Range;

/// Items per page in both list views
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Pages shown on each side of the current one
pub const NEAR_WINDOW: usize = 3;

/// Entry in the page-number bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    /// Collapsed run of hidden pages
    Ellipsis,
}

/// Current page of a filtered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    total_items: usize,
    page_size: usize,
    total_pages: usize,
    current_page: usize,
}

impl Pagination {
    /// Paginate `total_items`, clamping `requested_page` into the valid range.
    ///
    /// With no items there are zero pages and the current page is 1.
    pub fn new(total_items: usize, page_size: usize, requested_page: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size);
        Self {
            total_items,
            page_size,
            total_pages,
            current_page: requested_page.clamp(1, total_pages.max(1)),
        }
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Index range of the current page, half-open
    pub fn range(&self) -> Range<usize> {
        if self.total_pages == 0 {
            return 0..0;
        }
        let start = (self.current_page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// The current page of `items`
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        &items[start..end]
    }

    pub fn links(&self) -> Vec<PageLink> {
        self.links_with_window(NEAR_WINDOW)
    }

    /// Page links: first page, ellipsis, the pages within `window` of the
    /// current one, ellipsis, last page. Ellipses only stand in for at least
    /// one hidden page.
    pub fn links_with_window(&self, window: usize) -> Vec<PageLink> {
        if self.total_pages == 0 {
            return Vec::new();
        }

        let start = self.current_page.saturating_sub(window).max(1);
        let end = (self.current_page + window).min(self.total_pages);
        let mut links = Vec::with_capacity(end - start + 5);

        if start > 1 {
            links.push(PageLink::Page(1));
            if start > 2 {
                links.push(PageLink::Ellipsis);
            }
        }

        links.extend((start..=end).map(PageLink::Page));

        if end < self.total_pages {
            if end + 1 < self.total_pages {
                links.push(PageLink::Ellipsis);
            }
            links.push(PageLink::Page(self.total_pages));
        }

        links
    }

    /// Move to `page`. Returns false (and changes nothing) when out of range.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages {
            return false;
        }
        self.current_page = page;
        true
    }

    /// Follow a page link; the ellipsis is not navigable
    pub fn go_to(&mut self, link: PageLink) -> bool {
        match link {
            PageLink::Page(page) => self.go_to_page(page),
            PageLink::Ellipsis => false,
        }
    }

    pub fn next(&mut self) -> bool {
        self.go_to_page(self.current_page + 1)
    }

    pub fn previous(&mut self) -> bool {
        self.go_to_page(self.current_page.saturating_sub(1))
    }
}
