//! Infinite-scroll bookkeeping for the entry feed.

use super::entry::Page;

/// Accumulates pages of a feed and decides when the next page may be loaded.
///
/// Pages are 1-based. Page 1 replaces whatever was loaded; later pages append.
/// Only one page load is in flight at a time and pages are only ever loaded
/// forward.
#[derive(Debug, Clone)]
pub struct Feed<T> {
    items: Vec<T>,
    page_size: u32,
    current_page: u32,
    total_pages: Option<u32>,
    total_entries: Option<u64>,
    last_page_len: Option<usize>,
    in_flight: bool,
}

impl<T> Feed<T> {
    /// An empty feed loading `page_size` entries per page.
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page_size: page_size.max(1),
            current_page: 0,
            total_pages: None,
            total_entries: None,
            last_page_len: None,
            in_flight: false,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The last page applied, 0 before the first load.
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Total entries as reported by the backend, or what has been loaded so far.
    pub fn total_entries(&self) -> u64 {
        self.total_entries.unwrap_or(self.items.len() as u64)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// Whether pages beyond the current one exist.
    ///
    /// Uses the backend's page count when it sent one; otherwise a full last
    /// page means there may be more.
    pub fn has_more(&self) -> bool {
        if self.current_page == 0 {
            return true;
        }
        match self.total_pages {
            Some(total) => self.current_page < total,
            None => self
                .last_page_len
                .is_some_and(|len| len >= self.page_size as usize),
        }
    }

    /// The page to load next, if loading is allowed right now.
    pub fn next_page(&self) -> Option<u32> {
        if self.in_flight || !self.has_more() {
            return None;
        }
        Some(self.current_page + 1)
    }

    /// Mark `page` as loading. Returns false if the request is not allowed:
    /// something is already loading, the page is not ahead of the current one,
    /// or it is past the known last page.
    pub fn begin(&mut self, page: u32) -> bool {
        if self.in_flight || page == 0 || page <= self.current_page {
            return false;
        }
        if self.total_pages.is_some_and(|total| page > total) {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Record a loaded page.
    pub fn apply(&mut self, page: u32, loaded: Page<T>) {
        self.last_page_len = Some(loaded.items.len());
        if page <= 1 {
            self.items = loaded.items;
        } else {
            self.items.extend(loaded.items);
        }
        self.current_page = page;
        if loaded.total_pages.is_some() {
            self.total_pages = loaded.total_pages;
        }
        if loaded.total_entries.is_some() {
            self.total_entries = loaded.total_entries;
        }
        self.in_flight = false;
    }

    /// Record a failed load; loaded entries are kept.
    pub fn fail(&mut self) {
        self.in_flight = false;
    }

    /// Drop everything and start over from page 1.
    pub fn reset(&mut self) {
        *self = Self::new(self.page_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: Vec<u32>, total_pages: Option<u32>) -> Page<u32> {
        Page {
            items,
            total_pages,
            total_entries: None,
        }
    }

    #[test]
    fn appends_later_pages() {
        let mut feed = Feed::new(2);
        assert_eq!(feed.next_page(), Some(1));
        assert!(feed.begin(1));
        assert_eq!(feed.next_page(), None);
        feed.apply(1, page(vec![1, 2], Some(2)));

        assert_eq!(feed.next_page(), Some(2));
        assert!(feed.begin(2));
        feed.apply(2, page(vec![3], Some(2)));

        assert_eq!(feed.items(), &[1, 2, 3]);
        assert!(!feed.has_more());
        assert_eq!(feed.next_page(), None);
    }

    #[test]
    fn rejects_backward_or_out_of_range_pages() {
        let mut feed = Feed::new(5);
        assert!(feed.begin(1));
        feed.apply(1, page(vec![1, 2, 3, 4, 5], Some(3)));

        assert!(!feed.begin(1));
        assert!(!feed.begin(4));
        assert!(feed.begin(2));
        assert!(!feed.begin(3), "one load at a time");
    }

    #[test]
    fn short_page_ends_feed_without_totals() {
        let mut feed = Feed::new(3);
        assert!(feed.begin(1));
        feed.apply(1, page(vec![1, 2, 3], None));
        assert!(feed.has_more());

        assert!(feed.begin(2));
        feed.apply(2, page(vec![4], None));
        assert!(!feed.has_more());
        assert_eq!(feed.total_entries(), 4);
    }

    #[test]
    fn failure_keeps_entries_and_allows_retry() {
        let mut feed = Feed::new(2);
        assert!(feed.begin(1));
        feed.apply(1, page(vec![1, 2], None));
        assert!(feed.begin(2));
        feed.fail();

        assert_eq!(feed.items(), &[1, 2]);
        assert_eq!(feed.next_page(), Some(2));
    }

    #[test]
    fn first_page_replaces() {
        let mut feed = Feed::new(2);
        feed.apply(1, page(vec![1, 2], None));
        feed.reset();
        assert!(feed.begin(1));
        feed.apply(1, page(vec![9], None));
        assert_eq!(feed.items(), &[9]);
    }
}
