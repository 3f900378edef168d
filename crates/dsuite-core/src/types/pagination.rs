//! Stateful pager over a filtered, sorted query.
//!
//! A [`Pager`] bundles everything needed to walk a result set one page at
//! a time without re-specifying filter and sort on every call: the filter
//! conditions, the sort order, the page size, the current 1-based page
//! index, and — once the first page has been executed — the frozen totals.
//!
//! The pager itself never touches the database. The query layer reads its
//! filter/sort, fixes the totals after the one count round trip, and
//! advances the cursor after composing each page. Callers drive iteration
//! with a fetch-then-check loop:
//!
//! ```ignore
//! loop {
//!     let page = query_page::<Car>(&pool, &mut pager).await?.fetch(&pool).await?;
//!     render(page);
//!     if !pager.has_next_page() {
//!         break;
//!     }
//! }
//! ```
//!
//! `has_next_page()` is the only termination signal; ignoring it loops
//! forever on the last page.

use serde::{Deserialize, Serialize};

use super::filter::FilterField;
use super::sorting::SortField;

/// Page size used when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Row and page counts, fixed on first execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTotals {
    /// Total rows matching the filter at the time of the first execution.
    pub rows: u64,
    /// Total pages at the pager's page size.
    pub pages: u64,
}

/// A reusable cursor over a filtered, sorted query.
///
/// The totals are computed exactly once per pager instance, on first
/// execution, and never refreshed — even if the underlying table changes
/// while pages are being walked. Callers that need fresh counts build a
/// new pager.
///
/// The page index never exceeds the total page count. A separate flag
/// records that the final page has been composed, so `has_next_page()`
/// turns false exactly after the last page was handed out rather than one
/// page early.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pager {
    filter: Vec<FilterField>,
    sort: Vec<SortField>,
    page_size: u64,
    page_index: u64,
    totals: Option<PageTotals>,
    last_page_composed: bool,
}

impl Pager {
    /// Create a pager with the given page size (clamped to at least 1)
    /// and no filter or sort order.
    pub fn new(page_size: u64) -> Self {
        Self {
            filter: Vec::new(),
            sort: Vec::new(),
            page_size: page_size.max(1),
            page_index: 1,
            totals: None,
            last_page_composed: false,
        }
    }

    /// Add a filter condition. All conditions are combined with `AND`.
    pub fn with_filter(mut self, filter: FilterField) -> Self {
        self.filter.push(filter);
        self
    }

    /// Append a sort column. The first column added is the primary
    /// ordering; every later column is a tie-break.
    pub fn with_sort(mut self, sort: SortField) -> Self {
        self.sort.push(sort);
        self
    }

    /// The filter conditions.
    pub fn filter(&self) -> &[FilterField] {
        &self.filter
    }

    /// The sort order.
    pub fn sort(&self) -> &[SortField] {
        &self.sort
    }

    /// Rows per page.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Current page index (1-based).
    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    /// Number of rows to skip for the current page.
    pub fn skip(&self) -> u64 {
        (self.page_index - 1) * self.page_size
    }

    /// Whether the totals have been fixed by a first execution.
    pub fn is_initialized(&self) -> bool {
        self.totals.is_some()
    }

    /// Fix the totals from the count the query layer observed.
    ///
    /// Only the first call has any effect; the totals are a one-time
    /// snapshot by contract.
    pub fn initialize(&mut self, total_rows: u64) {
        if self.totals.is_some() {
            return;
        }
        self.totals = Some(PageTotals {
            rows: total_rows,
            pages: total_rows.div_ceil(self.page_size),
        });
    }

    /// Total matching rows, once initialized.
    pub fn total_rows(&self) -> Option<u64> {
        self.totals.map(|t| t.rows)
    }

    /// Total pages, once initialized. Zero rows means zero pages.
    pub fn total_pages(&self) -> Option<u64> {
        self.totals.map(|t| t.pages)
    }

    /// Whether another page remains to be fetched.
    ///
    /// Always `false` before initialization and `false` once the final
    /// page has been composed.
    pub fn has_next_page(&self) -> bool {
        match self.totals {
            Some(t) => {
                self.page_index < t.pages
                    || (self.page_index == t.pages && !self.last_page_composed)
            }
            None => false,
        }
    }

    /// Whether a page before the current one exists.
    pub fn has_previous_page(&self) -> bool {
        self.page_index > 1
    }

    /// Record that the page at the current index has been composed and
    /// move the cursor to the next page if one exists.
    ///
    /// Called by the query layer after each page composition; advancing
    /// past the last page is a no-op apart from clearing
    /// `has_next_page()`.
    pub fn advance(&mut self) {
        let Some(totals) = self.totals else {
            return;
        };
        if self.page_index < totals.pages {
            self.page_index += 1;
        } else {
            self.last_page_composed = true;
        }
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sorting::SortField;

    #[test]
    fn test_defaults() {
        let pager = Pager::default();
        assert_eq!(pager.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(pager.page_index(), 1);
        assert_eq!(pager.skip(), 0);
        assert!(!pager.is_initialized());
        assert!(!pager.has_next_page());
        assert!(!pager.has_previous_page());
    }

    #[test]
    fn test_page_size_clamped_to_one() {
        let pager = Pager::new(0);
        assert_eq!(pager.page_size(), 1);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let mut pager = Pager::new(50);
        pager.initialize(237);
        assert_eq!(pager.total_rows(), Some(237));
        assert_eq!(pager.total_pages(), Some(5));
    }

    #[test]
    fn test_zero_rows_means_zero_pages() {
        let mut pager = Pager::new(20);
        pager.initialize(0);
        assert_eq!(pager.total_pages(), Some(0));
        assert!(!pager.has_next_page());
        pager.advance();
        assert_eq!(pager.page_index(), 1);
    }

    #[test]
    fn test_initialize_is_one_shot() {
        let mut pager = Pager::new(10);
        pager.initialize(100);
        pager.initialize(7);
        assert_eq!(pager.total_rows(), Some(100));
        assert_eq!(pager.total_pages(), Some(10));
    }

    #[test]
    fn test_next_page_flag_false_exactly_after_last_fetch() {
        let mut pager = Pager::new(50);

        // Mimic the query layer: initialize on first use, advance after
        // composing each page.
        let mut fetches = 0;
        loop {
            pager.initialize(237);
            fetches += 1;
            pager.advance();
            if !pager.has_next_page() {
                break;
            }
        }

        assert_eq!(fetches, 5);
        assert_eq!(pager.page_index(), 5);

        // Index stays clamped to the final page.
        pager.advance();
        assert_eq!(pager.page_index(), 5);
        assert!(!pager.has_next_page());
    }

    #[test]
    fn test_skip_tracks_index() {
        let mut pager = Pager::new(25);
        pager.initialize(100);
        assert_eq!(pager.skip(), 0);
        pager.advance();
        assert_eq!(pager.skip(), 25);
        pager.advance();
        assert_eq!(pager.skip(), 50);
    }

    #[test]
    fn test_single_page_result() {
        let mut pager = Pager::new(50);
        pager.initialize(12);
        assert_eq!(pager.total_pages(), Some(1));
        assert!(pager.has_next_page());
        pager.advance();
        assert_eq!(pager.page_index(), 1);
        assert!(!pager.has_next_page());
    }

    #[test]
    fn test_previous_page_flag() {
        let mut pager = Pager::new(10);
        pager.initialize(30);
        assert!(!pager.has_previous_page());
        pager.advance();
        assert!(pager.has_previous_page());
    }

    #[test]
    fn test_builder_accumulates_sort_order() {
        let pager = Pager::new(50)
            .with_sort(SortField::asc("make"))
            .with_sort(SortField::desc("mileage"));
        assert_eq!(pager.sort().len(), 2);
        assert_eq!(pager.sort()[0].field, "make");
        assert_eq!(pager.sort()[1].field, "mileage");
    }
}
