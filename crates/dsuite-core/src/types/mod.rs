//! Shared query vocabulary: filters, sort order, and the pager.

pub mod filter;
pub mod pagination;
pub mod sorting;

pub use filter::{FilterField, FilterOp, FilterValue};
pub use pagination::{PageTotals, Pager, DEFAULT_PAGE_SIZE};
pub use sorting::{SortDirection, SortField};
