//! Order history list state.
//!
//! Paginated, appendable: page 1 replaces, later pages append in arrival
//! order. The store holds the pagination sentinels; fetching is the
//! caller's job (data originates from dispatcher responses). Callers check
//! `loading` before issuing another page fetch to avoid concurrent
//! duplicates.

use crate::models::OrderRecord;

/// Paginated order list state.
#[derive(Debug, Clone)]
pub struct OrderListStore {
    orders: Vec<OrderRecord>,
    current_page: u32,
    page_size: usize,
    no_more_data: bool,
    loading: bool,
}

impl OrderListStore {
    /// Create an empty list with the given page size.
    #[must_use]
    pub const fn new(page_size: usize) -> Self {
        Self {
            orders: Vec::new(),
            current_page: 1,
            page_size,
            no_more_data: false,
            loading: false,
        }
    }

    /// Fetched orders, in arrival order.
    #[must_use]
    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    /// The page to fetch next, 1-based.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Configured page size.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whether the last fetched page was short, implying no further pages.
    #[must_use]
    pub const fn no_more_data(&self) -> bool {
        self.no_more_data
    }

    /// Whether a page fetch is in flight.
    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    /// Clear the list and pagination state.
    pub fn reset(&mut self) {
        self.orders.clear();
        self.current_page = 1;
        self.no_more_data = false;
    }

    /// Replace the whole list. Used for a fresh page-1 fetch.
    pub fn replace(&mut self, orders: Vec<OrderRecord>) {
        self.orders = orders;
    }

    /// Append a fetched page, preserving arrival order. A page shorter
    /// than `page_size` marks the list complete.
    pub fn append(&mut self, orders: Vec<OrderRecord>) {
        if orders.len() < self.page_size {
            self.no_more_data = true;
        }
        self.orders.extend(orders);
    }

    /// Mark a fetch as in flight (or finished).
    pub const fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Set the page to fetch next.
    pub const fn set_current_page(&mut self, page: u32) {
        self.current_page = page;
    }

    /// Record the completion sentinel directly (e.g. from a server `total`
    /// field).
    pub const fn set_no_more_data(&mut self, no_more: bool) {
        self.no_more_data = no_more;
    }
}
