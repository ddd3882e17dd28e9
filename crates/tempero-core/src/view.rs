//! List view controllers
//!
//! A view owns the last applied snapshot plus the user's filters, and derives
//! the filtered list and current page from scratch whenever either changes.
//!
//! Refreshes are sequenced: [`RecordView::begin_refresh`] hands out a ticket
//! before the fetch starts, and a snapshot whose ticket is older than the one
//! already applied is dropped. A slow response can no longer overwrite a newer
//! one.

use std::ops::{Deref, DerefMut};

use tracing::{debug, warn};

use crate::api::{ProductApi, SalesApi};
use crate::dates::{Clock, SystemClock};
use crate::filter::{FilterState, Record, Selection, TimeWindow, filter_records};
use crate::models::{Product, Sale, SalesSummary};
use crate::notify::{Notification, Notifier, Outbox};
use crate::pagination::{PageLink, Pagination};
use crate::services::messages;

/// Position of a refresh in the order refreshes were started
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// Filtered, paginated view over a snapshot of records
pub struct RecordView<R, C = SystemClock> {
    clock: C,
    records: Vec<R>,
    filtered: Vec<R>,
    state: FilterState,
    pagination: Pagination,
    issued: u64,
    applied: u64,
    alert: Outbox,
}

/// Product listing
pub type InventoryView<C = SystemClock> = RecordView<Product, C>;

impl<R: Record + Clone, C: Clock> RecordView<R, C> {
    pub fn new(clock: C, page_size: usize) -> Self {
        let state = FilterState {
            page_size,
            ..Default::default()
        };
        Self {
            clock,
            records: Vec::new(),
            filtered: Vec::new(),
            pagination: Pagination::new(0, state.page_size, state.page),
            state,
            issued: 0,
            applied: 0,
            alert: Outbox::new(),
        }
    }

    /// Start a refresh; pass the ticket back with the fetched records
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Replace the snapshot unless a newer refresh already landed.
    /// Returns whether the records were applied.
    pub fn apply_snapshot(&mut self, ticket: RefreshTicket, records: Vec<R>) -> bool {
        if ticket.0 <= self.applied {
            debug!(ticket = ticket.0, applied = self.applied, "Dropping stale snapshot");
            return false;
        }
        self.applied = ticket.0;
        self.records = records;
        self.recompute();
        true
    }

    pub fn set_category(&mut self, category: &str) {
        self.state.category = Selection::category(category);
        self.reset_page();
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.state.search = term.into();
        self.reset_page();
    }

    pub fn set_window(&mut self, window: TimeWindow) {
        self.state.window = window;
        self.reset_page();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.state.page_size = page_size.max(1);
        self.reset_page();
    }

    /// Follow a page link; no-op for the ellipsis or an out-of-range page
    pub fn go_to(&mut self, link: PageLink) -> bool {
        if !self.pagination.go_to(link) {
            return false;
        }
        self.state.page = self.pagination.current_page();
        true
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.go_to(PageLink::Page(page))
    }

    /// Ask for `page`, clamped into the available pages. Returns the page shown.
    pub fn request_page(&mut self, page: usize) -> usize {
        self.state.page = page.max(1);
        self.recompute();
        self.state.page
    }

    /// Records on the current page
    pub fn visible(&self) -> &[R] {
        self.pagination.slice(&self.filtered)
    }

    pub fn page_links(&self) -> Vec<PageLink> {
        self.pagination.links()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Every record passing the filters, across all pages
    pub fn filtered(&self) -> &[R] {
        &self.filtered
    }

    /// The full snapshot
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Most recent notification for this view
    pub fn alert(&self) -> &Outbox {
        &self.alert
    }

    fn reset_page(&mut self) {
        self.state.page = 1;
        self.recompute();
    }

    fn recompute(&mut self) {
        let today = self.clock.today();
        self.filtered = filter_records(&self.records, &self.state, today)
            .into_iter()
            .cloned()
            .collect();
        self.pagination = Pagination::new(self.filtered.len(), self.state.page_size, self.state.page);
        self.state.page = self.pagination.current_page();
    }
}

impl<C: Clock> RecordView<Product, C> {
    /// Fetch and apply the product list. On failure the current snapshot stays
    /// and the view's alert carries the error.
    pub async fn refresh<A: ProductApi>(&mut self, api: &A) -> bool {
        let ticket = self.begin_refresh();
        match api.list_products().await {
            Ok(products) => self.apply_snapshot(ticket, products),
            Err(e) => {
                warn!("Product refresh failed: {}", e);
                self.alert.notify(Notification::error(messages::PRODUCTS_LOAD_FAILED));
                false
            }
        }
    }
}

/// Sales listing plus the backend's summary totals
pub struct SalesView<C = SystemClock> {
    list: RecordView<Sale, C>,
    summary: SalesSummary,
    summary_applied: u64,
}

impl<C: Clock> SalesView<C> {
    /// Starts on today's sales
    pub fn new(clock: C, page_size: usize) -> Self {
        let mut list = RecordView::new(clock, page_size);
        list.state.window = TimeWindow::Daily;
        Self {
            list,
            summary: SalesSummary::default(),
            summary_applied: 0,
        }
    }

    pub fn summary(&self) -> &SalesSummary {
        &self.summary
    }

    /// Replace the summary unless a newer one was already applied
    pub fn apply_summary(&mut self, ticket: RefreshTicket, summary: SalesSummary) -> bool {
        if ticket.0 <= self.summary_applied {
            return false;
        }
        self.summary_applied = ticket.0;
        self.summary = summary;
        true
    }

    pub fn profit_of(sale: &Sale) -> f64 {
        sale.profit()
    }

    /// Fetch sales and summary together. Either may fail on its own; whatever
    /// arrives is applied.
    pub async fn refresh<A: SalesApi>(&mut self, api: &A) -> bool {
        let ticket = self.list.begin_refresh();
        let (sales, summary) = futures::join!(api.list_sales(), api.sales_summary());

        let mut ok = true;
        match summary {
            Ok(summary) => {
                self.apply_summary(ticket, summary);
            }
            Err(e) => {
                warn!("Summary refresh failed: {}", e);
                self.list.alert.notify(Notification::error(messages::SUMMARY_LOAD_FAILED));
                ok = false;
            }
        }
        match sales {
            Ok(sales) => ok &= self.list.apply_snapshot(ticket, sales),
            Err(e) => {
                warn!("Sales refresh failed: {}", e);
                self.list.alert.notify(Notification::error(messages::SALES_LOAD_FAILED));
                ok = false;
            }
        }
        ok
    }
}

impl<C> Deref for SalesView<C> {
    type Target = RecordView<Sale, C>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}

impl<C> DerefMut for SalesView<C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.list
    }
}
