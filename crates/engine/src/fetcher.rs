//! Remote list fetching with last-request-wins ordering.
//!
//! A fetch is split in three steps so the network call can run on another
//! task while the list state stays with the UI:
//!
//! 1. [`ListController::request`] issues a [`FetchTicket`] with a fresh
//!    sequence number and marks the list as loading.
//! 2. [`fetch`] runs the ticket against an [`ExpenseStore`].
//! 3. [`ListController::apply`] stores the result, unless a newer ticket was
//!    issued in the meantime.
use api_types::expense::Expense;

use crate::{
    error::RemoteError,
    query::{QueryState, total_pages},
    store::{ExpenseStore, ListRequest, PageResult},
};

/// `Idle → Loading → {Success | Error}`, re-entered on every request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub request: ListRequest,
}

#[derive(Debug)]
pub struct Fetched {
    pub seq: u64,
    pub result: Result<PageResult, RemoteError>,
}

/// What [`ListController::apply`] did with a response.
#[derive(Debug, PartialEq, Eq)]
pub enum Applied {
    /// A newer request is pending; the response was dropped.
    Stale,
    Updated,
    /// The current page no longer exists; the page was clamped and a new
    /// request must be issued.
    OutOfRange,
    Failed(RemoteError),
}

/// Called after every successful fetch, so that views depending on the
/// same data (the balance summary) can refresh.
pub type DataChanged = Box<dyn Fn() + Send + Sync>;

/// Query state plus the currently displayed page.
#[derive(Default)]
pub struct ListController {
    query: QueryState,
    records: Vec<Expense>,
    total_count: u64,
    state: LoadState,
    seq: u64,
    on_data_changed: Option<DataChanged>,
}

impl std::fmt::Debug for ListController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("query", &self.query)
            .field("records", &self.records.len())
            .field("total_count", &self.total_count)
            .field("state", &self.state)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}

impl ListController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the data-changed notification.
    pub fn on_data_changed(mut self, callback: DataChanged) -> Self {
        self.on_data_changed = Some(callback);
        self
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// Mutable access for filter/sort/page changes. Issue a new
    /// [`request`](Self::request) afterwards.
    pub fn query_mut(&mut self) -> &mut QueryState {
        &mut self.query
    }

    pub fn records(&self) -> &[Expense] {
        &self.records
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u64 {
        total_pages(self.total_count)
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn has_next(&self) -> bool {
        self.query.has_next(self.total_pages())
    }

    pub fn next_page(&mut self) -> bool {
        let total = self.total_pages();
        self.query.next_page(total)
    }

    pub fn prev_page(&mut self) -> bool {
        self.query.prev_page()
    }

    /// Starts a fetch for the current descriptor. Any response to an
    /// earlier ticket will be discarded.
    pub fn request(&mut self) -> FetchTicket {
        self.seq += 1;
        self.state = LoadState::Loading;
        FetchTicket {
            seq: self.seq,
            request: ListRequest::from(&self.query.descriptor()),
        }
    }

    pub fn apply(&mut self, fetched: Fetched) -> Applied {
        if fetched.seq != self.seq {
            tracing::debug!(
                seq = fetched.seq,
                latest = self.seq,
                "dropping stale expense page"
            );
            return Applied::Stale;
        }

        match fetched.result {
            Ok(page) => {
                self.records = page.records;
                self.total_count = page.total_count;
                if self.query.clamp_to(self.total_pages()) {
                    return Applied::OutOfRange;
                }
                self.state = LoadState::Success;
                if let Some(callback) = &self.on_data_changed {
                    callback();
                }
                Applied::Updated
            }
            Err(err) => {
                self.records.clear();
                self.state = LoadState::Error(err.to_string());
                Applied::Failed(err)
            }
        }
    }

    /// Back to a fresh list for the next session: default query, no rows,
    /// and any in-flight response is treated as stale. The data-changed
    /// callback is kept.
    pub fn reset(&mut self) {
        self.query = QueryState::default();
        self.records.clear();
        self.total_count = 0;
        self.state = LoadState::Idle;
        self.seq += 1;
    }

    /// Index-safe lookup used by edit and delete.
    pub fn record(&self, index: usize) -> Option<&Expense> {
        self.records.get(index)
    }
}

/// Executes a ticket against the store.
pub async fn fetch(store: &dyn ExpenseStore, ticket: FetchTicket) -> Fetched {
    let result = store.select(&ticket.request).await;
    match &result {
        Ok(page) => tracing::debug!(
            seq = ticket.seq,
            rows = page.records.len(),
            total = page.total_count,
            "fetched expense page"
        ),
        Err(err) => tracing::error!(seq = ticket.seq, "error fetching expenses: {err}"),
    }
    Fetched {
        seq: ticket.seq,
        result,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::query::{CategoryFilter, SortField};

    fn page(total_count: u64) -> PageResult {
        PageResult {
            records: Vec::new(),
            total_count,
        }
    }

    #[test]
    fn request_marks_loading_and_bumps_sequence() {
        let mut list = ListController::new();
        assert_eq!(list.state(), &LoadState::Idle);

        let first = list.request();
        let second = list.request();
        assert!(second.seq > first.seq);
        assert!(list.is_loading());
    }

    #[test]
    fn only_latest_response_is_applied() {
        let mut list = ListController::new();
        let old = list.request();
        list.query_mut().toggle_sort(SortField::Amount);
        let new = list.request();

        let applied = list.apply(Fetched {
            seq: new.seq,
            result: Ok(page(3)),
        });
        assert_eq!(applied, Applied::Updated);

        let applied = list.apply(Fetched {
            seq: old.seq,
            result: Ok(page(99)),
        });
        assert_eq!(applied, Applied::Stale);
        assert_eq!(list.total_count(), 3);
        assert_eq!(list.state(), &LoadState::Success);
    }

    #[test]
    fn failure_clears_records_and_stops_loading() {
        let mut list = ListController::new();
        let ticket = list.request();
        let applied = list.apply(Fetched {
            seq: ticket.seq,
            result: Err(RemoteError::Transport("refused".to_string())),
        });
        assert!(matches!(applied, Applied::Failed(RemoteError::Transport(_))));
        assert!(list.records().is_empty());
        assert!(!list.is_loading());
        assert!(matches!(list.state(), LoadState::Error(_)));
    }

    #[test]
    fn data_changed_fires_only_on_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut list = ListController::new().on_data_changed(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let ticket = list.request();
        list.apply(Fetched {
            seq: ticket.seq,
            result: Err(RemoteError::Unauthorized),
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let ticket = list.request();
        list.apply(Fetched {
            seq: ticket.seq,
            result: Ok(page(1)),
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shrinking_list_reports_out_of_range() {
        let mut list = ListController::new();
        let ticket = list.request();
        list.apply(Fetched {
            seq: ticket.seq,
            result: Ok(page(25)),
        });
        assert!(list.next_page());
        assert!(list.next_page());
        assert_eq!(list.query().page(), 3);

        let ticket = list.request();
        let applied = list.apply(Fetched {
            seq: ticket.seq,
            result: Ok(page(20)),
        });
        assert_eq!(applied, Applied::OutOfRange);
        assert_eq!(list.query().page(), 2);
    }

    #[test]
    fn reset_drops_rows_and_in_flight_responses() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut list = ListController::new().on_data_changed(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let ticket = list.request();
        list.apply(Fetched {
            seq: ticket.seq,
            result: Ok(page(25)),
        });
        list.query_mut().set_filter(CategoryFilter::Credit);
        let in_flight = list.request();

        list.reset();
        assert_eq!(list.total_count(), 0);
        assert_eq!(list.state(), &LoadState::Idle);
        assert_eq!(list.query().category_filter(), CategoryFilter::All);
        assert_eq!(list.query().page(), 1);

        let applied = list.apply(Fetched {
            seq: in_flight.seq,
            result: Ok(page(3)),
        });
        assert_eq!(applied, Applied::Stale);
        assert_eq!(list.total_count(), 0);

        let ticket = list.request();
        list.apply(Fetched {
            seq: ticket.seq,
            result: Ok(page(1)),
        });
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn ticket_carries_descriptor_range() {
        let mut list = ListController::new();
        list.query_mut().set_filter(CategoryFilter::Debit);
        let ticket = list.request();
        assert_eq!(
            ticket.request.category,
            Some(api_types::expense::ExpenseCategory::Outcome)
        );
        assert_eq!(ticket.request.offset, 0);
        assert!(!ticket.request.ascending);
    }
}
