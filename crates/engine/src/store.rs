//! Abstract collaborators of the engine.
//!
//! Implementations:
//! - `expense_tui`: `SupabaseClient` (PostgREST + GoTrue over HTTP)
//! - tests: in-memory store and session

use api_types::{
    expense::{Expense, ExpenseCategory, ExpenseInput},
    summary::ExpenseSummary,
    user::User,
};
use async_trait::async_trait;

use crate::{error::RemoteError, query::SortField};

pub type RemoteResult<T> = Result<T, RemoteError>;

/// A filtered, sorted, range-limited read of the expenses table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListRequest {
    /// `None` selects both categories.
    pub category: Option<ExpenseCategory>,
    pub order_by: SortField,
    pub ascending: bool,
    pub offset: u64,
    pub limit: u64,
}

/// One bounded slice of the list plus the total matching count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageResult {
    pub records: Vec<Expense>,
    pub total_count: u64,
}

/// Hosted data store holding the expenses table.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Runs a list request, returning the page and the total count of rows
    /// matching the filter.
    async fn select(&self, request: &ListRequest) -> RemoteResult<PageResult>;

    /// Fetches one record; `NotFound` when the id does not exist.
    async fn get(&self, id: i64) -> RemoteResult<Expense>;

    /// Inserts a record and returns it with its server-assigned id.
    async fn insert(&self, input: &ExpenseInput) -> RemoteResult<Expense>;

    /// Updates every editable field of `id`; `NotFound` when no row matched.
    async fn update(&self, id: i64, input: &ExpenseInput) -> RemoteResult<Expense>;

    /// Removes `id`; `NotFound` when no row matched.
    async fn delete(&self, id: i64) -> RemoteResult<()>;

    /// Calls the `get_expense_summary` procedure.
    async fn summary(&self) -> RemoteResult<ExpenseSummary>;
}

/// Authentication session, injected wherever an operation needs a user.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;

    async fn sign_in(&self, email: &str, password: &str) -> RemoteResult<User>;

    /// Ends the session. The local session is dropped even when the remote
    /// call fails.
    async fn sign_out(&self) -> RemoteResult<()>;
}
