//! Core of the expense tracker.
//!
//! The engine owns no storage: every read and write goes through an
//! [`ExpenseStore`], and every operation that needs a user asks an injected
//! [`SessionProvider`]. What lives here is the client-side logic around
//! those calls:
//!
//! - [`query`]: filter, sort and pagination state and the descriptor it
//!   derives.
//! - [`fetcher`]: sequenced list fetches, last request wins.
//! - [`editor`]: the create/edit form and its validation.
//! - [`delete`]: confirmed removal.
//! - [`summary`]: the server-computed balance.
pub use delete::{ConfirmedDelete, DeleteRequest};
pub use editor::{EditorMode, EditorStatus, ExpenseForm, RecordEditor, Submission};
pub use error::{EngineError, Field, RemoteError, ValidationErrors};
pub use fetcher::{Applied, FetchTicket, Fetched, ListController, LoadState};
pub use money::{AmountError, Rupiah};
pub use query::{CategoryFilter, PAGE_SIZE, QueryDescriptor, QueryState, SortDirection, SortField};
pub use store::{ExpenseStore, ListRequest, PageResult, RemoteResult, SessionProvider};
pub use summary::Balance;

pub mod delete;
pub mod editor;
mod error;
pub mod fetcher;
mod money;
pub mod query;
mod store;
pub mod summary;
