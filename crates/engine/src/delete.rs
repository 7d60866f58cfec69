//! Removal of a record, gated behind an explicit confirmation.

use crate::{
    error::EngineError,
    store::{ExpenseStore, SessionProvider},
};

/// A pending delete. Nothing can be sent until the user confirms it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteRequest {
    id: i64,
    description: String,
}

impl DeleteRequest {
    pub fn new(id: i64, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Label shown in the confirmation prompt.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete { id: self.id }
    }
}

/// A delete the user agreed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfirmedDelete {
    id: i64,
}

impl ConfirmedDelete {
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Issues the removal. Requires a signed-in user; failures are logged
    /// and returned, never retried.
    pub async fn execute(
        self,
        store: &dyn ExpenseStore,
        session: &dyn SessionProvider,
    ) -> Result<(), EngineError> {
        if session.current_user().is_none() {
            tracing::warn!(id = self.id, "delete refused without a session");
            return Err(EngineError::Unauthenticated);
        }
        match store.delete(self.id).await {
            Ok(()) => {
                tracing::info!(id = self.id, "expense deleted");
                Ok(())
            }
            Err(err) => {
                tracing::error!(id = self.id, "error deleting expense: {err}");
                Err(err.into())
            }
        }
    }
}
