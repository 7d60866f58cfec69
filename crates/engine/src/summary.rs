use api_types::summary::ExpenseSummary;

use crate::{error::RemoteError, money::Rupiah, store::ExpenseStore};

/// Balance figures as displayed above the list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Balance {
    pub total_credit: Rupiah,
    pub total_debit: Rupiah,
    pub balance: Rupiah,
}

impl From<ExpenseSummary> for Balance {
    fn from(summary: ExpenseSummary) -> Self {
        Self {
            total_credit: Rupiah::new(summary.total_income),
            total_debit: Rupiah::new(summary.total_outcome),
            balance: Rupiah::new(summary.net_amount),
        }
    }
}

/// Fetches the server-side aggregation.
pub async fn fetch_balance(store: &dyn ExpenseStore) -> Result<Balance, RemoteError> {
    match store.summary().await {
        Ok(summary) => Ok(summary.into()),
        Err(err) => {
            tracing::error!("error fetching summary: {err}");
            Err(err)
        }
    }
}
