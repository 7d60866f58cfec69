use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Amount in whole rupiah, as stored in the `amount` column.
///
/// Decoding accepts both JSON integers and floats: numeric columns come back
/// as `15000` or `15000.0` depending on the column type. Floats are rounded.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(value) => Ok(value),
        Raw::Float(value) if value.is_finite() => Ok(value.round() as i64),
        Raw::Float(_) => Err(serde::de::Error::custom("amount must be finite")),
    }
}

pub mod expense {
    use super::*;

    /// Category of a record. The wire values are `income` and `outcome`;
    /// the UI shows them as credit and debit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ExpenseCategory {
        Income,
        Outcome,
    }

    impl ExpenseCategory {
        /// Returns the canonical value used by the hosted table.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Income => "income",
                Self::Outcome => "outcome",
            }
        }

        pub fn display_name(self) -> &'static str {
            match self {
                Self::Income => "Credit",
                Self::Outcome => "Debit",
            }
        }

        pub fn toggled(self) -> Self {
            match self {
                Self::Income => Self::Outcome,
                Self::Outcome => Self::Income,
            }
        }

        /// Parses either the wire value or the display name.
        pub fn parse(input: &str) -> Option<Self> {
            match input.trim().to_ascii_lowercase().as_str() {
                "income" | "credit" => Some(Self::Income),
                "outcome" | "debit" => Some(Self::Outcome),
                _ => None,
            }
        }
    }

    /// A row of the `expenses` table.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Expense {
        pub id: i64,
        /// Calendar date, `YYYY-MM-DD` on the wire.
        pub date: NaiveDate,
        pub description: String,
        pub category: ExpenseCategory,
        #[serde(deserialize_with = "deserialize_amount")]
        pub amount: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub created_at: Option<DateTime<FixedOffset>>,
    }

    /// Payload for insert and update. Never carries `id` or `created_at`:
    /// both are assigned by the server.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExpenseInput {
        pub date: NaiveDate,
        pub description: String,
        pub category: ExpenseCategory,
        pub amount: i64,
    }

    impl From<&Expense> for ExpenseInput {
        fn from(expense: &Expense) -> Self {
            Self {
                date: expense.date,
                description: expense.description.clone(),
                category: expense.category,
                amount: expense.amount,
            }
        }
    }
}

pub mod summary {
    use super::*;

    /// One row returned by the `get_expense_summary` procedure.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExpenseSummary {
        #[serde(deserialize_with = "deserialize_amount")]
        pub total_income: i64,
        #[serde(deserialize_with = "deserialize_amount")]
        pub total_outcome: i64,
        #[serde(deserialize_with = "deserialize_amount")]
        pub net_amount: i64,
    }
}

pub mod user {
    use super::*;

    /// The signed-in user as reported by the auth service.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct User {
        pub id: Uuid,
        #[serde(default)]
        pub email: Option<String>,
    }

    #[derive(Debug, Serialize)]
    pub struct PasswordGrant<'a> {
        pub email: &'a str,
        pub password: &'a str,
    }

    #[derive(Debug, Serialize)]
    pub struct RefreshGrant<'a> {
        pub refresh_token: &'a str,
    }

    /// Response body of the password and refresh-token grants.
    #[derive(Debug, Deserialize)]
    pub struct TokenResponse {
        pub access_token: String,
        #[serde(default)]
        pub refresh_token: Option<String>,
        #[serde(default)]
        /// Access token lifetime in seconds.
        pub expires_in: Option<u64>,
        pub user: User,
    }
}
