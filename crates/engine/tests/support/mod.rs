//! In-memory collaborators for the engine tests.
#![allow(dead_code)]

use std::sync::Mutex;

use api_types::{
    expense::{Expense, ExpenseCategory, ExpenseInput},
    summary::ExpenseSummary,
    user::User,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use engine::{ExpenseStore, ListRequest, PageResult, RemoteError, SessionProvider, SortField};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Expense>>,
    next_id: Mutex<i64>,
    /// If set, the next call fails with this error.
    fail_next: Mutex<Option<RemoteError>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, err: RemoteError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub async fn seed(&self, inputs: &[ExpenseInput]) {
        for input in inputs {
            self.insert(input).await.unwrap();
        }
    }

    fn take_failure(&self) -> Result<(), RemoteError> {
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ExpenseStore for MemoryStore {
    async fn select(&self, request: &ListRequest) -> Result<PageResult, RemoteError> {
        self.take_failure()?;
        let rows = self.rows.read().await;
        let mut matching: Vec<Expense> = rows
            .iter()
            .filter(|e| request.category.is_none_or(|c| c == e.category))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let ord = match request.order_by {
                SortField::Date => a.date.cmp(&b.date),
                SortField::Description => a.description.cmp(&b.description),
                SortField::Category => a.category.as_str().cmp(b.category.as_str()),
                SortField::Amount => a.amount.cmp(&b.amount),
            };
            let ord = ord.then(a.id.cmp(&b.id));
            if request.ascending { ord } else { ord.reverse() }
        });

        let total_count = matching.len() as u64;
        let records = matching
            .into_iter()
            .skip(request.offset as usize)
            .take(request.limit as usize)
            .collect();
        Ok(PageResult {
            records,
            total_count,
        })
    }

    async fn get(&self, id: i64) -> Result<Expense, RemoteError> {
        self.take_failure()?;
        self.rows
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(RemoteError::NotFound)
    }

    async fn insert(&self, input: &ExpenseInput) -> Result<Expense, RemoteError> {
        self.take_failure()?;
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        let expense = Expense {
            id,
            date: input.date,
            description: input.description.clone(),
            category: input.category,
            amount: input.amount,
            created_at: Some(Utc::now().fixed_offset()),
        };
        self.rows.write().await.push(expense.clone());
        Ok(expense)
    }

    async fn update(&self, id: i64, input: &ExpenseInput) -> Result<Expense, RemoteError> {
        self.take_failure()?;
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(RemoteError::NotFound)?;
        row.date = input.date;
        row.description = input.description.clone();
        row.category = input.category;
        row.amount = input.amount;
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RemoteError> {
        self.take_failure()?;
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|e| e.id != id);
        if rows.len() == before {
            return Err(RemoteError::NotFound);
        }
        Ok(())
    }

    async fn summary(&self) -> Result<ExpenseSummary, RemoteError> {
        self.take_failure()?;
        let rows = self.rows.read().await;
        let sum = |category: ExpenseCategory| -> i64 {
            rows.iter()
                .filter(|e| e.category == category)
                .map(|e| e.amount)
                .sum()
        };
        let total_income = sum(ExpenseCategory::Income);
        let total_outcome = sum(ExpenseCategory::Outcome);
        Ok(ExpenseSummary {
            total_income,
            total_outcome,
            net_amount: total_income - total_outcome,
        })
    }
}

pub struct MemorySession {
    user: Mutex<Option<User>>,
}

impl MemorySession {
    pub fn signed_in() -> Self {
        Self {
            user: Mutex::new(Some(User {
                id: Uuid::new_v4(),
                email: Some("alice@example.com".to_string()),
            })),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            user: Mutex::new(None),
        }
    }
}

#[async_trait]
impl SessionProvider for MemorySession {
    fn current_user(&self) -> Option<User> {
        self.user.lock().unwrap().clone()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, RemoteError> {
        if password != "secret" {
            return Err(RemoteError::Rejected("Invalid login credentials".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        };
        *self.user.lock().unwrap() = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        *self.user.lock().unwrap() = None;
        Ok(())
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn input(date: NaiveDate, description: &str, category: ExpenseCategory, amount: i64) -> ExpenseInput {
    ExpenseInput {
        date,
        description: description.to_string(),
        category,
        amount,
    }
}

/// 25 records alternating credit/debit, one per day of January 2025.
pub fn january() -> Vec<ExpenseInput> {
    (1..=25)
        .map(|d| {
            let category = if d % 2 == 0 {
                ExpenseCategory::Income
            } else {
                ExpenseCategory::Outcome
            };
            input(day(2025, 1, d), &format!("item {d:02}"), category, i64::from(d) * 1000)
        })
        .collect()
}
