//! Single-record editor: form state, validation, create and update.

use api_types::expense::{Expense, ExpenseCategory, ExpenseInput};
use chrono::{DateTime, NaiveDate};

use crate::{
    error::{EngineError, Field, RemoteError, ValidationErrors},
    money::Rupiah,
    store::{ExpenseStore, SessionProvider},
};

/// Chosen at construction: the presence of an id means editing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(i64),
}

impl EditorMode {
    pub fn title(self) -> &'static str {
        match self {
            Self::Create => "Add New Expense",
            Self::Edit(_) => "Edit Expense",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EditorStatus {
    #[default]
    Idle,
    Loading,
    Saving,
    Failed(String),
}

/// Raw form values, as typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseForm {
    pub date: String,
    pub description: String,
    pub category: Option<ExpenseCategory>,
    pub amount: String,
}

impl ExpenseForm {
    /// Empty form dated `today`, defaulting to a debit.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            description: String::new(),
            category: Some(ExpenseCategory::Outcome),
            amount: String::new(),
        }
    }

    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            date: expense.date.format("%Y-%m-%d").to_string(),
            description: expense.description.clone(),
            category: Some(expense.category),
            amount: expense.amount.to_string(),
        }
    }

    /// Checks every field and builds the payload, normalizing the date to
    /// its calendar day.
    pub fn validate(&self) -> Result<ExpenseInput, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let date = if self.date.trim().is_empty() {
            errors.push(Field::Date, "Please select a date");
            None
        } else {
            let parsed = parse_date(&self.date);
            if parsed.is_none() {
                errors.push(Field::Date, "Use YYYY-MM-DD");
            }
            parsed
        };

        let description = self.description.trim();
        if description.is_empty() {
            errors.push(Field::Description, "Description is required");
        }

        if self.category.is_none() {
            errors.push(Field::Category, "Select a category");
        }

        let amount = match self.amount.parse::<Rupiah>() {
            Ok(amount) if amount.is_positive() => Some(amount),
            Ok(_) => {
                errors.push(Field::Amount, "Amount must be greater than zero");
                None
            }
            Err(err) => {
                errors.push(Field::Amount, capitalize(&err.to_string()));
                None
            }
        };

        match (date, self.category, amount) {
            (Some(date), Some(category), Some(amount)) if errors.is_empty() => Ok(ExpenseInput {
                date,
                description: description.to_string(),
                category,
                amount: amount.value(),
            }),
            _ => Err(errors),
        }
    }
}

/// Accepts a calendar date or an RFC 3339 timestamp.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A validated write, detached from the editor so it can run on another task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub mode: EditorMode,
    pub input: ExpenseInput,
}

impl Submission {
    pub async fn execute(&self, store: &dyn ExpenseStore) -> Result<Expense, RemoteError> {
        let result = match self.mode {
            EditorMode::Create => store.insert(&self.input).await,
            EditorMode::Edit(id) => store.update(id, &self.input).await,
        };
        match &result {
            Ok(expense) => tracing::info!(id = expense.id, mode = ?self.mode, "expense saved"),
            Err(err) => tracing::error!(mode = ?self.mode, "error saving expense: {err}"),
        }
        result
    }
}

/// Loads the record being edited.
pub async fn load_record(store: &dyn ExpenseStore, id: i64) -> Result<Expense, RemoteError> {
    let result = store.get(id).await;
    if let Err(err) = &result {
        tracing::error!(id, "error fetching expense: {err}");
    }
    result
}

#[derive(Clone, Debug)]
pub struct RecordEditor {
    mode: EditorMode,
    pub form: ExpenseForm,
    errors: ValidationErrors,
    status: EditorStatus,
}

impl RecordEditor {
    pub fn new(mode: EditorMode, today: NaiveDate) -> Self {
        let status = match mode {
            EditorMode::Create => EditorStatus::Idle,
            EditorMode::Edit(_) => EditorStatus::Loading,
        };
        Self {
            mode,
            form: ExpenseForm::new(today),
            errors: ValidationErrors::default(),
            status,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn status(&self) -> &EditorStatus {
        &self.status
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.status, EditorStatus::Loading | EditorStatus::Saving)
    }

    /// Fills the form with the fetched record. A failed fetch leaves the
    /// defaults in place.
    pub fn apply_loaded(&mut self, result: Result<Expense, RemoteError>) {
        match result {
            Ok(expense) => {
                self.form = ExpenseForm::from_expense(&expense);
                self.status = EditorStatus::Idle;
            }
            Err(err) => {
                self.status = EditorStatus::Failed(err.to_string());
            }
        }
    }

    /// Validates and locks the form. The returned submission must be
    /// executed and its result handed to [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(
        &mut self,
        session: &dyn SessionProvider,
    ) -> Result<Submission, EngineError> {
        if self.is_busy() {
            return Err(EngineError::Busy);
        }
        if session.current_user().is_none() {
            return Err(EngineError::Unauthenticated);
        }
        match self.form.validate() {
            Ok(input) => {
                self.errors = ValidationErrors::default();
                self.status = EditorStatus::Saving;
                Ok(Submission {
                    mode: self.mode,
                    input,
                })
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(EngineError::Validation(errors))
            }
        }
    }

    /// Unlocks the form after a submission completed.
    pub fn finish_submit(
        &mut self,
        result: Result<Expense, RemoteError>,
    ) -> Result<Expense, EngineError> {
        match result {
            Ok(expense) => {
                self.status = EditorStatus::Idle;
                Ok(expense)
            }
            Err(err) => {
                self.status = EditorStatus::Failed(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Loads the record when editing. Convenience for callers that can await
    /// in place.
    pub async fn load(&mut self, store: &dyn ExpenseStore) {
        if let EditorMode::Edit(id) = self.mode {
            self.status = EditorStatus::Loading;
            let result = load_record(store, id).await;
            self.apply_loaded(result);
        }
    }

    /// Validates, writes and unlocks in one call.
    pub async fn submit(
        &mut self,
        store: &dyn ExpenseStore,
        session: &dyn SessionProvider,
    ) -> Result<Expense, EngineError> {
        let submission = self.begin_submit(session)?;
        let result = submission.execute(store).await;
        self.finish_submit(result)
    }
}
