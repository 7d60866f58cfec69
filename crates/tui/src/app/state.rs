//! UI state and its transitions.
//!
//! Nothing in here performs I/O: key presses and task results go in, and
//! the [`Command`]s that must run in the background come out. The
//! [`App`](super::App) executes them on spawned tasks and feeds the results
//! back as [`AppEvent`]s.
use std::time::{Duration, Instant};

use api_types::{
    expense::{Expense, ExpenseCategory},
    user::User,
};
use chrono::NaiveDate;
use engine::{
    Applied, Balance, ConfirmedDelete, DeleteRequest, EditorMode, EditorStatus, EngineError,
    FetchTicket, Fetched, ListController, RecordEditor, RemoteError, SessionProvider, SortField,
    Submission,
};

use crate::ui::keymap::AppAction;

const TOAST_TTL: Duration = Duration::from_secs(4);

/// Results reported back by background tasks.
#[derive(Debug)]
pub enum AppEvent {
    SignedIn(Result<User, RemoteError>),
    SignedOut(Result<(), RemoteError>),
    Page(Fetched),
    /// A list fetch succeeded; views on the same data should refresh.
    DataChanged,
    Balance {
        seq: u64,
        result: Result<Balance, RemoteError>,
    },
    Loaded {
        id: i64,
        result: Result<Expense, RemoteError>,
    },
    Saved(Result<Expense, RemoteError>),
    Deleted(Result<(), EngineError>),
}

impl AppEvent {
    /// The backend no longer accepts the session's token.
    fn is_unauthorized(&self) -> bool {
        let remote = match self {
            Self::Page(fetched) => fetched.result.as_ref().err(),
            Self::Balance { result, .. } => result.as_ref().err(),
            Self::Loaded { result, .. } | Self::Saved(result) => result.as_ref().err(),
            Self::Deleted(Err(EngineError::Unauthenticated)) => return true,
            Self::Deleted(Err(EngineError::Remote(err))) => Some(err),
            _ => None,
        };
        remote == Some(&RemoteError::Unauthorized)
    }
}

/// Work the state asks the app to run in the background.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    SignIn { email: String, password: String },
    SignOut,
    Fetch(FetchTicket),
    /// Sequenced like list fetches; only the latest reply is shown.
    LoadBalance(u64),
    Load(i64),
    Save(Submission),
    Delete(ConfirmedDelete),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    List,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub message: Option<String>,
    pub pending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Date,
    Description,
    Category,
    Amount,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            Self::Date => Self::Description,
            Self::Description => Self::Category,
            Self::Category => Self::Amount,
            Self::Amount => Self::Date,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Date => Self::Amount,
            Self::Description => Self::Date,
            Self::Category => Self::Description,
            Self::Amount => Self::Category,
        }
    }
}

#[derive(Debug)]
pub struct FormView {
    pub editor: RecordEditor,
    pub focus: FormField,
}

impl FormView {
    fn new(mode: EditorMode, today: NaiveDate) -> Self {
        Self {
            editor: RecordEditor::new(mode, today),
            focus: FormField::Date,
        }
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        let form = &mut self.editor.form;
        match self.focus {
            FormField::Date => Some(&mut form.date),
            FormField::Description => Some(&mut form.description),
            FormField::Amount => Some(&mut form.amount),
            FormField::Category => None,
        }
    }

    fn toggle_category(&mut self) {
        let form = &mut self.editor.form;
        form.category = Some(
            form.category
                .map_or(ExpenseCategory::Outcome, ExpenseCategory::toggled),
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub login: LoginState,
    pub user: Option<User>,
    pub list: ListController,
    pub selected: usize,
    pub balance: Option<Balance>,
    pub balance_error: Option<String>,
    balance_seq: u64,
    pub form: Option<FormView>,
    pub confirm: Option<DeleteRequest>,
    pub deleting: bool,
    pub toast: Option<ToastState>,
    pub backend: String,
}

impl AppState {
    pub fn new(list: ListController, email: String, backend: String) -> Self {
        let focus = if email.is_empty() {
            LoginField::Email
        } else {
            LoginField::Password
        };
        Self {
            screen: Screen::Login,
            login: LoginState {
                email,
                password: String::new(),
                focus,
                message: None,
                pending: false,
            },
            user: None,
            list,
            selected: 0,
            balance: None,
            balance_error: None,
            balance_seq: 0,
            form: None,
            confirm: None,
            deleting: false,
            toast: None,
            backend,
        }
    }

    /// Whether plain characters should be typed into a field.
    pub fn accepts_text(&self) -> bool {
        match self.screen {
            Screen::Login => true,
            Screen::Form => self
                .form
                .as_ref()
                .is_some_and(|form| form.focus != FormField::Category),
            Screen::List => false,
        }
    }

    pub fn selected_record(&self) -> Option<&Expense> {
        self.list.record(self.selected)
    }

    pub fn handle_action(
        &mut self,
        action: AppAction,
        session: &dyn SessionProvider,
        today: NaiveDate,
    ) -> Vec<Command> {
        if action == AppAction::Quit {
            return vec![Command::Quit];
        }
        match self.screen {
            Screen::Login => self.login_action(action),
            Screen::List => self.list_action(action, today),
            Screen::Form => self.form_action(action, session),
        }
    }

    fn login_action(&mut self, action: AppAction) -> Vec<Command> {
        if self.login.pending {
            return Vec::new();
        }
        let login = &mut self.login;
        let field = match login.focus {
            LoginField::Email => &mut login.email,
            LoginField::Password => &mut login.password,
        };
        match action {
            AppAction::Input(ch) => field.push(ch),
            AppAction::Backspace => {
                field.pop();
            }
            AppAction::NextField | AppAction::PrevField | AppAction::Up | AppAction::Down => {
                login.focus = match login.focus {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
            }
            AppAction::Submit => {
                let email = login.email.trim();
                if email.is_empty() || login.password.is_empty() {
                    login.message = Some("Enter email and password".to_string());
                    return Vec::new();
                }
                login.pending = true;
                login.message = None;
                return vec![Command::SignIn {
                    email: email.to_string(),
                    password: login.password.clone(),
                }];
            }
            _ => {}
        }
        Vec::new()
    }

    fn list_action(&mut self, action: AppAction, today: NaiveDate) -> Vec<Command> {
        if let Some(request) = self.confirm.take() {
            return match action {
                AppAction::Input('y' | 'Y') => {
                    self.deleting = true;
                    vec![Command::Delete(request.confirm())]
                }
                AppAction::Input('n' | 'N') | AppAction::Cancel => Vec::new(),
                _ => {
                    self.confirm = Some(request);
                    Vec::new()
                }
            };
        }

        match action {
            AppAction::Up | AppAction::Input('k') => {
                self.selected = self.selected.saturating_sub(1);
                Vec::new()
            }
            AppAction::Down | AppAction::Input('j') => {
                if self.selected + 1 < self.list.records().len() {
                    self.selected += 1;
                }
                Vec::new()
            }
            AppAction::Input('f') => {
                let next = self.list.query().category_filter().next();
                self.list.query_mut().set_filter(next);
                self.refetch()
            }
            AppAction::Input(ch @ '1'..='4') => {
                let index = usize::from(ch as u8 - b'1');
                if let Some(field) = SortField::ALL.get(index) {
                    self.list.query_mut().toggle_sort(*field);
                }
                self.refetch()
            }
            AppAction::Input('n') | AppAction::Right => {
                if self.list.next_page() {
                    self.refetch()
                } else {
                    Vec::new()
                }
            }
            AppAction::Input('p') | AppAction::Left => {
                if self.list.prev_page() {
                    self.refetch()
                } else {
                    Vec::new()
                }
            }
            AppAction::Input('r') => self.refetch(),
            AppAction::Input('a') => {
                self.form = Some(FormView::new(EditorMode::Create, today));
                self.screen = Screen::Form;
                Vec::new()
            }
            AppAction::Input('e') | AppAction::Submit => {
                let Some(id) = self.selected_record().map(|record| record.id) else {
                    return Vec::new();
                };
                self.form = Some(FormView::new(EditorMode::Edit(id), today));
                self.screen = Screen::Form;
                vec![Command::Load(id)]
            }
            AppAction::Input('d') => {
                if self.deleting {
                    return Vec::new();
                }
                self.confirm = self
                    .selected_record()
                    .map(|record| DeleteRequest::new(record.id, record.description.clone()));
                Vec::new()
            }
            AppAction::Input('L') => vec![Command::SignOut],
            _ => Vec::new(),
        }
    }

    fn form_action(&mut self, action: AppAction, session: &dyn SessionProvider) -> Vec<Command> {
        let Some(view) = self.form.as_mut() else {
            self.screen = Screen::List;
            return Vec::new();
        };
        let saving = *view.editor.status() == EditorStatus::Saving;

        match action {
            AppAction::Cancel => {
                if !saving {
                    self.close_form();
                }
                Vec::new()
            }
            _ if view.editor.is_busy() => Vec::new(),
            AppAction::NextField | AppAction::Down => {
                view.focus = view.focus.next();
                Vec::new()
            }
            AppAction::PrevField | AppAction::Up => {
                view.focus = view.focus.prev();
                Vec::new()
            }
            AppAction::Left | AppAction::Right | AppAction::Input(' ')
                if view.focus == FormField::Category =>
            {
                view.toggle_category();
                Vec::new()
            }
            AppAction::Input(ch) => {
                if let Some(text) = view.focused_text() {
                    text.push(ch);
                }
                Vec::new()
            }
            AppAction::Backspace => {
                if let Some(text) = view.focused_text() {
                    text.pop();
                }
                Vec::new()
            }
            AppAction::Submit => match view.editor.begin_submit(session) {
                Ok(submission) => vec![Command::Save(submission)],
                Err(EngineError::Validation(_)) => Vec::new(),
                Err(err) => {
                    self.notify(ToastLevel::Error, err.to_string());
                    Vec::new()
                }
            },
            _ => Vec::new(),
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Command> {
        if self.user.is_some() && event.is_unauthorized() {
            tracing::warn!("session rejected by the backend");
            self.end_session();
            self.login.message = Some("Session expired, please sign in again".to_string());
            return Vec::new();
        }

        match event {
            AppEvent::SignedIn(Ok(user)) => {
                tracing::info!(user_id = %user.id, "session started");
                self.user = Some(user);
                self.login.pending = false;
                self.login.password.clear();
                self.login.message = None;
                self.screen = Screen::List;
                self.refetch()
            }
            AppEvent::SignedIn(Err(err)) => {
                self.login.pending = false;
                self.login.message = Some(describe(&err));
                Vec::new()
            }
            AppEvent::SignedOut(result) => {
                if let Err(err) = result {
                    self.notify(
                        ToastLevel::Info,
                        format!("Signed out locally ({})", describe(&err)),
                    );
                }
                self.end_session();
                Vec::new()
            }
            AppEvent::Page(fetched) => match self.list.apply(fetched) {
                Applied::Stale => Vec::new(),
                Applied::Updated => {
                    let len = self.list.records().len();
                    self.selected = self.selected.min(len.saturating_sub(1));
                    Vec::new()
                }
                Applied::OutOfRange => self.refetch(),
                Applied::Failed(err) => {
                    self.selected = 0;
                    self.notify(
                        ToastLevel::Error,
                        format!("Could not load expenses: {}", describe(&err)),
                    );
                    Vec::new()
                }
            },
            AppEvent::DataChanged => {
                self.balance_seq += 1;
                vec![Command::LoadBalance(self.balance_seq)]
            }
            AppEvent::Balance { seq, .. } if seq != self.balance_seq => Vec::new(),
            AppEvent::Balance { result, .. } => {
                match result {
                    Ok(balance) => {
                        self.balance = Some(balance);
                        self.balance_error = None;
                    }
                    Err(err) => self.balance_error = Some(describe(&err)),
                }
                Vec::new()
            }
            AppEvent::Loaded { id, result } => {
                let Some(view) = self.form.as_mut() else {
                    return Vec::new();
                };
                if view.editor.mode() != EditorMode::Edit(id) {
                    return Vec::new();
                }
                let message = result
                    .as_ref()
                    .err()
                    .map(|err| format!("Could not load expense: {}", describe(err)));
                view.editor.apply_loaded(result);
                if let Some(message) = message {
                    self.notify(ToastLevel::Error, message);
                }
                Vec::new()
            }
            AppEvent::Saved(result) => {
                let Some(view) = self.form.as_mut() else {
                    return Vec::new();
                };
                let mode = view.editor.mode();
                match view.editor.finish_submit(result) {
                    Ok(_) => {
                        let message = match mode {
                            EditorMode::Create => "Expense added",
                            EditorMode::Edit(_) => "Expense updated",
                        };
                        self.close_form();
                        self.notify(ToastLevel::Success, message);
                        self.refetch()
                    }
                    Err(err) => {
                        self.notify(ToastLevel::Error, format!("Could not save: {err}"));
                        Vec::new()
                    }
                }
            }
            AppEvent::Deleted(result) => {
                self.deleting = false;
                match result {
                    Ok(()) => {
                        self.notify(ToastLevel::Success, "Expense deleted");
                        self.refetch()
                    }
                    Err(err) => {
                        let message = match &err {
                            EngineError::Remote(remote) => describe(remote),
                            other => other.to_string(),
                        };
                        self.notify(ToastLevel::Error, format!("Could not delete: {message}"));
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Drops the toast once it has expired.
    pub fn tick(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|toast| now >= toast.expires_at) {
            self.toast = None;
        }
    }

    pub fn notify(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn refetch(&mut self) -> Vec<Command> {
        vec![Command::Fetch(self.list.request())]
    }

    /// Back to the login screen with nothing of the previous user left.
    fn end_session(&mut self) {
        self.user = None;
        self.list.reset();
        self.selected = 0;
        self.deleting = false;
        self.balance = None;
        self.balance_error = None;
        self.balance_seq += 1;
        self.form = None;
        self.confirm = None;
        self.screen = Screen::Login;
        self.login.pending = false;
        self.login.focus = LoginField::Password;
    }

    fn close_form(&mut self) {
        self.form = None;
        self.screen = Screen::List;
    }
}

/// User-facing text for a backend failure.
pub fn describe(err: &RemoteError) -> String {
    match err {
        RemoteError::Unauthorized => "Not authorized, please sign in again".to_string(),
        RemoteError::Forbidden => "Not allowed".to_string(),
        RemoteError::NotFound => "Expense not found".to_string(),
        RemoteError::Conflict(message)
        | RemoteError::Rejected(message)
        | RemoteError::Server(message) => message.clone(),
        RemoteError::Transport(message) => format!("Server unreachable: {message}"),
        RemoteError::Decode(_) => "Unexpected response from server".to_string(),
    }
}
