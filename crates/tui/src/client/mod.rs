//! HTTP client for the hosted backend: PostgREST for the expenses table and
//! the summary procedure, GoTrue for password sign-in and token refresh.
use std::{
    sync::{Arc, RwLock},
    time::{Duration, Instant},
};

use api_types::{
    expense::{Expense, ExpenseInput},
    summary::ExpenseSummary,
    user::{PasswordGrant, RefreshGrant, TokenResponse, User},
};
use async_trait::async_trait;
use engine::{ExpenseStore, ListRequest, PageResult, RemoteError, RemoteResult, SessionProvider};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

const SUMMARY_PROCEDURE: &str = "get_expense_summary";
/// The access token is refreshed once it is this close to expiry.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.error_description)
            .or(self.msg)
            .or(self.error)
    }
}

#[derive(Debug, Clone)]
struct Session {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<Instant>,
    user: User,
}

impl Session {
    fn from_token(token: TokenResponse, now: Instant) -> Self {
        Self {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: token
                .expires_in
                .and_then(|secs| now.checked_add(Duration::from_secs(secs))),
            user: token.user,
        }
    }

    /// The refresh token, when the access token is about to expire.
    fn refresh_due(&self, now: Instant) -> Option<&str> {
        let expires_at = self.expires_at?;
        if now + REFRESH_MARGIN < expires_at {
            return None;
        }
        self.refresh_token.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    base_url: Url,
    anon_key: String,
    table: String,
    http: reqwest::Client,
    session: Arc<RwLock<Option<Session>>>,
    refreshing: Arc<Mutex<()>>,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut raw = config.supabase_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw).map_err(|err| AppError::Url(err.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            base_url,
            anon_key: config.anon_key.clone(),
            table: config.table.clone(),
            http,
            session: Arc::new(RwLock::new(None)),
            refreshing: Arc::new(Mutex::new(())),
        })
    }

    fn endpoint(&self, path: &str) -> RemoteResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| RemoteError::Server(format!("invalid endpoint {path}: {err}")))
    }

    fn table_url(&self) -> RemoteResult<Url> {
        self.endpoint(&format!("rest/v1/{}", self.table))
    }

    fn session(&self) -> Option<Session> {
        let guard = self
            .session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.clone()
    }

    fn access_token(&self) -> Option<String> {
        self.session().map(|session| session.access_token)
    }

    fn refresh_token_due(&self) -> Option<String> {
        self.session()?
            .refresh_due(Instant::now())
            .map(str::to_string)
    }

    fn store_session(&self, session: Option<Session>) {
        let mut guard = self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = session;
    }

    /// Drops the session if it still holds `token`; a concurrent refresh
    /// may already have replaced it.
    fn drop_session_with(&self, token: &str) {
        let mut guard = self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard
            .as_ref()
            .is_some_and(|session| session.access_token == token)
        {
            tracing::warn!("access token rejected, session dropped");
            *guard = None;
        }
    }

    /// Exchanges the refresh token before the access token expires. A
    /// refused refresh ends the session.
    async fn refresh_if_due(&self) -> RemoteResult<()> {
        if self.refresh_token_due().is_none() {
            return Ok(());
        }
        let _refreshing = self.refreshing.lock().await;
        let Some(refresh_token) = self.refresh_token_due() else {
            return Ok(());
        };

        let url = self.endpoint("auth/v1/token")?;
        let builder = self
            .http
            .post(url)
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshGrant {
                refresh_token: &refresh_token,
            });
        match self.execute(builder, &self.anon_key).await {
            Ok(res) => {
                let token = decode::<TokenResponse>(res).await?;
                self.store_session(Some(Session::from_token(token, Instant::now())));
                tracing::debug!("session refreshed");
                Ok(())
            }
            Err(err @ (RemoteError::Rejected(_) | RemoteError::Unauthorized)) => {
                tracing::warn!("session refresh refused: {err}");
                self.store_session(None);
                Err(RemoteError::Unauthorized)
            }
            Err(err) => {
                tracing::warn!("session refresh failed: {err}");
                Err(err)
            }
        }
    }

    /// Sends with the session's token (or the anon key when signed out),
    /// refreshing it first when due.
    async fn send(&self, builder: RequestBuilder) -> RemoteResult<Response> {
        self.refresh_if_due().await?;
        let token = self.access_token().unwrap_or_else(|| self.anon_key.clone());
        let result = self.execute(builder, &token).await;
        if matches!(result, Err(RemoteError::Unauthorized)) {
            self.drop_session_with(&token);
        }
        result
    }

    /// Adds the api key and `token` as bearer, and maps error statuses.
    async fn execute(&self, builder: RequestBuilder, token: &str) -> RemoteResult<Response> {
        let res = builder
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status();
        let body = res
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
        Err(error_for_status(status, body))
    }

    /// Decodes a `return=representation` body and takes its only row.
    async fn single_row<T: DeserializeOwned>(res: Response) -> RemoteResult<T> {
        let rows = decode::<Vec<T>>(res).await?;
        rows.into_iter().next().ok_or(RemoteError::NotFound)
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> RemoteResult<T> {
    res.json::<T>()
        .await
        .map_err(|err| RemoteError::Decode(err.to_string()))
}

pub fn error_for_status(status: StatusCode, body: String) -> RemoteError {
    match status.as_u16() {
        401 => RemoteError::Unauthorized,
        403 => RemoteError::Forbidden,
        404 | 406 => RemoteError::NotFound,
        409 => RemoteError::Conflict(body),
        400 | 422 => RemoteError::Rejected(body),
        _ => RemoteError::Server(body),
    }
}

/// PostgREST query parameters for a list request.
pub fn list_query(request: &ListRequest) -> Vec<(String, String)> {
    let mut query = vec![("select".to_string(), "*".to_string())];
    if let Some(category) = request.category {
        query.push(("category".to_string(), format!("eq.{}", category.as_str())));
    }
    let direction = if request.ascending { "asc" } else { "desc" };
    query.push((
        "order".to_string(),
        format!("{}.{direction},id.{direction}", request.order_by.column()),
    ));
    query.push(("offset".to_string(), request.offset.to_string()));
    query.push(("limit".to_string(), request.limit.to_string()));
    query
}

/// Total row count from a `Content-Range` header (`0-9/42`, `*/0`).
pub fn parse_content_range(header: Option<&str>) -> Option<u64> {
    let (_, total) = header?.rsplit_once('/')?;
    total.trim().parse().ok()
}

#[async_trait]
impl ExpenseStore for SupabaseClient {
    async fn select(&self, request: &ListRequest) -> RemoteResult<PageResult> {
        let url = self.table_url()?;
        let builder = self
            .http
            .get(url)
            .query(&list_query(request))
            .header("Prefer", "count=exact");
        let res = self.send(builder).await?;
        let header = res
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let records = decode::<Vec<Expense>>(res).await?;
        let total_count = parse_content_range(header.as_deref())
            .unwrap_or(request.offset + records.len() as u64);
        Ok(PageResult {
            records,
            total_count,
        })
    }

    async fn get(&self, id: i64) -> RemoteResult<Expense> {
        let url = self.table_url()?;
        let builder = self
            .http
            .get(url)
            .query(&[("select", "*".to_string()), ("id", format!("eq.{id}"))]);
        let res = self.send(builder).await?;
        Self::single_row(res).await
    }

    async fn insert(&self, input: &ExpenseInput) -> RemoteResult<Expense> {
        let url = self.table_url()?;
        let builder = self
            .http
            .post(url)
            .header("Prefer", "return=representation")
            .json(&[input]);
        let res = self.send(builder).await?;
        Self::single_row(res).await
    }

    async fn update(&self, id: i64, input: &ExpenseInput) -> RemoteResult<Expense> {
        let url = self.table_url()?;
        let builder = self
            .http
            .patch(url)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(input);
        let res = self.send(builder).await?;
        Self::single_row(res).await
    }

    async fn delete(&self, id: i64) -> RemoteResult<()> {
        let url = self.table_url()?;
        let builder = self
            .http
            .delete(url)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation");
        let res = self.send(builder).await?;
        Self::single_row::<Expense>(res).await.map(|_| ())
    }

    async fn summary(&self) -> RemoteResult<ExpenseSummary> {
        let url = self.endpoint(&format!("rest/v1/rpc/{SUMMARY_PROCEDURE}"))?;
        let builder = self.http.post(url).json(&serde_json::json!({}));
        let res = self.send(builder).await?;
        let rows = decode::<Vec<ExpenseSummary>>(res).await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }
}

#[async_trait]
impl SessionProvider for SupabaseClient {
    fn current_user(&self) -> Option<User> {
        self.session().map(|session| session.user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> RemoteResult<User> {
        let url = self.endpoint("auth/v1/token")?;
        let builder = self
            .http
            .post(url)
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password });
        let res = self.execute(builder, &self.anon_key).await?;
        let token = decode::<TokenResponse>(res).await?;
        let user = token.user.clone();
        self.store_session(Some(Session::from_token(token, Instant::now())));
        tracing::info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    async fn sign_out(&self) -> RemoteResult<()> {
        let Some(token) = self.access_token() else {
            return Ok(());
        };
        let result = match self.endpoint("auth/v1/logout") {
            Ok(url) => self.execute(self.http.post(url), &token).await.map(|_| ()),
            Err(err) => Err(err),
        };
        self.store_session(None);
        match &result {
            Ok(()) => tracing::info!("signed out"),
            Err(err) => tracing::warn!("remote sign out failed: {err}"),
        }
        result
    }
}
