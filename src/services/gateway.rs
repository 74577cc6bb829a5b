//! Request gateway for the library REST API
//!
//! Every call goes through [`ApiClient::request`], which attaches the JSON content type,
//! resolves the path against the configured base URL and turns non-success responses into
//! [`AppError::Remote`]. There is no retry and no timeout.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
    models::{Book, IssueLoan, Loan, Member, NewBook, NewMember, ReturnLoan},
};

/// Per-call request settings; anything set here overrides the defaults
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            query: Vec::new(),
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    pub fn post<B: Serialize>(body: &B) -> AppResult<Self> {
        Ok(Self {
            method: Method::POST,
            body: Some(serde_json::to_value(body)?),
            ..Self::default()
        })
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// Headers sent with every request unless the caller overrides them
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Health check response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Health {
    pub status: String,
}

/// Operations the desk needs from the library API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryApi: Send + Sync {
    async fn health(&self) -> AppResult<Health>;

    /// List books; an empty query lists everything
    async fn list_books(&self, query: &str) -> AppResult<Vec<Book>>;

    async fn create_book(&self, book: &NewBook) -> AppResult<Book>;

    async fn delete_book(&self, id: i64) -> AppResult<()>;

    async fn list_members(&self) -> AppResult<Vec<Member>>;

    async fn create_member(&self, member: &NewMember) -> AppResult<Member>;

    async fn list_loans(&self) -> AppResult<Vec<Loan>>;

    async fn issue_loan(&self, request: IssueLoan) -> AppResult<Loan>;

    async fn return_loan(&self, request: ReturnLoan) -> AppResult<Loan>;
}

/// HTTP implementation of [`LibraryApi`]
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ApiConfig>,
}

impl ApiClient {
    pub fn new(config: Arc<ApiConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Send one request and decode the JSON response
    pub async fn request<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> AppResult<T> {
        let url = self.config.url(path);

        let mut headers = default_headers();
        headers.extend(options.headers);

        tracing::debug!("{} {}", options.method, url);

        let mut builder = self.http.request(options.method.clone(), &url).headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!("{} {} failed with {}", options.method, url, status);
            return Err(AppError::remote(status, &text));
        }

        tracing::debug!("{} {} -> {}", options.method, url, status);

        // Some endpoints answer 2xx with no content
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(text)?)
    }
}

#[async_trait]
impl LibraryApi for ApiClient {
    async fn health(&self) -> AppResult<Health> {
        self.request("/api/health", RequestOptions::default()).await
    }

    async fn list_books(&self, query: &str) -> AppResult<Vec<Book>> {
        let mut options = RequestOptions::default();
        if !query.is_empty() {
            options = options.with_query("q", query);
        }
        self.request("/api/books", options).await
    }

    async fn create_book(&self, book: &NewBook) -> AppResult<Book> {
        self.request("/api/books", RequestOptions::post(book)?).await
    }

    async fn delete_book(&self, id: i64) -> AppResult<()> {
        let _: serde::de::IgnoredAny = self
            .request(&format!("/api/books/{}", id), RequestOptions::delete())
            .await?;
        Ok(())
    }

    async fn list_members(&self) -> AppResult<Vec<Member>> {
        self.request("/api/members", RequestOptions::default()).await
    }

    async fn create_member(&self, member: &NewMember) -> AppResult<Member> {
        self.request("/api/members", RequestOptions::post(member)?).await
    }

    async fn list_loans(&self) -> AppResult<Vec<Loan>> {
        self.request("/api/loans", RequestOptions::default()).await
    }

    async fn issue_loan(&self, request: IssueLoan) -> AppResult<Loan> {
        self.request("/api/loans/issue", RequestOptions::post(&request)?).await
    }

    async fn return_loan(&self, request: ReturnLoan) -> AppResult<Loan> {
        self.request("/api/loans/return", RequestOptions::post(&request)?).await
    }
}
