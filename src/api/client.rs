//! HTTP transport for the AniBoard service.
//!
//! `ApiClient` wraps a shared `reqwest::Client` and composes two
//! interception hooks around every dispatch: a request hook that attaches
//! the bearer token when one is available, and a response hook that
//! invalidates the session when the server answers 401 or 403. The hooks
//! are installed at construction and live exactly as long as the client.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::auth::SessionContext;
use crate::models::{GoogleProfile, LoginResponse, Post, SignupAck, SignupProfile, VerifyResponse};

use super::ApiError;

/// Default base URL for a local AniBoard server
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) catalog requests
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting
const INITIAL_BACKOFF_MS: u64 = 1000;

/// API client for the AniBoard service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionContext>,
}

impl ApiClient {
    /// Create a new API client bound to the shared session context
    pub fn new(session: Arc<SessionContext>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            session,
        })
    }

    /// Point the client at a different server (tests, LAN deployments)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ===== Interception hooks =====

    /// Request hook: attach `Authorization: Bearer <token>` when a token is
    /// available, preferring the in-memory session and falling back to the
    /// persisted slot. No-op when absent.
    fn request_hook(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.current_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Response hook: 401/403 means the credential is no longer accepted.
    /// The session is invalidated as a side effect, then the failure is
    /// propagated to the caller unchanged.
    async fn response_hook(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            debug!(status = %status, "Authorization failure, invalidating session");
            self.session.invalidate();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }
        Ok(response)
    }

    /// Check if a response is successful, returning an error with body if not
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Dispatch a request through both hooks
    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.request_hook(request).send().await?;
        let response = self.response_hook(response).await?;
        Self::check_response(response).await
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(
        response: Response,
        what: &str,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", what, e)))
    }

    // ===== Authentication endpoints =====

    /// `POST /login` with username and password
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = format!("{}/login", self.base_url);
        let body = serde_json::json!({
            "user_name": username,
            "password": password,
        });
        let response = self.execute(self.client.post(&url).json(&body)).await?;
        Self::parse_json(response, "login response").await
    }

    /// `POST /adduser` with the full registration profile
    pub async fn signup(&self, profile: &SignupProfile) -> Result<SignupAck, ApiError> {
        let url = format!("{}/adduser", self.base_url);
        let response = self.execute(self.client.post(&url).json(profile)).await?;
        Self::parse_json(response, "signup response").await
    }

    /// `POST /google-signup` with the provider payload. Response shape is
    /// the same as login: the provider flow hands back a token directly.
    pub async fn google_signup(&self, profile: &GoogleProfile) -> Result<LoginResponse, ApiError> {
        let url = format!("{}/google-signup", self.base_url);
        let response = self.execute(self.client.post(&url).json(profile)).await?;
        Self::parse_json(response, "google signup response").await
    }

    /// `GET /api/verify-token`, sending the candidate token explicitly.
    ///
    /// Bypasses the request hook - the point is to test this exact token,
    /// not whatever the session currently holds. The response hook still
    /// runs, so a rejection clears the session either way.
    pub async fn verify_token(&self, token: &str) -> Result<VerifyResponse, ApiError> {
        let url = format!("{}/api/verify-token", self.base_url);
        let response = self.client.get(&url).bearer_auth(token).send().await?;
        let response = self.response_hook(response).await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, "verify response").await
    }

    /// `POST /api/logout`. Callers treat this as best-effort.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = format!("{}/api/logout", self.base_url);
        self.execute(self.client.post(&url)).await?;
        Ok(())
    }

    // ===== Catalog endpoints =====

    /// Fetch the post listing, optionally narrowed to one category
    pub async fn fetch_posts(&self, category: Option<&str>) -> Result<Vec<Post>, ApiError> {
        let url = format!("{}/posts", self.base_url);
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let mut request = self.client.get(&url);
            if let Some(category) = category {
                request = request.query(&[("category", category)]);
            }

            let response = self.request_hook(request).send().await?;
            let response = self.response_hook(response).await?;

            if response.status().as_u16() == 429 {
                retries += 1;
                if retries > MAX_RATE_LIMIT_RETRIES {
                    return Err(ApiError::RateLimited);
                }
                warn!(url = %url, retry = retries, backoff_ms, "Rate limited, backing off");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms *= 2;
                continue;
            }

            let response = Self::check_response(response).await?;
            let posts: Vec<Post> = Self::parse_json(response, "posts response").await?;
            debug!(count = posts.len(), ?category, "Fetched posts");
            return Ok(posts.into_iter().map(Post::normalized).collect());
        }
    }

    /// URL a post image is served from
    pub fn file_url(&self, picture: &str) -> String {
        format!("{}/file/{}", self.base_url, picture)
    }
}
