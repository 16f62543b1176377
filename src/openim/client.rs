//! OpenIM server REST client.
//!
//! Every business call carries the admin token (header `token`) and an
//! `operationID`. Tokens come from the [`TokenManager`], which keeps them in
//! the injected [`Cache`].

use super::conversations::ConversationsClient;
use super::groups::GroupsClient;
use super::messages::MessagesClient;
use super::token::{TokenCache, TokenManager, DEFAULT_TOKEN_CACHE_PREFIX};
use super::types::ApiResponse;
use super::users::UsersClient;
use crate::cache::Cache;
use crate::error::{Result, SdkError};
use crate::http::{operation_id, sanitize_headers, timestamp_millis};
use crate::retry::RetryPolicy;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

const DEFAULT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 2;

/// OpenIM API client.
///
/// # Example
///
/// ```rust,no_run
/// use esign_openim::openim::{Client, TextContent};
/// use esign_openim::MemoryCache;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::new(
///         "http://127.0.0.1:10002",
///         "imAdmin",
///         "openIM123",
///         Arc::new(MemoryCache::new()),
///     )?;
///
///     let sent = client
///         .messages()
///         .send_text_single("u1", "u2", TextContent::new("hello"), Default::default())
///         .await?
///         .into_data()?;
///     println!("Sent {}", sent.server_msg_id);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    transport: Transport,
    tokens: Arc<TokenManager>,
}

/// Configuration options for the client.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Total request timeout (default: 5 seconds).
    pub timeout: Option<Duration>,
    /// Connect timeout (default: 2 seconds).
    pub connect_timeout: Option<Duration>,
    /// Retry policy (default: [`RetryPolicy::default`]).
    pub retry: Option<RetryPolicy>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Prefix of the admin-token cache key (default: `openim_token_`).
    pub token_cache_prefix: Option<String>,
}

impl Client {
    /// Create a client with default settings.
    pub fn new(
        base_url: impl Into<String>,
        admin_user_id: impl Into<String>,
        admin_secret: impl Into<String>,
        cache: Arc<dyn Cache>,
    ) -> Result<Self> {
        Self::with_config(
            base_url,
            admin_user_id,
            admin_secret,
            cache,
            ClientConfig::default(),
        )
    }

    /// Create a client with custom configuration.
    pub fn with_config(
        base_url: impl Into<String>,
        admin_user_id: impl Into<String>,
        admin_secret: impl Into<String>,
        cache: Arc<dyn Cache>,
        config: ClientConfig,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let admin_user_id = admin_user_id.into();
        let admin_secret = admin_secret.into();
        if base_url.is_empty() {
            return Err(SdkError::Config("base_url must not be empty".to_string()));
        }
        if admin_user_id.is_empty() {
            return Err(SdkError::Config("admin_user_id must not be empty".to_string()));
        }
        if admin_secret.is_empty() {
            return Err(SdkError::Config("admin_secret must not be empty".to_string()));
        }

        let http = HttpClient::builder()
            .timeout(
                config
                    .timeout
                    .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            )
            .connect_timeout(
                config
                    .connect_timeout
                    .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            )
            .user_agent(
                config
                    .user_agent
                    .unwrap_or_else(|| format!("esign-openim-rust/{}", env!("CARGO_PKG_VERSION"))),
            )
            .build()?;

        let transport = Transport {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: config.retry.unwrap_or_default(),
        };
        let token_cache = TokenCache::new(
            cache,
            config
                .token_cache_prefix
                .unwrap_or_else(|| DEFAULT_TOKEN_CACHE_PREFIX.to_string()),
        );
        let tokens = TokenManager::new(transport.clone(), admin_user_id, admin_secret, token_cache);

        Ok(Self {
            transport,
            tokens: Arc::new(tokens),
        })
    }

    /// Create a client from `OPEN_IM_API_URL`, `OPEN_IM_APP_ID` (the admin
    /// user id) and `OPEN_IM_APP_SECRET`.
    pub fn from_env(cache: Arc<dyn Cache>) -> Result<Self> {
        Self::new(
            require_env("OPEN_IM_API_URL")?,
            require_env("OPEN_IM_APP_ID")?,
            require_env("OPEN_IM_APP_SECRET")?,
            cache,
        )
    }

    /// Get the base URL for the API.
    pub fn base_url(&self) -> &str {
        &self.transport.base_url
    }

    /// Get the admin-token manager.
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Get the client for user operations.
    pub fn users(&self) -> UsersClient {
        UsersClient::new(self.clone())
    }

    /// Get the client for message operations.
    pub fn messages(&self) -> MessagesClient {
        MessagesClient::new(self.clone())
    }

    /// Get the client for group operations.
    pub fn groups(&self) -> GroupsClient {
        GroupsClient::new(self.clone())
    }

    /// Get the client for conversation operations.
    pub fn conversations(&self) -> ConversationsClient {
        ConversationsClient::new(self.clone())
    }

    /// Make an authenticated POST request with a JSON body.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let token = self.tokens.get_token().await?;
        let body = serde_json::to_vec(body)?;
        self.transport
            .send(Method::POST, path, &[], Some(body), Some(&token))
            .await
    }

    /// Make an authenticated GET request.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>> {
        let token = self.tokens.get_token().await?;
        self.transport
            .send(Method::GET, path, query, None, Some(&token))
            .await
    }
}

/// Pooled HTTP client plus the pieces every OpenIM request shares.
#[derive(Clone)]
pub(crate) struct Transport {
    http: HttpClient,
    base_url: String,
    retry: RetryPolicy,
}

impl Transport {
    /// Send one call through the retry policy and decode the envelope.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
        token: Option<&str>,
    ) -> Result<ApiResponse<T>> {
        let value = self.send_value(method, path, query, body, token).await?;
        decode(value)
    }

    /// Send one call and return the raw envelope once status and `errCode`
    /// have been checked.
    pub(crate) async fn send_value(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
        token: Option<&str>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let operation_id = operation_id();
        let headers = request_headers(token)?;
        let started = Instant::now();

        info!(%operation_id, %method, path, "HTTP request");
        debug!(
            %operation_id,
            headers = ?sanitize_headers(&headers),
            query = ?query,
            body = %body.as_deref().map(String::from_utf8_lossy).unwrap_or_default(),
            "HTTP request details"
        );

        let response = self
            .retry
            .execute(&operation_id, || {
                let mut headers = headers.clone();
                // operationID identifies the attempt on the server side
                let operation = HeaderValue::from_str(&timestamp_millis())
                    .map_err(|_| SdkError::Protocol("invalid operationID".to_string()))?;
                headers.insert("operationID", operation);

                let mut request = self.http.request(method.clone(), &url).headers(headers);
                if !query.is_empty() {
                    request = request.query(query);
                }
                if let Some(body) = &body {
                    request = request.body(body.clone());
                }
                Ok(request)
            })
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        info!(
            %operation_id,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "HTTP response"
        );
        debug!(%operation_id, body = %text, "HTTP response body");

        parse_envelope(status, text).inspect_err(|e| {
            error!(%operation_id, %method, path, error = %e, "HTTP error");
        })
    }
}

fn request_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(token) = token {
        headers.insert(
            "token",
            HeaderValue::from_str(token)
                .map_err(|_| SdkError::Protocol("token is not a valid header value".to_string()))?,
        );
    }
    Ok(headers)
}

/// Check the status and `errCode` of an OpenIM envelope.
fn parse_envelope(status: u16, text: String) -> Result<Value> {
    if !(200..300).contains(&status) {
        return Err(SdkError::Http { status, body: text });
    }

    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => return Err(SdkError::Http { status, body: text }),
    };

    let code = value.get("errCode").and_then(Value::as_i64).unwrap_or(0);
    if code != 0 {
        let message = value
            .get("errMsg")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or("unknown error")
            .to_string();
        return Err(SdkError::Business {
            code,
            message,
            response: Some(value),
        });
    }
    Ok(value)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<ApiResponse<T>> {
    serde_json::from_value(value)
        .map_err(|e| SdkError::Protocol(format!("unexpected response shape: {e}")))
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SdkError::Config(format!("{name} environment variable required")))
}
