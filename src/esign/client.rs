//! eSign API client.
//!
//! The main entry point for the eSign open platform (v3). Every request is
//! signed with the app secret (see [`signature`](super::signature)), sent
//! through the shared [`RetryPolicy`] and decoded from the vendor's
//! `{code, message, data}` envelope.

use super::auth::AuthClient;
use super::files::FilesClient;
use super::sign_flow::SignFlowClient;
use super::signature::{self, StringToSign, CUSTOM_HEADER_PREFIX};
use super::templates::TemplatesClient;
use super::types::ApiResponse;
use crate::error::{Result, SdkError};
use crate::http::{operation_id, sanitize_headers, timestamp_millis};
use crate::retry::RetryPolicy;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

const DEFAULT_BASE_URL: &str = "https://openapi.esign.cn";
const SANDBOX_BASE_URL: &str = "https://smlopenapi.esign.cn";
const SANDBOX_HOST_MARKER: &str = "smlopenapi";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 2;
const MIN_UPLOAD_TIMEOUT_SECS: u64 = 120;

const ACCEPT: &str = "application/json";
const CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// eSign API client.
///
/// # Example
///
/// ```rust,no_run
/// use esign_openim::esign::{Client, CreateByFileRequest, SignDoc, SignField, Signer};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::new("app_id", "app_secret")?;
///
///     let signer = Signer::person("psn-1", None, 1, Some(vec![SignField::new(0, false)]));
///     let flow = client
///         .sign_flow()
///         .create_by_file(CreateByFileRequest {
///             docs: vec![SignDoc::new("file-1", "contract.pdf")],
///             sign_flow_title: "Contract".to_string(),
///             signers: Some(vec![signer]),
///             ..Default::default()
///         })
///         .await?
///         .into_data()?;
///
///     println!("Created sign flow: {}", flow.sign_flow_id);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    pub(crate) http: HttpClient,
    upload_http: HttpClient,
    base_url: String,
    app_id: String,
    app_secret: String,
    retry: RetryPolicy,
}

/// Configuration options for the client.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Base URL for the API (default: production, or sandbox when `sandbox` is set).
    pub base_url: Option<String>,
    /// Use the sandbox environment when no base URL is given.
    pub sandbox: bool,
    /// Total request timeout (default: 30 seconds).
    pub timeout: Option<Duration>,
    /// Connect timeout (default: 2 seconds).
    pub connect_timeout: Option<Duration>,
    /// Retry policy (default: [`RetryPolicy::default`]).
    pub retry: Option<RetryPolicy>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
}

impl Client {
    /// Create a client for the production environment with default settings.
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Result<Self> {
        Self::with_config(app_id, app_secret, ClientConfig::default())
    }

    /// Create a client with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign_openim::esign::{Client, ClientConfig};
    /// use std::time::Duration;
    ///
    /// let client = Client::with_config("app_id", "app_secret", ClientConfig {
    ///     sandbox: true,
    ///     timeout: Some(Duration::from_secs(60)),
    ///     ..Default::default()
    /// }).unwrap();
    /// assert!(client.is_sandbox());
    /// ```
    pub fn with_config(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let app_id = app_id.into();
        let app_secret = app_secret.into();
        if app_id.is_empty() {
            return Err(SdkError::Config("app_id must not be empty".to_string()));
        }
        if app_secret.is_empty() {
            return Err(SdkError::Config("app_secret must not be empty".to_string()));
        }
        HeaderValue::from_str(&app_id)
            .map_err(|_| SdkError::Config("app_id is not a valid header value".to_string()))?;

        let timeout = config
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let connect_timeout = config
            .connect_timeout
            .unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));
        let user_agent = config
            .user_agent
            .unwrap_or_else(|| format!("esign-openim-rust/{}", env!("CARGO_PKG_VERSION")));

        let http = HttpClient::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .user_agent(user_agent.clone())
            .build()?;

        let upload_http = HttpClient::builder()
            .timeout(timeout.max(Duration::from_secs(MIN_UPLOAD_TIMEOUT_SECS)))
            .connect_timeout(connect_timeout)
            .user_agent(user_agent)
            .build()?;

        let base_url = match config.base_url {
            Some(url) => url,
            None if config.sandbox => SANDBOX_BASE_URL.to_string(),
            None => DEFAULT_BASE_URL.to_string(),
        };

        Ok(Self {
            http,
            upload_http,
            base_url: base_url.trim_end_matches('/').to_string(),
            app_id,
            app_secret,
            retry: config.retry.unwrap_or_default(),
        })
    }

    /// Create a client from `ESIGN_APP_ID`, `ESIGN_APP_SECRET` and the
    /// optional `ESIGN_BASE_URL` / `ESIGN_SANDBOX` environment variables.
    pub fn from_env() -> Result<Self> {
        let app_id = require_env("ESIGN_APP_ID")?;
        let app_secret = require_env("ESIGN_APP_SECRET")?;
        let sandbox = std::env::var("ESIGN_SANDBOX")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self::with_config(
            app_id,
            app_secret,
            ClientConfig {
                base_url: std::env::var("ESIGN_BASE_URL").ok().filter(|v| !v.is_empty()),
                sandbox,
                ..Default::default()
            },
        )
    }

    /// Get the base URL for the API.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the app id requests are issued for.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Whether the client talks to the sandbox environment.
    pub fn is_sandbox(&self) -> bool {
        self.base_url.contains(SANDBOX_HOST_MARKER)
    }

    /// Get the retry policy in effect.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Get the client for identity verification and authorization.
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.clone())
    }

    /// Get the client for file operations.
    pub fn files(&self) -> FilesClient {
        FilesClient::new(self.clone())
    }

    /// Get the client for sign-flow operations.
    pub fn sign_flow(&self) -> SignFlowClient {
        SignFlowClient::new(self.clone())
    }

    /// Get the client for document-template operations.
    pub fn templates(&self) -> TemplatesClient {
        TemplatesClient::new(self.clone())
    }

    /// Call an endpoint the SDK does not model.
    ///
    /// `path_and_query` is relative to the base URL. Custom headers are sent
    /// and signed when their names start with `X-Tsign-Open-`; other names
    /// are rejected.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<&serde_json::Value>,
        custom_headers: &[(&str, &str)],
    ) -> Result<ApiResponse<T>> {
        let body = match body {
            Some(body) => serde_json::to_vec(body)?,
            None => Vec::new(),
        };
        self.execute(method, path_and_query, body, custom_headers).await
    }

    /// Make a signed GET request.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>> {
        let path_and_query = if query.is_empty() {
            path.to_string()
        } else {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query)
                .finish();
            format!("{path}?{encoded}")
        };
        self.execute(Method::GET, &path_and_query, Vec::new(), &[]).await
    }

    /// Make a signed POST request with a JSON body.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(body)?;
        self.execute(Method::POST, path, body, &[]).await
    }

    /// Make a signed PUT request with a JSON body.
    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(body)?;
        self.execute(Method::PUT, path, body, &[]).await
    }

    /// Send a file body to a pre-signed upload URL.
    ///
    /// The upload URL carries its own credentials, so the request is not
    /// signed, and a streamed body cannot be replayed, so it is not retried.
    pub(crate) async fn upload(
        &self,
        upload_url: &str,
        body: reqwest::Body,
        headers: HeaderMap,
    ) -> Result<()> {
        let operation_id = operation_id();
        let started = Instant::now();
        info!(%operation_id, method = "PUT", uri = upload_url, "File upload");
        debug!(%operation_id, headers = ?sanitize_headers(&headers), "File upload headers");

        let response = self
            .upload_http
            .put(upload_url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(%operation_id, error = %e, "File upload failed");
                SdkError::Network(e)
            })?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        info!(
            %operation_id,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "File upload response"
        );

        if !(200..300).contains(&status) {
            error!(%operation_id, status, body = %text, "File upload rejected");
            return Err(SdkError::Http { status, body: text });
        }
        Ok(())
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path_and_query: &str,
        body: Vec<u8>,
        custom_headers: &[(&str, &str)],
    ) -> Result<ApiResponse<T>> {
        let custom = validate_custom_headers(custom_headers)?;
        let url = format!("{}{}", self.base_url, path_and_query);
        let operation_id = operation_id();
        let started = Instant::now();

        info!(%operation_id, %method, path = path_and_query, "HTTP request");
        debug!(%operation_id, body = %String::from_utf8_lossy(&body), "HTTP request body");

        let response = self
            .retry
            .execute(&operation_id, || {
                let headers = self.signed_headers(&method, path_and_query, &body, &custom)?;
                debug!(
                    %operation_id,
                    headers = ?sanitize_headers(&headers),
                    "HTTP request headers"
                );

                let mut request = self.http.request(method.clone(), &url).headers(headers);
                if !body.is_empty() {
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

        parse_response(status, text).inspect_err(|e| {
            error!(%operation_id, %method, path = path_and_query, error = %e, "HTTP error");
        })
    }

    /// Build the full signed header set for one attempt.
    fn signed_headers(
        &self,
        method: &Method,
        path_and_query: &str,
        body: &[u8],
        custom: &[(HeaderName, HeaderValue, String)],
    ) -> Result<HeaderMap> {
        let date = signature::gmt_date(chrono::Utc::now());
        let content_md5 = signature::content_md5(body);
        let formatted_headers = signature::format_custom_headers(
            custom.iter().map(|(name, _, value)| (name.as_str(), value.as_str())),
        );
        let path_and_parameters = signature::path_and_parameters(path_and_query);

        let signature = StringToSign {
            method: method.as_str(),
            accept: ACCEPT,
            content_md5: &content_md5,
            content_type: CONTENT_TYPE,
            date: &date,
            headers: &formatted_headers,
            path_and_parameters: &path_and_parameters,
        }
        .sign(&self.app_secret);

        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static(CONTENT_TYPE),
        );
        headers.insert(reqwest::header::DATE, header_value(&date)?);
        headers.insert("X-Tsign-Open-App-Id", header_value(&self.app_id)?);
        headers.insert("X-Tsign-Open-Auth-Mode", HeaderValue::from_static("Signature"));
        headers.insert("X-Tsign-Open-Ca-Timestamp", header_value(&timestamp_millis())?);
        headers.insert("X-Tsign-Open-Ca-Signature", header_value(&signature)?);
        if !content_md5.is_empty() {
            headers.insert("Content-MD5", header_value(&content_md5)?);
        }
        for (name, value, _) in custom {
            headers.insert(name.clone(), value.clone());
        }
        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| SdkError::Validation(format!("invalid header value: {value:?}")))
}

fn validate_custom_headers(
    headers: &[(&str, &str)],
) -> Result<Vec<(HeaderName, HeaderValue, String)>> {
    headers
        .iter()
        .map(|(name, value)| {
            if !name.to_ascii_lowercase().starts_with(CUSTOM_HEADER_PREFIX) {
                return Err(SdkError::Validation(format!(
                    "custom header {name} must start with X-Tsign-Open-"
                )));
            }
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| SdkError::Validation(format!("invalid header name: {name}")))?;
            Ok((header_name, header_value(value)?, (*value).to_string()))
        })
        .collect()
}

/// Decode the vendor envelope and map failures to error kinds.
fn parse_response<T: DeserializeOwned>(status: u16, text: String) -> Result<ApiResponse<T>> {
    if !(200..300).contains(&status) {
        return Err(SdkError::Http { status, body: text });
    }

    let value: serde_json::Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => return Err(SdkError::Http { status, body: text }),
    };

    let code = value.get("code").and_then(serde_json::Value::as_i64).unwrap_or(0);
    if code != 0 {
        let message = value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("business error")
            .to_string();
        return Err(SdkError::Business {
            code,
            message,
            response: Some(value),
        });
    }

    serde_json::from_value(value)
        .map_err(|e| SdkError::Protocol(format!("unexpected response shape: {e}")))
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SdkError::Config(format!("{name} environment variable required")))
}
