//! Admin token management.
//!
//! The admin token is fetched from `/auth/get_admin_token` and cached under
//! `<prefix><adminUserId>` for 90% of the lifetime the server reports, so a
//! cached token is always retired before the server would reject it.

use super::client::Transport;
use crate::cache::Cache;
use crate::error::{Result, SdkError};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Default prefix of the token cache key.
pub const DEFAULT_TOKEN_CACHE_PREFIX: &str = "openim_token_";

/// Lifetime assumed when the server does not report one.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

const ADMIN_TOKEN_PATH: &str = "/auth/get_admin_token";

/// Cache TTL for a token with the given lifetime: 90%, rounded down, at
/// least one second.
pub fn cache_ttl(expire_time_seconds: i64) -> u64 {
    let ttl = expire_time_seconds.max(0).saturating_mul(9) / 10;
    ttl.max(1) as u64
}

/// Typed view over the injected cache for admin tokens.
#[derive(Clone)]
pub struct TokenCache {
    cache: Arc<dyn Cache>,
    prefix: String,
}

impl TokenCache {
    /// Wrap a cache, namespacing keys with `prefix`.
    pub fn new(cache: Arc<dyn Cache>, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    /// Cache key for an admin user.
    pub fn key(&self, admin_user_id: &str) -> String {
        format!("{}{}", self.prefix, admin_user_id)
    }

    pub async fn get_token(&self, admin_user_id: &str) -> Result<Option<String>> {
        self.cache.get(&self.key(admin_user_id)).await
    }

    pub async fn set_token(
        &self,
        admin_user_id: &str,
        token: &str,
        ttl_seconds: u64,
    ) -> Result<()> {
        self.cache
            .set(&self.key(admin_user_id), token, ttl_seconds)
            .await
    }
}

/// Fetches and caches the admin token.
///
/// Concurrent callers that miss the cache wait for a single fetch.
pub struct TokenManager {
    transport: Transport,
    admin_user_id: String,
    admin_secret: String,
    cache: TokenCache,
    fetch_lock: Mutex<()>,
}

impl TokenManager {
    pub(crate) fn new(
        transport: Transport,
        admin_user_id: String,
        admin_secret: String,
        cache: TokenCache,
    ) -> Self {
        Self {
            transport,
            admin_user_id,
            admin_secret,
            cache,
            fetch_lock: Mutex::new(()),
        }
    }

    /// The admin user the token is issued for.
    pub fn admin_user_id(&self) -> &str {
        &self.admin_user_id
    }

    /// Get a valid token, from the cache when possible.
    pub async fn get_token(&self) -> Result<String> {
        if let Some(token) = self.cached().await? {
            return Ok(token);
        }

        let _guard = self.fetch_lock.lock().await;
        // another caller may have filled the cache while we waited
        if let Some(token) = self.cached().await? {
            return Ok(token);
        }
        self.fetch_and_store().await
    }

    /// Fetch a new token and overwrite the cached one.
    pub async fn refresh_token(&self) -> Result<String> {
        let _guard = self.fetch_lock.lock().await;
        self.fetch_and_store().await
    }

    async fn cached(&self) -> Result<Option<String>> {
        let token = self.cache.get_token(&self.admin_user_id).await?;
        Ok(token.filter(|t| !t.is_empty()))
    }

    async fn fetch_and_store(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Body<'a> {
            secret: &'a str,
            #[serde(rename = "userID")]
            user_id: &'a str,
        }

        let body = serde_json::to_vec(&Body {
            secret: &self.admin_secret,
            user_id: &self.admin_user_id,
        })?;
        let response = self
            .transport
            .send_value(Method::POST, ADMIN_TOKEN_PATH, &[], Some(body), None)
            .await?;

        if response.get("errCode").and_then(Value::as_i64) != Some(0) {
            return Err(SdkError::Protocol(
                "admin token response is missing errCode".to_string(),
            ));
        }
        let data = response.get("data").unwrap_or(&Value::Null);
        let token = data
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| SdkError::Protocol("admin token response is missing token".to_string()))?
            .to_string();
        let lifetime = data
            .get("expireTimeSeconds")
            .and_then(Value::as_i64)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        let ttl = cache_ttl(lifetime);

        self.cache
            .set_token(&self.admin_user_id, &token, ttl)
            .await?;
        info!(admin_user_id = %self.admin_user_id, ttl, "Admin token refreshed");
        debug!(key = %self.cache.key(&self.admin_user_id), "Admin token cached");

        Ok(token)
    }
}
