//! User operations.

use super::client::Client;
use super::types::{ApiResponse, TokenData, UserInfo, UserInfoUpdate};
use crate::error::{Result, SdkError};
use serde::Serialize;
use serde_json::Value;

/// Client for user operations.
///
/// Access via `client.users()`.
pub struct UsersClient {
    client: Client,
}

impl UsersClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Issue a token for a user on a platform (1 iOS, 2 Android, 3 Windows, 5 web, ...).
    pub async fn user_token(
        &self,
        user_id: &str,
        platform_id: i32,
    ) -> Result<ApiResponse<TokenData>> {
        #[derive(Serialize)]
        struct Body<'a> {
            #[serde(rename = "userID")]
            user_id: &'a str,
            #[serde(rename = "platformID")]
            platform_id: i32,
        }

        if user_id.is_empty() {
            return Err(SdkError::missing("userID"));
        }
        self.client
            .post("/auth/get_user_token", &Body { user_id, platform_id })
            .await
    }

    /// Get profile information for users.
    pub async fn users_info(&self, user_ids: &[&str]) -> Result<ApiResponse<Value>> {
        #[derive(Serialize)]
        struct Body<'a> {
            #[serde(rename = "userIDs")]
            user_ids: &'a [&'a str],
        }

        self.client
            .post("/user/get_users_info", &Body { user_ids })
            .await
    }

    /// Register users.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign_openim::openim::{Client, UserInfo};
    /// use esign_openim::MemoryCache;
    /// use std::sync::Arc;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::from_env(Arc::new(MemoryCache::new()))?;
    ///
    ///     client
    ///         .users()
    ///         .register(vec![UserInfo::new("u1", "Alice"), UserInfo::new("u2", "Bob")])
    ///         .await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn register(&self, users: Vec<UserInfo>) -> Result<ApiResponse<Value>> {
        #[derive(Serialize)]
        struct Body {
            users: Vec<UserInfo>,
        }

        if users.is_empty() {
            return Err(SdkError::missing("users"));
        }
        if users.iter().any(|u| u.user_id.is_empty()) {
            return Err(SdkError::missing("users[].userID"));
        }
        self.client
            .post("/user/user_register", &Body { users })
            .await
    }

    /// Update a user's profile.
    pub async fn update_info_ex(&self, update: UserInfoUpdate) -> Result<ApiResponse<Value>> {
        #[derive(Serialize)]
        struct Body {
            #[serde(rename = "userInfo")]
            user_info: UserInfoUpdate,
        }

        if update.user_id.is_empty() {
            return Err(SdkError::missing("userInfo.userID"));
        }
        self.client
            .post("/user/update_user_info_ex", &Body { user_info: update })
            .await
    }
}
