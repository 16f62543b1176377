//! Conversation queries.

use super::client::Client;
use super::types::ApiResponse;
use crate::error::{Result, SdkError};
use serde_json::Value;

/// Client for conversation operations.
///
/// Access via `client.conversations()`.
pub struct ConversationsClient {
    client: Client,
}

impl ConversationsClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get a user's conversations, most recent first.
    ///
    /// `extra` is appended to the query after `userID`, e.g. pagination or
    /// conversation-id filters.
    pub async fn sorted_list(
        &self,
        user_id: &str,
        extra: &[(&str, String)],
    ) -> Result<ApiResponse<Value>> {
        if user_id.is_empty() {
            return Err(SdkError::missing("userID"));
        }
        let mut query = Vec::with_capacity(extra.len() + 1);
        query.push(("userID", user_id.to_string()));
        query.extend(extra.iter().filter(|(k, _)| *k != "userID").cloned());
        self.client
            .get("/conversation/get_sorted_conversation_list", &query)
            .await
    }
}
