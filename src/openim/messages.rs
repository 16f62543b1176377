//! Message sending.
//!
//! [`MessagesClient::send_msg`] takes a complete [`MessagePayload`]; the typed
//! helpers build one from a content variant, validating the content first.

use super::client::Client;
use super::message::{
    AtContent, ContentType, CustomContent, FileContent, ImageContent, LocationContent,
    MessageContent, MessagePayload, SendOptions, SoundContent, SystemNotificationContent,
    TextContent, VideoContent,
};
use super::types::{ApiResponse, SendMsgResult};
use crate::error::Result;
use serde_json::Value;

/// Client for message operations.
///
/// Access via `client.messages()`.
pub struct MessagesClient {
    client: Client,
}

impl MessagesClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Send a message.
    pub async fn send_msg(&self, payload: MessagePayload) -> Result<ApiResponse<SendMsgResult>> {
        let payload = payload.normalized()?;
        self.client.post("/msg/send_msg", &payload).await
    }

    /// Send a batch of messages. The body is forwarded unchanged.
    pub async fn batch_send_msg(&self, body: Value) -> Result<ApiResponse<Value>> {
        self.client.post("/msg/batch_send_msg", &body).await
    }

    /// Send raw content to a user.
    pub async fn send_single(
        &self,
        send_id: &str,
        recv_id: &str,
        content_type: ContentType,
        content: Value,
        options: SendOptions,
    ) -> Result<ApiResponse<SendMsgResult>> {
        let payload = MessagePayload::single(send_id, recv_id, content_type, content, options)?;
        self.send_msg(payload).await
    }

    /// Send raw content to a group.
    pub async fn send_group(
        &self,
        send_id: &str,
        group_id: &str,
        content_type: ContentType,
        content: Value,
        options: SendOptions,
    ) -> Result<ApiResponse<SendMsgResult>> {
        let payload = MessagePayload::group(send_id, group_id, content_type, content, options)?;
        self.send_msg(payload).await
    }

    async fn single<C: MessageContent>(
        &self,
        send_id: &str,
        recv_id: &str,
        content: C,
        options: SendOptions,
    ) -> Result<ApiResponse<SendMsgResult>> {
        let value = content.to_value()?;
        self.send_single(send_id, recv_id, C::CONTENT_TYPE, value, options)
            .await
    }

    async fn group<C: MessageContent>(
        &self,
        send_id: &str,
        group_id: &str,
        content: C,
        options: SendOptions,
    ) -> Result<ApiResponse<SendMsgResult>> {
        let value = content.to_value()?;
        self.send_group(send_id, group_id, C::CONTENT_TYPE, value, options)
            .await
    }

    /// Send a text message to a user.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign_openim::openim::{Client, SendOptions, TextContent};
    /// use esign_openim::MemoryCache;
    /// use std::sync::Arc;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::from_env(Arc::new(MemoryCache::new()))?;
    ///
    ///     let sent = client
    ///         .messages()
    ///         .send_text_single("u1", "u2", TextContent::new("hello"), SendOptions {
    ///             sender_nickname: Some("Alice".to_string()),
    ///             ..Default::default()
    ///         })
    ///         .await?
    ///         .into_data()?;
    ///     println!("server id {}", sent.server_msg_id);
    ///     Ok(())
    /// }
    /// ```
    pub async fn send_text_single(
        &self,
        send_id: &str,
        recv_id: &str,
        content: TextContent,
        options: SendOptions,
    ) -> Result<ApiResponse<SendMsgResult>> {
        self.single(send_id, recv_id, content, options).await
    }

    /// Send a text message to a group.
    pub async fn send_text_group(
        &self,
        send_id: &str,
        group_id: &str,
        content: TextContent,
        options: SendOptions,
    ) -> Result<ApiResponse<SendMsgResult>> {
        self.group(send_id, group_id, content, options).await
    }

    /// Send an image to a user.
    pub async fn send_image_single(
        &self,
        send_id: &str,
        recv_id: &str,
        content: ImageContent,
        options: SendOptions,
    ) -> Result<ApiResponse<SendMsgResult>> {
        self.single(send_id, recv_id, content, options).await
    }

    /// Send an image to a group.
    pub async fn send_image_group(
        &self,
        send_id: &str,
        group_id: &str,
        content: ImageContent,
        options: SendOptions,
    ) -> Result<ApiResponse<SendMsgResult>> {
        self.group(send_id, group_id, content, options).await
    }

    /// Send a voice clip to a user.
    pub async fn send_sound_single(
        &self,
        send_id: &str,
        recv_id: &str,
        content: SoundContent,
        options: SendOptions,
    ) -> Result<ApiResponse<SendMsgResult>> {
        self.single(send_id, recv_id, content, options).await
    }

    /// Send a video to a user.
    pub async fn send_video_single(
        &self,
        send_id: &str,
        recv_id: &str,
        content: VideoContent,
        options: SendOptions,
    ) -> Result<ApiResponse<SendMsgResult>> {
        self.single(send_id, recv_id, content, options).await
    }

    /// Send a file to a user.
    pub async fn send_file_single(
        &self,
        send_id: &str,
        recv_id: &str,
        content: FileContent,
        options: SendOptions,
    ) -> Result<ApiResponse<SendMsgResult>> {
        self.single(send_id, recv_id, content, options).await
    }

    /// Send a location to a user.
    pub async fn send_location_single(
        &self,
        send_id: &str,
        recv_id: &str,
        content: LocationContent,
        options: SendOptions,
    ) -> Result<ApiResponse<SendMsgResult>> {
        self.single(send_id, recv_id, content, options).await
    }

    /// Mention members in a group.
    pub async fn send_at_group(
        &self,
        send_id: &str,
        group_id: &str,
        content: AtContent,
        options: SendOptions,
    ) -> Result<ApiResponse<SendMsgResult>> {
        self.group(send_id, group_id, content, options).await
    }

    /// Send application-defined content to a user.
    pub async fn send_custom_single(
        &self,
        send_id: &str,
        recv_id: &str,
        content: CustomContent,
        options: SendOptions,
    ) -> Result<ApiResponse<SendMsgResult>> {
        self.single(send_id, recv_id, content, options).await
    }

    /// Post a system notification to a group.
    pub async fn send_system_group(
        &self,
        send_id: &str,
        group_id: &str,
        content: SystemNotificationContent,
        options: SendOptions,
    ) -> Result<ApiResponse<SendMsgResult>> {
        self.group(send_id, group_id, content, options).await
    }
}
