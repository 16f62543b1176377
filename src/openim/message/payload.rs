//! The `send_msg` request body.

use super::content::{ContentType, SessionType};
use crate::error::{Result, SdkError};
use serde::Serialize;
use serde_json::Value;

/// Platform id used when the caller does not pick one.
pub const DEFAULT_SENDER_PLATFORM_ID: i32 = 1;

/// Optional sender and delivery settings for a message.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub sender_nickname: Option<String>,
    pub sender_face_url: Option<String>,
    /// Defaults to [`DEFAULT_SENDER_PLATFORM_ID`].
    pub sender_platform_id: Option<i32>,
    pub is_online_only: bool,
    pub not_offline_push: bool,
    /// Generated when unset.
    pub client_msg_id: Option<String>,
    pub ex: Option<String>,
}

/// A message ready to be sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    #[serde(rename = "sendID")]
    pub send_id: String,
    #[serde(rename = "recvID")]
    pub recv_id: String,
    #[serde(rename = "groupID")]
    pub group_id: String,
    pub sender_nickname: String,
    #[serde(rename = "senderFaceURL")]
    pub sender_face_url: String,
    #[serde(rename = "senderPlatformID")]
    pub sender_platform_id: i32,
    pub content: Value,
    pub content_type: ContentType,
    pub session_type: SessionType,
    pub is_online_only: bool,
    pub not_offline_push: bool,
    #[serde(rename = "clientMsgID")]
    pub client_msg_id: String,
    pub ex: String,
}

impl MessagePayload {
    /// A one-to-one message from `send_id` to `recv_id`.
    pub fn single(
        send_id: impl Into<String>,
        recv_id: impl Into<String>,
        content_type: ContentType,
        content: Value,
        options: SendOptions,
    ) -> Result<Self> {
        let payload = Self::build(
            send_id.into(),
            recv_id.into(),
            String::new(),
            SessionType::Single,
            content_type,
            content,
            options,
        );
        payload.normalized()
    }

    /// A message from `send_id` to the group `group_id`.
    pub fn group(
        send_id: impl Into<String>,
        group_id: impl Into<String>,
        content_type: ContentType,
        content: Value,
        options: SendOptions,
    ) -> Result<Self> {
        let payload = Self::build(
            send_id.into(),
            String::new(),
            group_id.into(),
            SessionType::Group,
            content_type,
            content,
            options,
        );
        payload.normalized()
    }

    fn build(
        send_id: String,
        recv_id: String,
        group_id: String,
        session_type: SessionType,
        content_type: ContentType,
        content: Value,
        options: SendOptions,
    ) -> Self {
        Self {
            send_id,
            recv_id,
            group_id,
            sender_nickname: options.sender_nickname.unwrap_or_default(),
            sender_face_url: options.sender_face_url.unwrap_or_default(),
            sender_platform_id: options
                .sender_platform_id
                .unwrap_or(DEFAULT_SENDER_PLATFORM_ID),
            content,
            content_type,
            session_type,
            is_online_only: options.is_online_only,
            not_offline_push: options.not_offline_push,
            client_msg_id: options.client_msg_id.unwrap_or_default(),
            ex: options.ex.unwrap_or_default(),
        }
    }

    /// Check the addressing and fill in server-facing defaults.
    ///
    /// Single messages are sent with an empty `groupID`, group messages with
    /// an empty `recvID`, and a missing `clientMsgID` is generated.
    pub fn normalized(mut self) -> Result<Self> {
        if self.send_id.is_empty() {
            return Err(SdkError::missing("sendID"));
        }
        if self.content.is_null() {
            return Err(SdkError::missing("content"));
        }
        match self.session_type {
            SessionType::Single => {
                if self.recv_id.is_empty() {
                    return Err(SdkError::missing("recvID"));
                }
                self.group_id.clear();
            }
            SessionType::Group => {
                if self.group_id.is_empty() {
                    return Err(SdkError::missing("groupID"));
                }
                self.recv_id.clear();
            }
        }
        if self.client_msg_id.is_empty() {
            self.client_msg_id = generate_client_msg_id();
        }
        Ok(self)
    }
}

/// 16 random hex characters.
pub fn generate_client_msg_id() -> String {
    hex::encode(&uuid::Uuid::new_v4().as_bytes()[..8])
}
