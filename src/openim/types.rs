//! Type definitions for the OpenIM REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response envelope returned by every OpenIM endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiResponse<T = Value> {
    /// `0` on success.
    #[serde(rename = "errCode", default)]
    pub err_code: i64,
    #[serde(rename = "errMsg", default)]
    pub err_msg: String,
    /// Error detail.
    #[serde(rename = "errDlt", default)]
    pub err_dlt: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Take the payload, failing when the server sent none.
    pub fn into_data(self) -> crate::Result<T> {
        self.data
            .ok_or_else(|| crate::SdkError::Protocol("response is missing data".to_string()))
    }
}

/// A token issued by `get_admin_token` or `get_user_token`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub token: String,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expire_time_seconds: Option<i64>,
}

/// A user to register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserInfo {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub nickname: String,
    #[serde(rename = "faceURL", default)]
    pub face_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ex: Option<String>,
}

impl UserInfo {
    /// A user with an id and nickname.
    pub fn new(user_id: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            nickname: nickname.into(),
            ..Default::default()
        }
    }
}

/// Fields to change on an existing user. Unset fields are left alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserInfoUpdate {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(rename = "faceURL", skip_serializing_if = "Option::is_none")]
    pub face_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ex: Option<String>,
}

/// Group attributes used when creating a group.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    /// Server-assigned when unset.
    #[serde(rename = "groupID", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub group_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(rename = "faceURL", skip_serializing_if = "Option::is_none")]
    pub face_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ex: Option<String>,
    /// 2 is a working group in current server releases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_type: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub need_verification: Option<i32>,
}

/// Result of `send_msg`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SendMsgResult {
    #[serde(rename = "serverMsgID", default)]
    pub server_msg_id: String,
    #[serde(rename = "clientMsgID", default)]
    pub client_msg_id: String,
    /// Milliseconds since the epoch.
    #[serde(rename = "sendTime", default)]
    pub send_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_field_names() {
        let response: ApiResponse<SendMsgResult> = serde_json::from_value(json!({
            "errCode": 0,
            "errMsg": "",
            "errDlt": "",
            "data": {"serverMsgID": "s1", "clientMsgID": "c1", "sendTime": 1700000000000i64}
        }))
        .unwrap();
        assert_eq!(response.err_code, 0);
        let data = response.into_data().unwrap();
        assert_eq!(data.server_msg_id, "s1");
        assert_eq!(data.send_time, 1_700_000_000_000);
    }

    #[test]
    fn test_user_info_shape() {
        assert_eq!(
            serde_json::to_value(UserInfo::new("u1", "Alice")).unwrap(),
            json!({"userID": "u1", "nickname": "Alice", "faceURL": ""})
        );
    }

    #[test]
    fn test_group_info_shape() {
        let info = GroupInfo {
            group_name: "team".to_string(),
            group_type: Some(2),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(info).unwrap(),
            json!({"groupName": "team", "groupType": 2})
        );
    }
}
