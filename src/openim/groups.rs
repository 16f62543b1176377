//! Group operations.

use super::client::Client;
use super::types::{ApiResponse, GroupInfo};
use crate::error::{Result, SdkError};
use serde::Serialize;
use serde_json::Value;

/// Client for group operations.
///
/// Access via `client.groups()`.
pub struct GroupsClient {
    client: Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateGroupBody<'a> {
    #[serde(rename = "memberUserIDs")]
    member_user_ids: &'a [&'a str],
    #[serde(rename = "adminUserIDs")]
    admin_user_ids: &'a [&'a str],
    #[serde(rename = "ownerUserID")]
    owner_user_id: &'a str,
    group_info: GroupInfo,
}

#[derive(Serialize)]
struct MembersBody<'a> {
    #[serde(rename = "groupID")]
    group_id: &'a str,
    #[serde(flatten)]
    members: Members<'a>,
    reason: &'a str,
}

#[derive(Serialize)]
enum Members<'a> {
    #[serde(rename = "invitedUserIDs")]
    Invited(&'a [&'a str]),
    #[serde(rename = "kickedUserIDs")]
    Kicked(&'a [&'a str]),
}

impl GroupsClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a group owned by `owner_user_id`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign_openim::openim::{Client, GroupInfo};
    /// use esign_openim::MemoryCache;
    /// use std::sync::Arc;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::from_env(Arc::new(MemoryCache::new()))?;
    ///
    ///     let group = client.groups().create("u1", &["u2", "u3"], GroupInfo {
    ///         group_name: "project".to_string(),
    ///         group_type: Some(2),
    ///         ..Default::default()
    ///     }, &[]).await?;
    ///     println!("{:?}", group.data);
    ///     Ok(())
    /// }
    /// ```
    pub async fn create(
        &self,
        owner_user_id: &str,
        member_user_ids: &[&str],
        group_info: GroupInfo,
        admin_user_ids: &[&str],
    ) -> Result<ApiResponse<Value>> {
        require(owner_user_id, "ownerUserID")?;
        self.client
            .post(
                "/group/create_group",
                &CreateGroupBody {
                    member_user_ids,
                    admin_user_ids,
                    owner_user_id,
                    group_info,
                },
            )
            .await
    }

    /// Get information on groups.
    pub async fn groups_info(&self, group_ids: &[&str]) -> Result<ApiResponse<Value>> {
        #[derive(Serialize)]
        struct Body<'a> {
            #[serde(rename = "groupIDs")]
            group_ids: &'a [&'a str],
        }

        self.client
            .post("/group/get_groups_info", &Body { group_ids })
            .await
    }

    /// Change group attributes. `fields` is sent as the request body and must
    /// carry `groupID`.
    pub async fn set_info(&self, fields: Value) -> Result<ApiResponse<Value>> {
        let has_group_id = fields
            .get("groupID")
            .and_then(Value::as_str)
            .is_some_and(|id| !id.is_empty());
        if !has_group_id {
            return Err(SdkError::missing("groupID"));
        }
        self.client.post("/group/set_group_info_ex", &fields).await
    }

    /// Invite users into a group.
    pub async fn invite(
        &self,
        group_id: &str,
        invited_user_ids: &[&str],
        reason: &str,
    ) -> Result<ApiResponse<Value>> {
        require(group_id, "groupID")?;
        self.client
            .post(
                "/group/invite_user_to_group",
                &MembersBody {
                    group_id,
                    members: Members::Invited(invited_user_ids),
                    reason,
                },
            )
            .await
    }

    /// Remove users from a group.
    pub async fn kick(
        &self,
        group_id: &str,
        user_ids: &[&str],
        reason: &str,
    ) -> Result<ApiResponse<Value>> {
        require(group_id, "groupID")?;
        self.client
            .post(
                "/group/kick_group",
                &MembersBody {
                    group_id,
                    members: Members::Kicked(user_ids),
                    reason,
                },
            )
            .await
    }

    /// Dismiss a group, optionally deleting its member records.
    pub async fn dismiss(&self, group_id: &str, delete_member: bool) -> Result<ApiResponse<Value>> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            #[serde(rename = "groupID")]
            group_id: &'a str,
            delete_member: bool,
        }

        require(group_id, "groupID")?;
        self.client
            .post(
                "/group/dismiss_group",
                &Body {
                    group_id,
                    delete_member,
                },
            )
            .await
    }

    /// Hand group ownership to another member.
    pub async fn transfer(
        &self,
        group_id: &str,
        old_owner_user_id: &str,
        new_owner_user_id: &str,
    ) -> Result<ApiResponse<Value>> {
        #[derive(Serialize)]
        struct Body<'a> {
            #[serde(rename = "groupID")]
            group_id: &'a str,
            #[serde(rename = "oldOwnerUserID")]
            old_owner_user_id: &'a str,
            #[serde(rename = "newOwnerUserID")]
            new_owner_user_id: &'a str,
        }

        require(group_id, "groupID")?;
        require(new_owner_user_id, "newOwnerUserID")?;
        self.client
            .post(
                "/group/transfer_group",
                &Body {
                    group_id,
                    old_owner_user_id,
                    new_owner_user_id,
                },
            )
            .await
    }
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.is_empty() {
        return Err(SdkError::missing(field));
    }
    Ok(())
}
