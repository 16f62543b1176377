//! Integration tests for the OpenIM service facades.

use esign_openim::openim::{
    Client, ClientConfig, ContentType, GroupInfo, MessagePayload, SendOptions, TextContent,
    UserInfo,
};
use esign_openim::{MemoryCache, RetryPolicy, SdkError};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{
    body_json, body_partial_json, header, header_exists, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_admin_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/get_admin_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errCode": 0,
            "errMsg": "",
            "data": {"token": "admin-token", "expireTimeSeconds": 3600}
        })))
        .mount(server)
        .await;
}

fn client_for(server: &MockServer) -> Client {
    Client::with_config(
        server.uri(),
        "imAdmin",
        "openIM123",
        Arc::new(MemoryCache::new()),
        ClientConfig {
            retry: Some(RetryPolicy::default().with_base_delay(Duration::from_millis(1))),
            ..Default::default()
        },
    )
    .unwrap()
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "errCode": 0,
        "errMsg": "",
        "errDlt": "",
        "data": data
    }))
}

#[tokio::test]
async fn test_register_and_send_text() {
    let mock_server = MockServer::start().await;
    mount_admin_token(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/user/user_register"))
        .and(header("token", "admin-token"))
        .and(header_exists("operationID"))
        .and(body_json(json!({
            "users": [
                {"userID": "u1", "nickname": "Alice", "faceURL": ""},
                {"userID": "u2", "nickname": "Bob", "faceURL": ""}
            ]
        })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/msg/send_msg"))
        .and(header("token", "admin-token"))
        .and(body_partial_json(json!({
            "sendID": "u1",
            "recvID": "u2",
            "groupID": "",
            "senderPlatformID": 1,
            "content": {"content": "hello"},
            "contentType": 101,
            "sessionType": 1
        })))
        .respond_with(ok(json!({
            "serverMsgID": "srv-1",
            "clientMsgID": "cli-1",
            "sendTime": 1700000000000i64
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let registered = client
        .users()
        .register(vec![UserInfo::new("u1", "Alice"), UserInfo::new("u2", "Bob")])
        .await
        .unwrap();
    assert_eq!(registered.err_code, 0);

    let sent = client
        .messages()
        .send_text_single("u1", "u2", TextContent::new("hello"), SendOptions::default())
        .await
        .unwrap();
    assert_eq!(sent.err_code, 0);
    let sent = sent.into_data().unwrap();
    assert_eq!(sent.server_msg_id, "srv-1");
    assert_eq!(sent.send_time, 1_700_000_000_000);
}

#[tokio::test]
async fn test_send_group_message_clears_recipient() {
    let mock_server = MockServer::start().await;
    mount_admin_token(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/msg/send_msg"))
        .and(body_partial_json(json!({
            "sendID": "u1",
            "recvID": "",
            "groupID": "g1",
            "sessionType": 2,
            "senderNickname": "Alice"
        })))
        .respond_with(ok(json!({"serverMsgID": "srv-2"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let sent = client
        .messages()
        .send_text_group(
            "u1",
            "g1",
            TextContent::new("hi all"),
            SendOptions {
                sender_nickname: Some("Alice".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .into_data()
        .unwrap();
    assert_eq!(sent.server_msg_id, "srv-2");
}

#[tokio::test]
async fn test_invalid_content_is_rejected_before_sending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ok(json!(null)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .messages()
        .send_text_single("u1", "u2", TextContent::new(""), SendOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Validation(ref m) if m.contains("TextContent.content")));

    let err = MessagePayload::single(
        "u1",
        "",
        ContentType::Text,
        json!({"content": "x"}),
        SendOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SdkError::Validation(ref m) if m.contains("recvID")));
}

#[tokio::test]
async fn test_user_token() {
    let mock_server = MockServer::start().await;
    mount_admin_token(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/auth/get_user_token"))
        .and(body_json(json!({"userID": "u1", "platformID": 5})))
        .respond_with(ok(json!({"token": "user-token", "expireTimeSeconds": 7776000})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let token = client
        .users()
        .user_token("u1", 5)
        .await
        .unwrap()
        .into_data()
        .unwrap();
    assert_eq!(token.token, "user-token");
    assert_eq!(token.expire_time_seconds, Some(7776000));
}

#[tokio::test]
async fn test_group_lifecycle() {
    let mock_server = MockServer::start().await;
    mount_admin_token(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/group/create_group"))
        .and(body_partial_json(json!({
            "ownerUserID": "u1",
            "memberUserIDs": ["u2", "u3"],
            "adminUserIDs": [],
            "groupInfo": {"groupName": "project"}
        })))
        .respond_with(ok(json!({"groupInfo": {"groupID": "g1"}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/group/invite_user_to_group"))
        .and(body_json(json!({"groupID": "g1", "invitedUserIDs": ["u4"], "reason": "welcome"})))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/group/kick_group"))
        .and(body_json(json!({"groupID": "g1", "kickedUserIDs": ["u3"], "reason": ""})))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/group/dismiss_group"))
        .and(body_json(json!({"groupID": "g1", "deleteMember": true})))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let groups = client.groups();

    let created = groups
        .create(
            "u1",
            &["u2", "u3"],
            GroupInfo {
                group_name: "project".to_string(),
                ..Default::default()
            },
            &[],
        )
        .await
        .unwrap();
    assert_eq!(created.data.unwrap()["groupInfo"]["groupID"], "g1");

    groups.invite("g1", &["u4"], "welcome").await.unwrap();
    groups.kick("g1", &["u3"], "").await.unwrap();
    groups.dismiss("g1", true).await.unwrap();

    let err = groups.set_info(json!({"groupName": "x"})).await.unwrap_err();
    assert!(matches!(err, SdkError::Validation(ref m) if m.contains("groupID")));
}

#[tokio::test]
async fn test_sorted_conversation_list_query() {
    let mock_server = MockServer::start().await;
    mount_admin_token(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/conversation/get_sorted_conversation_list"))
        .and(query_param("userID", "u1"))
        .and(query_param("pageNumber", "1"))
        .and(header("token", "admin-token"))
        .respond_with(ok(json!({"conversationTotal": 2, "conversationElems": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let list = client
        .conversations()
        .sorted_list("u1", &[("pageNumber", "1".to_string())])
        .await
        .unwrap();
    assert_eq!(list.data.unwrap()["conversationTotal"], 2);
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let mock_server = MockServer::start().await;
    mount_admin_token(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/user/get_users_info"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/user/get_users_info"))
        .and(body_json(json!({"userIDs": ["u1"]})))
        .respond_with(ok(json!({"users": [{"userID": "u1"}]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let info = client.users().users_info(&["u1"]).await.unwrap();
    assert_eq!(info.data.unwrap()["users"][0]["userID"], "u1");
}

#[tokio::test]
async fn test_business_error_carries_detail() {
    let mock_server = MockServer::start().await;
    mount_admin_token(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/group/transfer_group"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errCode": 1004,
            "errMsg": "RecordNotFoundError",
            "errDlt": "group not found"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .groups()
        .transfer("g9", "u1", "u2")
        .await
        .unwrap_err();

    match err {
        SdkError::Business { code, message, response } => {
            assert_eq!(code, 1004);
            assert_eq!(message, "RecordNotFoundError");
            assert_eq!(response.unwrap()["errDlt"], "group not found");
        }
        other => panic!("expected business error, got {other:?}"),
    }
}
