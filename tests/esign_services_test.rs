//! Integration tests for the eSign service facades.

use esign_openim::esign::{
    Client, ClientConfig, CreateByFileRequest, DocTemplateFillUrlRequest, SignDoc, SignField,
    SignUrlRequest, Signer,
};
use esign_openim::{RetryPolicy, SdkError};
use serde_json::json;
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    Client::with_config(
        "test_app",
        "test_secret",
        ClientConfig {
            base_url: Some(server.uri()),
            retry: Some(RetryPolicy::default().with_base_delay(Duration::from_millis(1))),
            ..Default::default()
        },
    )
    .unwrap()
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 0,
        "message": "成功",
        "data": data
    }))
}

#[tokio::test]
async fn test_upload_file() {
    let mock_server = MockServer::start().await;
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(b"hello").unwrap();

    Mock::given(method("POST"))
        .and(path("/v3/files/file-upload-url"))
        .and(body_partial_json(json!({
            "contentMd5": "XUFAKrxLKna5cZ2REBfFkg==",
            "contentType": "application/pdf",
            "fileSize": 5
        })))
        .respond_with(ok(json!({
            "fileId": "file-1",
            "uploadUrl": format!("{}/oss/bucket/file-1", mock_server.uri())
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/oss/bucket/file-1"))
        .and(header("Content-Type", "application/pdf"))
        .and(header("Content-MD5", "XUFAKrxLKna5cZ2REBfFkg=="))
        .and(header("Content-Length", "5"))
        .and(body_string("hello"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let uploaded = client.files().upload_file(file.path()).await.unwrap();

    assert_eq!(uploaded.file_id, "file-1");
    assert_eq!(uploaded.file_size, 5);
    assert!(uploaded.file_name.ends_with(".pdf"));
    assert_eq!(uploaded.content_md5, "XUFAKrxLKna5cZ2REBfFkg==");
}

#[tokio::test]
async fn test_upload_rejected_by_storage() {
    let mock_server = MockServer::start().await;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"data").unwrap();

    Mock::given(method("POST"))
        .and(path("/v3/files/file-upload-url"))
        .respond_with(ok(json!({
            "fileId": "file-1",
            "uploadUrl": format!("{}/oss/bucket/file-1", mock_server.uri())
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/oss/bucket/file-1"))
        .respond_with(ResponseTemplate::new(403).set_body_string("SignatureDoesNotMatch"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.files().upload_file(file.path()).await.unwrap_err();
    assert_eq!(err.status_code(), Some(403));
}

#[tokio::test]
async fn test_upload_without_target_is_protocol_error() {
    let mock_server = MockServer::start().await;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"data").unwrap();

    Mock::given(method("POST"))
        .and(path("/v3/files/file-upload-url"))
        .respond_with(ok(json!(null)))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.files().upload_file(file.path()).await.unwrap_err();
    assert!(matches!(err, SdkError::Protocol(ref m) if m.contains("uploadUrl")));
}

#[tokio::test]
async fn test_create_by_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/sign-flow/create-by-file"))
        .and(body_json(json!({
            "docs": [{"fileId": "file-1", "fileName": "contract.pdf"}],
            "signFlowTitle": "Contract",
            "signers": [{
                "signerType": 1,
                "orgId": "org-1",
                "psnId": "psn-1",
                "signOrder": 1,
                "signFields": [{
                    "fileId": 0,
                    "autoExecute": false,
                    "posPage": 1,
                    "posX": 0.5,
                    "posY": 0.5
                }]
            }]
        })))
        .respond_with(ok(json!({"signFlowId": "flow-1"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let created = client
        .sign_flow()
        .create_by_file(CreateByFileRequest {
            docs: vec![SignDoc::new("file-1", "contract.pdf")],
            sign_flow_title: "Contract".to_string(),
            signers: Some(vec![Signer::organization(
                "org-1",
                "psn-1",
                1,
                Some(vec![SignField::new(0, false).at(1, 0.5, 0.5)]),
            )]),
            ..Default::default()
        })
        .await
        .unwrap()
        .into_data()
        .unwrap();

    assert_eq!(created.sign_flow_id, "flow-1");
}

#[tokio::test]
async fn test_create_by_file_requires_docs() {
    let client = Client::new("test_app", "test_secret").unwrap();
    let err = client
        .sign_flow()
        .create_by_file(CreateByFileRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Validation(ref m) if m.contains("docs")));
}

#[tokio::test]
async fn test_sign_url_and_revoke() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/sign-flow/flow-1/signers/psn-1/sign-url"))
        .and(body_json(json!({"urlType": 2, "redirectUrl": "https://example.com/done"})))
        .respond_with(ok(json!({"url": "https://esign/long", "shortUrl": "https://esign/s"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v3/sign-flow/flow-1/revoke"))
        .and(body_json(json!({"operatorId": "psn-1", "revokeReason": "typo"})))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let url = client
        .sign_flow()
        .sign_url(
            "flow-1",
            "psn-1",
            SignUrlRequest {
                url_type: 2,
                redirect_url: Some("https://example.com/done".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .into_data()
        .unwrap();
    assert_eq!(url.short_url.as_deref(), Some("https://esign/s"));

    client
        .sign_flow()
        .revoke("flow-1", "psn-1", Some("typo"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_template_fill_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/doc-templates/doc-template-fill-url"))
        .and(body_json(json!({
            "docTemplateId": "tpl-1",
            "componentFillingtValues": [{"componentKey": "name", "componentValue": "Li Lei"}],
            "editFillingValue": false
        })))
        .respond_with(ok(json!({"docTemplateFillUrl": "https://esign/fill"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let page = client
        .templates()
        .fill_url(DocTemplateFillUrlRequest {
            doc_template_id: "tpl-1".to_string(),
            component_filling_values: Some(vec![
                json!({"componentKey": "name", "componentValue": "Li Lei"}),
            ]),
            edit_filling_value: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.data.unwrap()["docTemplateFillUrl"], "https://esign/fill");
}

#[tokio::test]
async fn test_template_create_url_defaults_to_pdf() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/doc-templates/doc-template-create-url"))
        .and(body_partial_json(json!({
            "docTemplateName": "NDA",
            "fileId": "file-1",
            "docTemplateType": 0
        })))
        .respond_with(ok(json!({
            "docTemplateId": "tpl-1",
            "docTemplateCreateUrl": "https://esign/t"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .templates()
        .create_url(esign_openim::esign::DocTemplateCreateUrlRequest {
            doc_template_name: "NDA".to_string(),
            file_id: "file-1".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_empty_ids_are_rejected_locally() {
    let client = Client::new("test_app", "test_secret").unwrap();

    let err = client.sign_flow().detail("").await.unwrap_err();
    assert!(matches!(err, SdkError::Validation(ref m) if m.contains("signFlowId")));

    let err = client.templates().fill_task_result("tpl-1", " ").await.unwrap_err();
    assert!(matches!(err, SdkError::Validation(ref m) if m.contains("fillTaskId")));

    let err = client
        .auth()
        .organization_identity_info(Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Validation(_)));
}
