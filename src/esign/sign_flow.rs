//! Sign-flow operations.
//!
//! A sign flow bundles documents and signers. The usual sequence is
//! create, optionally add signers, start, hand out sign URLs, then poll the
//! detail or wait for the callback and fetch the signed files.

use super::client::Client;
use super::{path_id, require_id};
use super::types::{
    ApiResponse, CreateByFileRequest, CreateBySignTemplateRequest, RevokeRequest, SignFlowCreated,
    SignUrl, SignUrlRequest, Signer,
};
use crate::error::{Result, SdkError};
use serde::Serialize;
use serde_json::Value;

/// Client for sign-flow operations.
///
/// Access via `client.sign_flow()`.
pub struct SignFlowClient {
    client: Client,
}

impl SignFlowClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a sign flow from uploaded files.
    pub async fn create_by_file(
        &self,
        request: CreateByFileRequest,
    ) -> Result<ApiResponse<SignFlowCreated>> {
        if request.docs.is_empty() {
            return Err(SdkError::missing("docs"));
        }
        self.client
            .post("/v3/sign-flow/create-by-file", &request)
            .await
    }

    /// Create a sign flow from a sign template.
    pub async fn create_by_sign_template(
        &self,
        request: CreateBySignTemplateRequest,
    ) -> Result<ApiResponse<SignFlowCreated>> {
        require_id(&request.sign_template_id, "signTemplateId")?;
        self.client
            .post("/v3/sign-flow/create-by-sign-template", &request)
            .await
    }

    /// Add signers to a flow that has not started.
    pub async fn add_signers(
        &self,
        sign_flow_id: &str,
        signers: Vec<Signer>,
    ) -> Result<ApiResponse<Value>> {
        #[derive(Serialize)]
        struct Body {
            signers: Vec<Signer>,
        }

        let id = path_id(sign_flow_id, "signFlowId")?;
        if signers.is_empty() {
            return Err(SdkError::missing("signers"));
        }
        self.client
            .post(&format!("/v3/sign-flow/{id}/signers"), &Body { signers })
            .await
    }

    /// Start a flow.
    pub async fn start(&self, sign_flow_id: &str) -> Result<ApiResponse<Value>> {
        let id = path_id(sign_flow_id, "signFlowId")?;
        self.client
            .put(&format!("/v3/sign-flow/{id}/start"), &serde_json::json!({}))
            .await
    }

    /// Get the signing page for one signer.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign_openim::esign::{Client, SignUrlRequest};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new("app_id", "app_secret")?;
    ///
    ///     let url = client
    ///         .sign_flow()
    ///         .sign_url("flow-1", "psn-1", SignUrlRequest::default())
    ///         .await?
    ///         .into_data()?;
    ///     println!("Sign at {}", url.short_url.unwrap_or(url.url));
    ///     Ok(())
    /// }
    /// ```
    pub async fn sign_url(
        &self,
        sign_flow_id: &str,
        signer_id: &str,
        request: SignUrlRequest,
    ) -> Result<ApiResponse<SignUrl>> {
        let id = path_id(sign_flow_id, "signFlowId")?;
        let signer = path_id(signer_id, "signerId")?;
        self.client
            .post(
                &format!("/v3/sign-flow/{id}/signers/{signer}/sign-url"),
                &request,
            )
            .await
    }

    /// Get a flow's details.
    pub async fn detail(&self, sign_flow_id: &str) -> Result<ApiResponse<Value>> {
        let id = path_id(sign_flow_id, "signFlowId")?;
        self.client.get(&format!("/v3/sign-flow/{id}"), &[]).await
    }

    /// Revoke a flow.
    pub async fn revoke(
        &self,
        sign_flow_id: &str,
        operator_id: &str,
        revoke_reason: Option<&str>,
    ) -> Result<ApiResponse<Value>> {
        let id = path_id(sign_flow_id, "signFlowId")?;
        let operator_id = require_id(operator_id, "operatorId")?;
        self.client
            .put(
                &format!("/v3/sign-flow/{id}/revoke"),
                &RevokeRequest {
                    operator_id,
                    revoke_reason,
                },
            )
            .await
    }

    /// Get download links for the signed documents of a finished flow.
    pub async fn signed_files(&self, sign_flow_id: &str) -> Result<ApiResponse<Value>> {
        let id = path_id(sign_flow_id, "signFlowId")?;
        self.client
            .get(&format!("/v3/sign-flow/{id}/signed-files"), &[])
            .await
    }
}
