//! Identity verification and authorization.
//!
//! This module provides the AuthClient for obtaining real-name verification
//! pages and querying verified identities of persons and organizations.

use super::client::Client;
use super::path_id;
use super::types::{
    ApiResponse, AuthUrl, OrgAuthUrlRequest, OrgIdentityQuery, PersonAuthUrlRequest,
    PersonIdentityQuery,
};
use crate::error::Result;
use serde_json::Value;

/// Client for identity verification operations.
///
/// Access via `client.auth()`.
pub struct AuthClient {
    client: Client,
}

impl AuthClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get a personal verification and authorization page.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign_openim::esign::{Client, PersonAuthUrlRequest};
    /// use serde_json::json;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new("app_id", "app_secret")?;
    ///
    ///     let page = client.auth().person_auth_url(PersonAuthUrlRequest {
    ///         psn_auth_config: json!({"psnAccount": "13800000000"}),
    ///         notify_url: Some("https://example.com/esign/notify".to_string()),
    ///         ..Default::default()
    ///     }).await?.into_data()?;
    ///
    ///     println!("Open {} (flow {})", page.auth_url, page.auth_flow_id);
    ///     Ok(())
    /// }
    /// ```
    pub async fn person_auth_url(
        &self,
        request: PersonAuthUrlRequest,
    ) -> Result<ApiResponse<AuthUrl>> {
        self.client.post("/v3/psn-auth-url", &request).await
    }

    /// Get an organization verification and authorization page.
    pub async fn organization_auth_url(
        &self,
        request: OrgAuthUrlRequest,
    ) -> Result<ApiResponse<AuthUrl>> {
        self.client.post("/v3/org-auth-url", &request).await
    }

    /// Get the details of an authentication flow.
    pub async fn auth_flow_detail(&self, auth_flow_id: &str) -> Result<ApiResponse<Value>> {
        let id = path_id(auth_flow_id, "authFlowId")?;
        self.client.get(&format!("/v3/auth-flow/{id}"), &[]).await
    }

    /// Query a person's verified identity.
    ///
    /// Fails with a validation error before any request when the query has
    /// no lookup key.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign_openim::esign::{Client, PersonIdentityQuery};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new("app_id", "app_secret")?;
    ///
    ///     let info = client
    ///         .auth()
    ///         .person_identity_info(PersonIdentityQuery::by_account("13800000000"))
    ///         .await?;
    ///     println!("{:?}", info.data);
    ///     Ok(())
    /// }
    /// ```
    pub async fn person_identity_info(
        &self,
        query: PersonIdentityQuery,
    ) -> Result<ApiResponse<Value>> {
        let params = query.to_query()?;
        self.client.get("/v3/persons/identity-info", &params).await
    }

    /// Query an organization's verified identity.
    pub async fn organization_identity_info(
        &self,
        query: OrgIdentityQuery,
    ) -> Result<ApiResponse<Value>> {
        let params = query.to_query()?;
        self.client
            .get("/v3/organizations/identity-info", &params)
            .await
    }
}
