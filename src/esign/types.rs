//! Type definitions for the eSign API.
//!
//! Request bodies serialize to the vendor's camelCase JSON; optional fields
//! are omitted when unset. Configuration blocks the SDK does not model
//! (`psnAuthConfig`, `signFlowConfig`, ...) are passed as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Response envelope returned by every eSign endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiResponse<T = Value> {
    /// Business code, `0` on success.
    #[serde(default)]
    pub code: i64,
    /// Vendor message.
    #[serde(default)]
    pub message: String,
    /// Payload, absent for some write endpoints.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Take the payload, failing when the vendor sent none.
    pub fn into_data(self) -> crate::Result<T> {
        self.data
            .ok_or_else(|| crate::SdkError::Protocol("response is missing data".to_string()))
    }
}

/// Request for a personal authentication/authorization page.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonAuthUrlRequest {
    /// Personal real-name verification settings.
    pub psn_auth_config: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorize_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_config: Option<Value>,
    /// Asynchronous notification URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
    /// `ALL` (vendor default), `H5` or `PC`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_type: Option<String>,
}

/// Request for an organization authentication/authorization page.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgAuthUrlRequest {
    /// Organization verification settings.
    pub org_auth_config: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorize_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_type: Option<String>,
    /// App scheme used to reopen the caller's app.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_scheme: Option<String>,
}

/// Authentication page returned by the auth-url endpoints.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUrl {
    #[serde(default)]
    pub auth_flow_id: String,
    #[serde(default)]
    pub auth_url: String,
    #[serde(default)]
    pub auth_short_url: Option<String>,
}

/// Lookup key for a person's identity record. At least one field is required.
#[derive(Debug, Clone, Default)]
pub struct PersonIdentityQuery {
    pub psn_id: Option<String>,
    /// Phone number or email.
    pub psn_account: Option<String>,
    pub psn_id_card_num: Option<String>,
    /// Defaults to `CRED_PSN_CH_IDCARD` when an id-card number is given.
    pub psn_id_card_type: Option<String>,
}

/// Default id-card type for personal lookups.
pub const DEFAULT_PSN_ID_CARD_TYPE: &str = "CRED_PSN_CH_IDCARD";

impl PersonIdentityQuery {
    /// Look up by account id.
    pub fn by_id(psn_id: impl Into<String>) -> Self {
        Self {
            psn_id: Some(psn_id.into()),
            ..Default::default()
        }
    }

    /// Look up by phone number or email.
    pub fn by_account(psn_account: impl Into<String>) -> Self {
        Self {
            psn_account: Some(psn_account.into()),
            ..Default::default()
        }
    }

    pub(crate) fn to_query(&self) -> crate::Result<Vec<(&'static str, String)>> {
        let mut params = Vec::new();
        if let Some(id) = &self.psn_id {
            params.push(("psnId", id.clone()));
        }
        if let Some(account) = &self.psn_account {
            params.push(("psnAccount", account.clone()));
        }
        if let Some(num) = &self.psn_id_card_num {
            params.push(("psnIDCardNum", num.clone()));
            params.push((
                "psnIDCardType",
                self.psn_id_card_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PSN_ID_CARD_TYPE.to_string()),
            ));
        }
        if params.is_empty() {
            return Err(crate::SdkError::Validation(
                "one of psnId, psnAccount or psnIDCardNum is required".to_string(),
            ));
        }
        Ok(params)
    }
}

/// Lookup key for an organization's identity record.
#[derive(Debug, Clone, Default)]
pub struct OrgIdentityQuery {
    pub org_id: Option<String>,
    /// Unified social credit code.
    pub org_id_card_num: Option<String>,
}

impl OrgIdentityQuery {
    pub(crate) fn to_query(&self) -> crate::Result<Vec<(&'static str, String)>> {
        let mut params = Vec::new();
        if let Some(id) = &self.org_id {
            params.push(("orgId", id.clone()));
        }
        if let Some(num) = &self.org_id_card_num {
            params.push(("orgIDCardNum", num.clone()));
        }
        if params.is_empty() {
            return Err(crate::SdkError::Validation(
                "one of orgId or orgIDCardNum is required".to_string(),
            ));
        }
        Ok(params)
    }
}

/// Request for a file upload URL.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadUrlRequest {
    /// Base64-encoded MD5 of the file content.
    pub content_md5: String,
    /// MIME type, e.g. `application/pdf`.
    pub content_type: String,
    pub file_name: String,
    /// Size in bytes.
    pub file_size: u64,
    #[serde(rename = "convertToPDF", skip_serializing_if = "Option::is_none")]
    pub convert_to_pdf: Option<bool>,
}

/// Upload target returned by `file-upload-url`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadUrl {
    pub file_id: String,
    /// Pre-signed URL the file body is PUT to.
    #[serde(alias = "fileUploadUrl")]
    pub upload_url: String,
}

/// A file uploaded with [`FilesClient::upload_file`](super::files::FilesClient::upload_file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_id: String,
    pub file_name: String,
    pub file_size: u64,
    /// Base64-encoded MD5 that was sent with the upload.
    pub content_md5: String,
}

/// Request to create a file by filling a template.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileByTemplateRequest {
    pub template_id: String,
    /// Name of the generated file.
    pub name: String,
    /// Component key to fill value.
    pub simple_form_fields: BTreeMap<String, Value>,
}

/// A document attached to a sign flow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignDoc {
    pub file_id: String,
    pub file_name: String,
}

impl SignDoc {
    /// Create a document reference.
    pub fn new(file_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            file_name: file_name.into(),
        }
    }
}

/// Signer type: individual.
pub const SIGNER_TYPE_PERSON: u8 = 0;
/// Signer type: organization.
pub const SIGNER_TYPE_ORGANIZATION: u8 = 1;

/// A party that signs in a sign flow.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signer {
    /// [`SIGNER_TYPE_PERSON`] or [`SIGNER_TYPE_ORGANIZATION`].
    pub signer_type: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    /// The person, or the organization's operator.
    pub psn_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psn_account: Option<String>,
    pub sign_order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign_fields: Option<Vec<SignField>>,
}

impl Signer {
    /// An individual signer.
    pub fn person(
        psn_id: impl Into<String>,
        psn_account: Option<String>,
        sign_order: u32,
        sign_fields: Option<Vec<SignField>>,
    ) -> Self {
        Self {
            signer_type: SIGNER_TYPE_PERSON,
            org_id: None,
            psn_id: psn_id.into(),
            psn_account,
            sign_order,
            sign_fields,
        }
    }

    /// An organization signer acting through the operator `psn_id`.
    pub fn organization(
        org_id: impl Into<String>,
        psn_id: impl Into<String>,
        sign_order: u32,
        sign_fields: Option<Vec<SignField>>,
    ) -> Self {
        Self {
            signer_type: SIGNER_TYPE_ORGANIZATION,
            org_id: Some(org_id.into()),
            psn_id: psn_id.into(),
            psn_account: None,
            sign_order,
            sign_fields,
        }
    }
}

/// A signature area on one of the flow's documents.
///
/// Coordinates and sizes are fractions of the page (0 to 1).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignField {
    /// Zero-based index into the flow's documents.
    pub file_id: u32,
    pub auto_execute: bool,
    /// One-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl SignField {
    /// A field without a fixed position.
    pub fn new(file_id: u32, auto_execute: bool) -> Self {
        Self {
            file_id,
            auto_execute,
            pos_page: None,
            pos_x: None,
            pos_y: None,
            width: None,
            height: None,
        }
    }

    /// Place the field on a page.
    pub fn at(mut self, pos_page: u32, pos_x: f64, pos_y: f64) -> Self {
        self.pos_page = Some(pos_page);
        self.pos_x = Some(pos_x);
        self.pos_y = Some(pos_y);
        self
    }

    /// Set the field size.
    pub fn sized(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// Request to create a sign flow from uploaded files.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateByFileRequest {
    pub docs: Vec<SignDoc>,
    pub sign_flow_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign_flow_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signers: Option<Vec<Signer>>,
}

/// Request to create a sign flow from a sign template.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBySignTemplateRequest {
    pub sign_template_id: String,
    pub sign_flow_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<Vec<SignDoc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign_flow_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_values: Option<Value>,
}

/// A newly created sign flow.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignFlowCreated {
    pub sign_flow_id: String,
}

/// Options for a signer's signing page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUrlRequest {
    /// 1 for a short link (default), 2 for a long link.
    pub url_type: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_scheme: Option<String>,
    /// Page opened after signing completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl Default for SignUrlRequest {
    fn default() -> Self {
        Self {
            url_type: 1,
            app_scheme: None,
            redirect_url: None,
        }
    }
}

/// Signing page for one signer.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUrl {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub short_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RevokeRequest<'a> {
    pub operator_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoke_reason: Option<&'a str>,
}

/// Request for the template designer page.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocTemplateCreateUrlRequest {
    pub doc_template_name: String,
    /// Base file the template is drawn on.
    pub file_id: String,
    /// 0 for PDF (sent when unset), 1 for HTML.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_template_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_origin_components: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_components_type: Option<Vec<String>>,
    /// Show the "replace base file" button. Field name as the vendor spells it.
    #[serde(rename = "showReplaceFraft", skip_serializing_if = "Option::is_none")]
    pub show_replace_draft: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_component_groups: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_components: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedicated_cloud_id: Option<String>,
}

/// Request for the template editor page.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocTemplateEditUrlRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_origin_components: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_components_type: Option<Vec<String>>,
    #[serde(rename = "showReplaceFraft", skip_serializing_if = "Option::is_none")]
    pub show_replace_draft: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_component_groups: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_components: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer_roles: Option<Vec<String>>,
}

/// Request for the template filling page.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocTemplateFillUrlRequest {
    pub doc_template_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_biz_num: Option<String>,
    /// Prefilled component values. Sent under the key the vendor expects.
    #[serde(
        rename = "componentFillingtValues",
        skip_serializing_if = "Option::is_none"
    )]
    pub component_filling_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_filling_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FillTaskResultRequest<'a> {
    pub doc_template_id: &'a str,
    pub fill_task_id: &'a str,
}
