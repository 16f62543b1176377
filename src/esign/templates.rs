//! Document templates.

use super::client::Client;
use super::{path_id, require_id};
use super::types::{
    ApiResponse, DocTemplateCreateUrlRequest, DocTemplateEditUrlRequest,
    DocTemplateFillUrlRequest, FillTaskResultRequest,
};
use crate::error::Result;
use serde_json::Value;

/// Client for document-template operations.
///
/// Access via `client.templates()`.
pub struct TemplatesClient {
    client: Client,
}

impl TemplatesClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get the page for designing a new template on top of an uploaded file.
    ///
    /// `doc_template_type` is sent as `0` (PDF) when unset.
    pub async fn create_url(
        &self,
        mut request: DocTemplateCreateUrlRequest,
    ) -> Result<ApiResponse<Value>> {
        require_id(&request.doc_template_name, "docTemplateName")?;
        require_id(&request.file_id, "fileId")?;
        request.doc_template_type.get_or_insert(0);
        self.client
            .post("/v3/doc-templates/doc-template-create-url", &request)
            .await
    }

    /// Get the page for editing an existing template.
    pub async fn edit_url(
        &self,
        doc_template_id: &str,
        request: DocTemplateEditUrlRequest,
    ) -> Result<ApiResponse<Value>> {
        let id = path_id(doc_template_id, "docTemplateId")?;
        self.client
            .post(
                &format!("/v3/doc-templates/{id}/doc-template-edit-url"),
                &request,
            )
            .await
    }

    /// Get the page for filling a template.
    pub async fn fill_url(&self, request: DocTemplateFillUrlRequest) -> Result<ApiResponse<Value>> {
        require_id(&request.doc_template_id, "docTemplateId")?;
        self.client
            .post("/v3/doc-templates/doc-template-fill-url", &request)
            .await
    }

    /// Get a template and its components.
    pub async fn components(&self, doc_template_id: &str) -> Result<ApiResponse<Value>> {
        let id = path_id(doc_template_id, "docTemplateId")?;
        self.client
            .get(&format!("/v3/doc-templates/{id}"), &[])
            .await
    }

    /// Get the result of a fill task.
    pub async fn fill_task_result(
        &self,
        doc_template_id: &str,
        fill_task_id: &str,
    ) -> Result<ApiResponse<Value>> {
        let request = FillTaskResultRequest {
            doc_template_id: require_id(doc_template_id, "docTemplateId")?,
            fill_task_id: require_id(fill_task_id, "fillTaskId")?,
        };
        self.client
            .post("/v3/doc-templates/fill-task-result", &request)
            .await
    }
}
