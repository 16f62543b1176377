//! File operations.
//!
//! Files are uploaded in two steps: `file-upload-url` registers the file's
//! name, size, type and MD5 and returns a pre-signed URL, then the raw bytes
//! are PUT to that URL. [`FilesClient::upload_file`] does both from a path on
//! disk without loading the file into memory.

use super::client::Client;
use super::path_id;
use super::types::{
    ApiResponse, CreateFileByTemplateRequest, FileUploadUrl, FileUploadUrlRequest, UploadedFile,
};
use crate::error::{Result, SdkError};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use md5::{Digest, Md5};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use serde_json::Value;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;
use tracing::info;

const READ_CHUNK: usize = 64 * 1024;

/// Client for file operations.
///
/// Access via `client.files()`.
pub struct FilesClient {
    client: Client,
}

impl FilesClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Register a file and get the URL its content is uploaded to.
    pub async fn upload_url(
        &self,
        request: FileUploadUrlRequest,
    ) -> Result<ApiResponse<FileUploadUrl>> {
        self.client.post("/v3/files/file-upload-url", &request).await
    }

    /// Upload a local file.
    ///
    /// The MD5 is computed by streaming the file, the MIME type is guessed
    /// from the extension, and the body is streamed to the pre-signed URL.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use esign_openim::esign::Client;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Client::new("app_id", "app_secret")?;
    ///
    ///     let file = client.files().upload_file("contract.pdf").await?;
    ///     println!("Uploaded {} as {}", file.file_name, file.file_id);
    ///     Ok(())
    /// }
    /// ```
    pub async fn upload_file(&self, path: impl AsRef<Path>) -> Result<UploadedFile> {
        let path = path.as_ref();
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) if m.is_file() => m,
            Ok(_) => {
                return Err(SdkError::Validation(format!(
                    "{} is not a regular file",
                    path.display()
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SdkError::Validation(format!(
                    "file not found: {}",
                    path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SdkError::Validation(format!("no file name in {}", path.display())))?;
        let digest = FileDigest::compute(path).await?;
        let content_type = guess_content_type(path);

        let target = self
            .upload_url(FileUploadUrlRequest {
                content_md5: digest.base64.clone(),
                content_type: content_type.to_string(),
                file_name: file_name.clone(),
                file_size: metadata.len(),
                convert_to_pdf: None,
            })
            .await?;

        let target = match target.data {
            Some(FileUploadUrl { file_id, upload_url })
                if !file_id.is_empty() && !upload_url.is_empty() =>
            {
                FileUploadUrl { file_id, upload_url }
            }
            _ => {
                return Err(SdkError::Protocol(
                    "upload url response is missing fileId or uploadUrl".to_string(),
                ));
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        // pre-signed PUT URLs require a sized body
        headers.insert(CONTENT_LENGTH, HeaderValue::from(metadata.len()));
        headers.insert(
            "Content-MD5",
            HeaderValue::from_str(&digest.base64)
                .map_err(|_| SdkError::Protocol("invalid Content-MD5".to_string()))?,
        );

        let file = tokio::fs::File::open(path).await?;
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        self.client.upload(&target.upload_url, body, headers).await?;

        info!(
            file_id = %target.file_id,
            file_name = %file_name,
            size = metadata.len(),
            "File uploaded"
        );

        Ok(UploadedFile {
            file_id: target.file_id,
            file_name,
            file_size: metadata.len(),
            content_md5: digest.base64,
        })
    }

    /// Generate a file by filling a template.
    pub async fn create_by_template(
        &self,
        request: CreateFileByTemplateRequest,
    ) -> Result<ApiResponse<Value>> {
        self.client.post("/v3/files/createByTemplate", &request).await
    }

    /// Get a file's details.
    pub async fn get(&self, file_id: &str) -> Result<ApiResponse<Value>> {
        let id = path_id(file_id, "fileId")?;
        self.client.get(&format!("/v3/files/{id}"), &[]).await
    }

    /// Get a temporary download link for a file.
    pub async fn download_url(&self, file_id: &str) -> Result<ApiResponse<Value>> {
        let id = path_id(file_id, "fileId")?;
        self.client
            .get(&format!("/v3/files/{id}/download-url"), &[])
            .await
    }
}

/// MD5 of a file, in the two encodings the vendor uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    /// Lower-case hex, 32 characters.
    pub hex: String,
    /// Base64 of the raw digest, as sent in `Content-MD5`.
    pub base64: String,
}

impl FileDigest {
    /// Hash a file by streaming it from disk.
    pub async fn compute(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = tokio::fs::File::open(path).await?;
        let mut hasher = Md5::new();
        let mut buf = vec![0u8; READ_CHUNK];
        loop {
            let n = file.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        let digest = hasher.finalize();
        Ok(Self {
            hex: hex::encode(&digest),
            base64: BASE64.encode(&digest),
        })
    }
}

/// MIME type for a file, from its extension.
pub fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "ofd" => "application/ofd",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("a/contract.PDF")), "application/pdf");
        assert_eq!(guess_content_type(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(guess_content_type(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_file_digest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();

        let digest = FileDigest::compute(file.path()).await.unwrap();
        assert_eq!(digest.hex, "5d41402abc4b2a76b9719d911017c592");
        assert_eq!(digest.base64, "XUFAKrxLKna5cZ2REBfFkg==");
    }

    #[tokio::test]
    async fn test_file_digest_spans_chunks() {
        let data = vec![b'x'; READ_CHUNK * 2 + 17];
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&data).unwrap();

        let digest = FileDigest::compute(file.path()).await.unwrap();
        assert_eq!(digest.hex, hex::encode(Md5::digest(&data)));
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let client = Client::new("app", "secret").unwrap();
        let err = client
            .files()
            .upload_file("/definitely/not/here.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Validation(ref m) if m.contains("not found")));
    }
}
