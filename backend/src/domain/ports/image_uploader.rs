//! Port for the external image host.

use async_trait::async_trait;

use super::define_port_error;

/// One uploaded file taken from a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

define_port_error! {
    /// Failures raised by image upload adapters.
    pub enum ImageUploadError {
        /// No image host credentials were configured.
        NotConfigured => "image uploads are not configured",
        /// The host could not be reached.
        Transport { message: String } => "image host unreachable: {message}",
        /// The host refused a file.
        Rejected { message: String } => "image host rejected upload: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Upload every file and return their public URLs in input order.
    ///
    /// Either all files are uploaded or an error is returned.
    async fn upload_all(&self, files: Vec<ImageFile>) -> Result<Vec<String>, ImageUploadError>;
}
