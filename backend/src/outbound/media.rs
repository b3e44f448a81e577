//! Image upload adapters.
//!
//! [`CloudinaryUploader`] posts signed multipart requests to Cloudinary's
//! upload API. [`UnconfiguredUploader`] stands in when no credentials are
//! configured and refuses every upload.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use mockable::Clock;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::ports::{ImageFile, ImageUploadError, ImageUploader};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Credentials for one Cloudinary account.
#[derive(Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Reqwest-backed Cloudinary upload adapter.
pub struct CloudinaryUploader {
    client: Client,
    endpoint: String,
    credentials: CloudinaryCredentials,
    clock: Arc<dyn Clock>,
}

impl CloudinaryUploader {
    /// Build an uploader with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        credentials: CloudinaryCredentials,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, reqwest::Error> {
        Self::with_api_base(credentials, DEFAULT_API_BASE, timeout, clock)
    }

    /// Point the uploader at another API base, e.g. a local fake.
    pub fn with_api_base(
        credentials: CloudinaryCredentials,
        api_base: &str,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = format!(
            "{}/{}/auto/upload",
            api_base.trim_end_matches('/'),
            credentials.cloud_name
        );
        Ok(Self {
            client,
            endpoint,
            credentials,
            clock,
        })
    }

    async fn upload_one(&self, file: ImageFile) -> Result<String, ImageUploadError> {
        let timestamp = self.clock.utc().timestamp().to_string();
        let signature = sign(&[("timestamp", timestamp.as_str())], &self.credentials.api_secret);

        let mut part = Part::bytes(file.bytes).file_name(file.file_name.clone());
        if let Some(content_type) = file.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|err| ImageUploadError::rejected(err.to_string()))?;
        }
        let form = Form::new()
            .part("file", part)
            .text("api_key", self.credentials.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|err| ImageUploadError::transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| ImageUploadError::transport(err.to_string()))?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        let decoded: UploadResponse = serde_json::from_slice(&body).map_err(|err| {
            ImageUploadError::rejected(format!("invalid upload response: {err}"))
        })?;
        debug!(file = %file.file_name, "image uploaded");
        Ok(decoded.secure_url)
    }
}

#[async_trait]
impl ImageUploader for CloudinaryUploader {
    async fn upload_all(&self, files: Vec<ImageFile>) -> Result<Vec<String>, ImageUploadError> {
        try_join_all(files.into_iter().map(|file| self.upload_one(file))).await
    }
}

/// Sign upload parameters: sort by name, join as `k=v&k=v`, append the
/// secret and take the hex SHA-256.
fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ImageUploadError {
    let snippet: String = String::from_utf8_lossy(body).chars().take(200).collect();
    if status.is_server_error() {
        ImageUploadError::transport(format!("status {status}: {snippet}"))
    } else {
        ImageUploadError::rejected(format!("status {status}: {snippet}"))
    }
}

/// Uploader used when no image host is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredUploader;

#[async_trait]
impl ImageUploader for UnconfiguredUploader {
    async fn upload_all(&self, _files: Vec<ImageFile>) -> Result<Vec<String>, ImageUploadError> {
        Err(ImageUploadError::not_configured())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn signature_matches_known_digest() {
        assert_eq!(
            sign(&[("timestamp", "1315060510")], "abcd"),
            "5652e549a70bdc03f73a633a23b7d3f3b067d72fff26dd15b25997f46fdf6439"
        );
    }

    #[rstest]
    fn signature_sorts_parameters() {
        let a = sign(&[("timestamp", "1"), ("folder", "x")], "s");
        let b = sign(&[("folder", "x"), ("timestamp", "1")], "s");
        assert_eq!(a, b);
    }

    #[rstest]
    #[case(StatusCode::BAD_REQUEST, false)]
    #[case(StatusCode::BAD_GATEWAY, true)]
    fn status_errors_split_by_class(#[case] status: StatusCode, #[case] transport: bool) {
        let err = map_status_error(status, b"{\"error\":{\"message\":\"nope\"}}");
        assert_eq!(matches!(err, ImageUploadError::Transport { .. }), transport);
    }

    #[rstest]
    #[tokio::test]
    async fn unconfigured_uploader_refuses() {
        let err = UnconfiguredUploader
            .upload_all(Vec::new())
            .await
            .expect_err("not configured");
        assert_eq!(err, ImageUploadError::NotConfigured);
    }

    #[rstest]
    fn credentials_debug_hides_secret() {
        let creds = CloudinaryCredentials {
            cloud_name: "demo".to_owned(),
            api_key: "key".to_owned(),
            api_secret: "very-secret".to_owned(),
        };
        assert!(!format!("{creds:?}").contains("very-secret"));
    }
}
