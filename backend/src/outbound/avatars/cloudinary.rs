//! Reqwest-backed Cloudinary avatar store.
//!
//! Uses the signed upload API: the request carries an API key, a timestamp
//! and a SHA-256 signature over the sorted parameters plus the API secret.
//! The returned URL points at a 250x250 fill crop of the stored image.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::domain::ports::{AvatarStore, AvatarStoreError, AvatarUpload};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";
const DELIVERY_BASE: &str = "https://res.cloudinary.com";
const AVATAR_TRANSFORMATION: &str = "c_fill,h_250,w_250";
const UPLOAD_FILE_NAME: &str = "avatar";

/// Account credentials for the Cloudinary upload API.
#[derive(Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: Zeroizing<String>,
}

/// [`AvatarStore`] that uploads to Cloudinary, overwriting by public id.
pub struct CloudinaryAvatarStore {
    client: Client,
    credentials: CloudinaryCredentials,
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    version: u64,
}

impl CloudinaryAvatarStore {
    /// Build a store using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        credentials: CloudinaryCredentials,
        timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            credentials,
            clock,
        })
    }

    fn upload_endpoint(&self) -> String {
        format!("{API_BASE}/{}/image/upload", self.credentials.cloud_name)
    }
}

/// Hex SHA-256 over `overwrite`, `public_id` and `timestamp` in alphabetical
/// order, followed by the API secret.
fn sign_upload(public_id: &str, timestamp: i64, api_secret: &str) -> String {
    let to_sign = Zeroizing::new(format!(
        "overwrite=true&public_id={public_id}&timestamp={timestamp}{api_secret}"
    ));
    hex::encode(Sha256::digest(to_sign.as_bytes()))
}

fn delivery_url(cloud_name: &str, version: u64, public_id: &str) -> String {
    format!("{DELIVERY_BASE}/{cloud_name}/image/upload/{AVATAR_TRANSFORMATION}/v{version}/{public_id}")
}

fn map_transport_error(error: reqwest::Error) -> AvatarStoreError {
    AvatarStoreError::unavailable(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> AvatarStoreError {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let preview: String = String::from_utf8_lossy(body)
        .chars()
        .take(PREVIEW_CHAR_LIMIT)
        .collect();
    let message = format!("status {}: {}", status.as_u16(), preview.trim());
    match status {
        StatusCode::BAD_REQUEST | StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNSUPPORTED_MEDIA_TYPE => {
            AvatarStoreError::rejected(message)
        }
        _ => AvatarStoreError::unavailable(message),
    }
}

#[async_trait]
impl AvatarStore for CloudinaryAvatarStore {
    async fn upload(&self, public_id: &str, upload: &AvatarUpload) -> Result<String, AvatarStoreError> {
        let timestamp = self.clock.utc().timestamp();
        let signature = sign_upload(public_id, timestamp, &self.credentials.api_secret);

        let file = Part::bytes(upload.bytes.clone())
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(&upload.content_type)
            .map_err(|err| AvatarStoreError::rejected(err.to_string()))?;
        let form = Form::new()
            .part("file", file)
            .text("api_key", self.credentials.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("public_id", public_id.to_owned())
            .text("overwrite", "true")
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.upload_endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let uploaded: UploadResponse = serde_json::from_slice(body.as_ref()).map_err(|err| {
            AvatarStoreError::unavailable(format!("invalid upload response: {err}"))
        })?;
        Ok(delivery_url(
            &self.credentials.cloud_name,
            uploaded.version,
            &uploaded.public_id,
        ))
    }
}
