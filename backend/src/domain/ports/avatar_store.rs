//! Port for hosting uploaded avatar images.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by avatar hosting adapters.
    pub enum AvatarStoreError {
        /// No image host is configured or reachable.
        Unavailable { message: String } => "avatar store unavailable: {message}",
        /// The host refused the upload.
        Rejected { message: String } => "avatar upload rejected: {message}",
    }
}

/// Image bytes received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Uploads an image under a stable public id and returns its hosted URL.
///
/// Uploading twice with the same `public_id` replaces the earlier image.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvatarStore: Send + Sync {
    async fn upload(&self, public_id: &str, upload: &AvatarUpload) -> Result<String, AvatarStoreError>;
}

/// Store used when no image host credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredAvatarStore;

#[async_trait]
impl AvatarStore for UnconfiguredAvatarStore {
    async fn upload(&self, _public_id: &str, _upload: &AvatarUpload) -> Result<String, AvatarStoreError> {
        Err(AvatarStoreError::unavailable("avatar uploads are not configured"))
    }
}
