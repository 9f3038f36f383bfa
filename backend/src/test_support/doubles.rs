//! Lightweight doubles for the account service's collaborators.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{
    AvatarStore, AvatarStoreError, AvatarUpload, ConfirmationNotifier, ConfirmationNotifierError,
    DefaultAvatarProvider, PasswordHashError, PasswordHasher,
};
use crate::domain::{ConfirmationToken, EmailAddress};

const PLAIN_PREFIX: &str = "plain$";

/// Reversible "hasher" that keeps tests fast. Never use outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPasswordHasher;

#[async_trait]
impl PasswordHasher for PlainPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("{PLAIN_PREFIX}{password}"))
    }

    async fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
        let stored = stored_hash
            .strip_prefix(PLAIN_PREFIX)
            .ok_or_else(|| PasswordHashError::malformed_hash("missing plain$ prefix"))?;
        Ok(stored == password)
    }
}

/// A confirmation captured by [`RecordingConfirmationNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentConfirmation {
    pub email: EmailAddress,
    pub username: String,
    pub token: String,
}

/// Notifier that keeps every confirmation it is asked to send.
#[derive(Default)]
pub struct RecordingConfirmationNotifier {
    sent: Mutex<Vec<SentConfirmation>>,
}

impl RecordingConfirmationNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentConfirmation> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Raw token most recently sent to `email`.
    pub fn token_for(&self, email: &str) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .find(|sent| sent.email.as_str() == email)
            .map(|sent| sent.token)
    }
}

#[async_trait]
impl ConfirmationNotifier for RecordingConfirmationNotifier {
    async fn send_confirmation(
        &self,
        email: &EmailAddress,
        username: &str,
        token: &ConfirmationToken,
    ) -> Result<(), ConfirmationNotifierError> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(SentConfirmation {
                email: email.clone(),
                username: username.to_owned(),
                token: token.as_str().to_owned(),
            });
        Ok(())
    }
}

/// Avatar store returning `https://avatars.test/{public_id}`.
#[derive(Default)]
pub struct RecordingAvatarStore {
    uploads: Mutex<Vec<(String, AvatarUpload)>>,
}

impl RecordingAvatarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> Vec<(String, AvatarUpload)> {
        self.uploads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl AvatarStore for RecordingAvatarStore {
    async fn upload(&self, public_id: &str, upload: &AvatarUpload) -> Result<String, AvatarStoreError> {
        self.uploads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((public_id.to_owned(), upload.clone()));
        Ok(format!("https://avatars.test/{public_id}"))
    }
}

/// Default avatar provider returning the same URL for every account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDefaultAvatar(pub String);

impl DefaultAvatarProvider for FixedDefaultAvatar {
    fn avatar_for(&self, _email: &EmailAddress) -> Option<String> {
        Some(self.0.clone())
    }
}
