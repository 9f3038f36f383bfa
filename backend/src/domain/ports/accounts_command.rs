//! Driving port for account lifecycle operations.
//!
//! Covers signup, login, refresh-token rotation, logout, email confirmation
//! and avatar replacement. Session cookies are an inbound concern; this port
//! only returns the identities and tokens the adapter should persist.

use async_trait::async_trait;

use crate::domain::{
    ConfirmationToken, EmailAddress, Error, LoginCredentials, RefreshToken, Registration, User,
    UserId,
};

use super::AvatarUpload;

/// Identity and refresh token granted by a successful login or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub user: User,
    pub refresh_token: RefreshToken,
}

/// Result of presenting a confirmation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Confirmed,
    AlreadyConfirmed,
}

/// Email-ownership proof presented by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfirmation {
    pub email: EmailAddress,
    pub token: ConfirmationToken,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Create an unconfirmed account and dispatch its confirmation token.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Verify credentials and rotate the stored refresh token.
    async fn login(&self, credentials: LoginCredentials) -> Result<IssuedSession, Error>;

    /// Exchange the currently stored refresh token for a new one. Stale or
    /// unknown tokens are rejected without touching any account.
    async fn refresh(&self, token: RefreshToken) -> Result<IssuedSession, Error>;

    /// Revoke the stored refresh token.
    async fn logout(&self, user_id: &UserId) -> Result<(), Error>;

    async fn confirm_email(&self, confirmation: EmailConfirmation) -> Result<ConfirmationOutcome, Error>;

    /// Upload a new avatar image and store its URL on the account.
    async fn update_avatar(&self, user_id: &UserId, upload: AvatarUpload) -> Result<User, Error>;
}
