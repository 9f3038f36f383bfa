//! Account use-cases: signup, login, token rotation, confirmation and avatars.
//!
//! Implements [`AccountsCommand`] and [`UsersQuery`]. Secrets handed to
//! clients (refresh and confirmation tokens) are stored only as digests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountsCommand, AvatarStore, AvatarStoreError, AvatarUpload, ConfirmationNotifier,
    ConfirmationOutcome, DefaultAvatarProvider, EmailConfirmation, IssuedSession,
    PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository, UsersQuery,
};
use crate::domain::{
    ConfirmationToken, Error, LoginCredentials, NewUser, RefreshToken, Registration, User, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";
const INVALID_REFRESH_TOKEN: &str = "invalid refresh token";
const VERIFICATION_ERROR: &str = "verification error";
const LOGIN_REQUIRED: &str = "login required";

/// Largest accepted avatar upload, in bytes.
pub const AVATAR_MAX_BYTES: usize = 5 * 1024 * 1024;
/// Folder prefix for avatar public ids on the image host.
pub const AVATAR_FOLDER: &str = "contacts";

/// Collaborators of [`AccountsService`] other than the user repository.
#[derive(Clone)]
pub struct AccountsServiceDeps {
    pub hasher: Arc<dyn PasswordHasher>,
    pub default_avatar: Arc<dyn DefaultAvatarProvider>,
    pub avatars: Arc<dyn AvatarStore>,
    pub notifier: Arc<dyn ConfirmationNotifier>,
}

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountsService<U> {
    users: Arc<U>,
    deps: AccountsServiceDeps,
}

impl<U> AccountsService<U> {
    /// Service over `users`; see [`AccountsServiceDeps`] for the rest.
    pub fn new(users: Arc<U>, deps: AccountsServiceDeps) -> Self {
        Self { users, deps }
    }
}

impl<U> AccountsService<U>
where
    U: UserRepository,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateEmail { .. } => Self::account_exists(),
        }
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        Error::internal(error.to_string())
    }

    fn map_avatar_error(error: AvatarStoreError) -> Error {
        match error {
            AvatarStoreError::Unavailable { message } => {
                Error::service_unavailable(format!("avatar store unavailable: {message}"))
            }
            AvatarStoreError::Rejected { message } => {
                Error::invalid_request(format!("avatar upload rejected: {message}"))
                    .with_details(json!({ "field": "avatar", "code": "upload_rejected" }))
            }
        }
    }

    fn account_exists() -> Error {
        Error::conflict("Account already exists").with_details(json!({
            "field": "email",
            "code": "duplicate_email",
        }))
    }

    async fn load_session_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::unauthorized(LOGIN_REQUIRED))
    }

    async fn issue_session(&self, mut user: User) -> Result<IssuedSession, Error> {
        let refresh_token = RefreshToken::issue(user.id);
        let digest = refresh_token.digest();
        let stored = self
            .users
            .set_refresh_token(&user.id, Some(digest.clone()))
            .await
            .map_err(Self::map_user_error)?;
        if !stored {
            return Err(Error::unauthorized(LOGIN_REQUIRED));
        }
        user.refresh_token_digest = Some(digest);
        Ok(IssuedSession {
            user,
            refresh_token,
        })
    }

    fn validate_upload(upload: &AvatarUpload) -> Result<(), Error> {
        if !upload.content_type.starts_with("image/") {
            return Err(Error::invalid_request("avatar must be an image")
                .with_details(json!({ "field": "avatar", "code": "unsupported_media_type" })));
        }
        if upload.bytes.is_empty() {
            return Err(Error::invalid_request("avatar must not be empty")
                .with_details(json!({ "field": "avatar", "code": "empty" })));
        }
        if upload.bytes.len() > AVATAR_MAX_BYTES {
            return Err(Error::invalid_request("avatar is too large").with_details(json!({
                "field": "avatar",
                "code": "too_large",
                "maxBytes": AVATAR_MAX_BYTES,
            })));
        }
        Ok(())
    }
}

#[async_trait]
impl<U> AccountsCommand for AccountsService<U>
where
    U: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(Self::map_user_error)?;
        if existing.is_some() {
            return Err(Self::account_exists());
        }

        let password_hash = self
            .deps
            .hasher
            .hash(registration.password())
            .await
            .map_err(Self::map_hash_error)?;
        let token = ConfirmationToken::generate();
        let new_user = NewUser {
            username: registration.username().clone(),
            email: registration.email().clone(),
            password_hash,
            avatar: self.deps.default_avatar.avatar_for(registration.email()),
            confirmation_token_digest: Some(token.digest()),
        };
        let user = self
            .users
            .create_user(&new_user)
            .await
            .map_err(Self::map_user_error)?;
        info!(user_id = %user.id, "account registered");

        // Delivery failures do not roll back the account.
        if let Err(error) = self
            .deps
            .notifier
            .send_confirmation(&user.email, &user.username, &token)
            .await
        {
            warn!(user_id = %user.id, %error, "confirmation delivery failed");
        }
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<IssuedSession, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;

        let verified = self
            .deps
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .await
            .map_err(Self::map_hash_error)?;
        if !verified {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        if !user.confirmed {
            return Err(Error::unauthorized("email not confirmed"));
        }

        let session = self.issue_session(user).await?;
        info!(user_id = %session.user.id, "login succeeded");
        Ok(session)
    }

    async fn refresh(&self, token: RefreshToken) -> Result<IssuedSession, Error> {
        // The `{user_id}.` prefix is client-supplied; only the digest lookup
        // identifies the account, and an unknown token changes nothing.
        let user = self
            .users
            .find_by_refresh_digest(&token.digest())
            .await
            .map_err(Self::map_user_error)?
            .filter(|user| user.id == token.user_id())
            .ok_or_else(|| {
                warn!(claimed_user_id = %token.user_id(), "unknown refresh token presented");
                Error::unauthorized(INVALID_REFRESH_TOKEN)
            })?;

        self.issue_session(user).await
    }

    async fn logout(&self, user_id: &UserId) -> Result<(), Error> {
        self.users
            .set_refresh_token(user_id, None)
            .await
            .map_err(Self::map_user_error)?;
        info!(user_id = %user_id, "logged out");
        Ok(())
    }

    async fn confirm_email(&self, confirmation: EmailConfirmation) -> Result<ConfirmationOutcome, Error> {
        let EmailConfirmation { email, token } = confirmation;
        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::invalid_request(VERIFICATION_ERROR))?;
        if user.confirmed {
            return Ok(ConfirmationOutcome::AlreadyConfirmed);
        }

        let valid = user
            .confirmation_token_digest
            .as_deref()
            .is_some_and(|digest| token.matches(digest));
        if !valid {
            return Err(Error::invalid_request(VERIFICATION_ERROR));
        }

        let confirmed = self
            .users
            .mark_confirmed(&email)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        info!(user_id = %confirmed.id, "email confirmed");
        Ok(ConfirmationOutcome::Confirmed)
    }

    async fn update_avatar(&self, user_id: &UserId, upload: AvatarUpload) -> Result<User, Error> {
        Self::validate_upload(&upload)?;
        let user = self.load_session_user(user_id).await?;

        let public_id = format!("{AVATAR_FOLDER}/{}", user.username);
        let url = self
            .deps
            .avatars
            .upload(&public_id, &upload)
            .await
            .map_err(Self::map_avatar_error)?;
        let updated = self
            .users
            .set_avatar(&user.email, &url)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        info!(user_id = %updated.id, "avatar updated");
        Ok(updated)
    }
}

#[async_trait]
impl<U> UsersQuery for AccountsService<U>
where
    U: UserRepository,
{
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.load_session_user(user_id).await
    }
}

#[cfg(test)]
#[path = "accounts_service_tests.rs"]
mod tests;
