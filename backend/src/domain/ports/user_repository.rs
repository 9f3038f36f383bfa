//! Port for user account persistence.

use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
        /// Another account already uses this email.
        DuplicateEmail { email: String } =>
            "account email already exists: {email}",
    }
}

/// Account store.
///
/// Lookups and field updates keyed by email return `None` when no account
/// matches; callers decide whether that is an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserPersistenceError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Account whose stored refresh-token digest equals `digest`.
    async fn find_by_refresh_digest(&self, digest: &str) -> Result<Option<User>, UserPersistenceError>;

    /// Insert a new, unconfirmed account.
    async fn create_user(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Replace the stored refresh-token digest. `None` revokes it.
    ///
    /// Returns `false` when the account does not exist.
    async fn set_refresh_token(
        &self,
        id: &UserId,
        token_digest: Option<String>,
    ) -> Result<bool, UserPersistenceError>;

    /// Flag the account as confirmed and discard its confirmation digest.
    async fn mark_confirmed(&self, email: &EmailAddress) -> Result<Option<User>, UserPersistenceError>;

    /// Replace the avatar URL and return the updated account.
    async fn set_avatar(
        &self,
        email: &EmailAddress,
        url: &str,
    ) -> Result<Option<User>, UserPersistenceError>;
}
