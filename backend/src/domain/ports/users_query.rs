//! Driving port for reading the authenticated account.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// The account behind a session. A session naming a vanished account is
    /// treated as unauthenticated.
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error>;
}
