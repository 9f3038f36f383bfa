//! Port supplying the avatar assigned to new accounts.

use crate::domain::EmailAddress;

/// Derives a default avatar reference from an account email.
///
/// `None` leaves the account without an avatar.
#[cfg_attr(test, mockall::automock)]
pub trait DefaultAvatarProvider: Send + Sync {
    fn avatar_for(&self, email: &EmailAddress) -> Option<String>;
}

/// Provider that never assigns an avatar.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDefaultAvatar;

impl DefaultAvatarProvider for NoDefaultAvatar {
    fn avatar_for(&self, _email: &EmailAddress) -> Option<String> {
        None
    }
}
