//! Gravatar-backed default avatars.
//!
//! The URL depends only on the normalised email, so it can be computed at
//! signup without a network call.

use sha2::{Digest, Sha256};

use crate::domain::EmailAddress;
use crate::domain::ports::DefaultAvatarProvider;

const GRAVATAR_BASE: &str = "https://www.gravatar.com/avatar";
const FALLBACK_STYLE: &str = "identicon";

/// [`DefaultAvatarProvider`] returning a Gravatar identicon URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct GravatarDefaultAvatar;

impl DefaultAvatarProvider for GravatarDefaultAvatar {
    fn avatar_for(&self, email: &EmailAddress) -> Option<String> {
        let normalised = email.as_str().trim().to_lowercase();
        let hash = hex::encode(Sha256::digest(normalised.as_bytes()));
        Some(format!("{GRAVATAR_BASE}/{hash}?d={FALLBACK_STYLE}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn avatar(raw: &str) -> String {
        let email = EmailAddress::new(raw).expect("valid email");
        GravatarDefaultAvatar
            .avatar_for(&email)
            .expect("gravatar always yields a URL")
    }

    #[rstest]
    fn url_uses_sha256_of_the_normalised_email() {
        let expected_hash = hex::encode(Sha256::digest(b"myemailaddress@example.com"));

        let url = avatar("MyEmailAddress@example.com ");

        assert_eq!(expected_hash.len(), 64);
        assert_eq!(
            url,
            format!("https://www.gravatar.com/avatar/{expected_hash}?d=identicon")
        );
    }

    #[rstest]
    fn case_variants_share_an_avatar() {
        assert_eq!(avatar("Ada@Example.com"), avatar("ada@example.com"));
    }
}
