//! Opaque secrets handed to clients: refresh and email-confirmation tokens.
//!
//! Only SHA-256 digests of these secrets are persisted. Digests are compared
//! in constant time.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::UserId;

const SECRET_BYTES: usize = 32;

fn random_secret() -> Zeroizing<String> {
    let mut bytes = Zeroizing::new([0_u8; SECRET_BYTES]);
    rand::thread_rng().fill_bytes(bytes.as_mut_slice());
    Zeroizing::new(hex::encode(bytes.as_slice()))
}

/// Hex-encoded SHA-256 of `secret`.
pub fn digest_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Compare a presented secret against a stored digest.
pub fn secret_matches_digest(secret: &str, stored_digest: &str) -> bool {
    let presented = digest_secret(secret);
    presented.len() == stored_digest.len()
        && presented
            .bytes()
            .zip(stored_digest.bytes())
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Why a presented refresh token could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefreshTokenError {
    #[error("refresh token is malformed")]
    Malformed,
}

/// Refresh token of the form `"{user_id}.{secret}"`.
///
/// The whole string is digested for storage. The user prefix is only a claim
/// and is checked against the account the digest resolves to.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken {
    user_id: UserId,
    raw: Zeroizing<String>,
}

impl RefreshToken {
    /// Mint a fresh token for `user_id`.
    pub fn issue(user_id: UserId) -> Self {
        let secret = random_secret();
        Self {
            user_id,
            raw: Zeroizing::new(format!("{user_id}.{}", secret.as_str())),
        }
    }

    /// Parse a token presented by a client.
    pub fn parse(raw: &str) -> Result<Self, RefreshTokenError> {
        let raw = raw.trim();
        let (prefix, secret) = raw.split_once('.').ok_or(RefreshTokenError::Malformed)?;
        let id = prefix
            .parse::<i32>()
            .map_err(|_| RefreshTokenError::Malformed)?;
        let user_id = UserId::new(id).map_err(|_| RefreshTokenError::Malformed)?;
        if secret.len() != SECRET_BYTES * 2 || !secret.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RefreshTokenError::Malformed);
        }
        Ok(Self {
            user_id,
            raw: Zeroizing::new(raw.to_owned()),
        })
    }

    /// Account id claimed by the prefix. Unverified until the digest matches.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// Digest persisted on the user row.
    pub fn digest(&self) -> String {
        digest_secret(self.as_str())
    }

    /// Constant-time comparison against a stored digest.
    pub fn matches(&self, stored_digest: &str) -> bool {
        secret_matches_digest(self.as_str(), stored_digest)
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshToken")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// Single-use secret mailed to a new account to prove email ownership.
#[derive(Clone, PartialEq, Eq)]
pub struct ConfirmationToken(Zeroizing<String>);

impl ConfirmationToken {
    /// Fresh random hex secret.
    pub fn generate() -> Self {
        Self(random_secret())
    }

    /// Token taken from a confirmation link, trimmed.
    pub fn from_raw(raw: &str) -> Self {
        Self(Zeroizing::new(raw.trim().to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn digest(&self) -> String {
        digest_secret(self.as_str())
    }

    pub fn matches(&self, stored_digest: &str) -> bool {
        secret_matches_digest(self.as_str(), stored_digest)
    }
}

impl fmt::Debug for ConfirmationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConfirmationToken(..)")
    }
}
