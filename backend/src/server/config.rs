//! Application settings and the HTTP server configuration derived from them.
//!
//! Settings layer defaults, `CONTACTS_*` environment variables and CLI flags
//! through OrthoConfig. Session toggles are validated per build mode: release
//! builds reject anything unsafe, debug builds warn and fall back.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use url::Url;
use zeroize::{Zeroize, Zeroizing};

use contacts_backend::outbound::avatars::CloudinaryCredentials;
use contacts_backend::outbound::persistence::{DbPool, PoolConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
/// `Key::derive_from` panics below this many bytes of master key.
const DERIVE_MIN_LEN: usize = 32;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings.
    Debug,
    /// Release builds require valid, safe session settings.
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while validating settings.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("CONTACTS_DATABASE_URL is required")]
    MissingDatabaseUrl,
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidValue {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("CONTACTS_SESSION_SAME_SITE=None requires CONTACTS_SESSION_COOKIE_SECURE=true")]
    InsecureSameSiteNone,
    #[error("CONTACTS_SESSION_ALLOW_EPHEMERAL must be false in release builds")]
    EphemeralNotAllowed,
}

/// Configuration for the contacts backend binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONTACTS")]
pub struct AppSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Externally reachable base URL, used in confirmation links.
    pub public_base_url: Option<String>,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark the session cookie `Secure`. Defaults to true.
    pub session_cookie_secure: Option<bool>,
    /// `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
    /// Allow a generated session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
}

/// Session settings derived from [`AppSettings`].
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

impl AppSettings {
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidValue {
            name: "CONTACTS_BIND_ADDR",
            value: raw.to_owned(),
            expected: "host:port",
        })
    }

    pub fn public_base_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL);
        Url::parse(raw).map_err(|_| SettingsError::InvalidValue {
            name: "CONTACTS_PUBLIC_BASE_URL",
            value: raw.to_owned(),
            expected: "absolute URL",
        })
    }

    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let max_size = self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE);
        Ok(PoolConfig::new(self.database_url()?).with_max_size(max_size))
    }

    /// Cloudinary credentials, when all three values are set.
    pub fn cloudinary_credentials(&self) -> Option<CloudinaryCredentials> {
        match (
            &self.cloudinary_cloud_name,
            &self.cloudinary_api_key,
            &self.cloudinary_api_secret,
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryCredentials {
                cloud_name: cloud_name.clone(),
                api_key: api_key.clone(),
                api_secret: Zeroizing::new(api_secret.clone()),
            }),
            (None, None, None) => None,
            _ => {
                warn!("incomplete Cloudinary settings; avatar uploads disabled");
                None
            }
        }
    }

    fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH))
    }

    /// Validate the session toggles and load the signing key.
    pub fn session_settings(&self, mode: BuildMode) -> Result<SessionSettings, SettingsError> {
        let cookie_secure = self.session_cookie_secure.unwrap_or(true);
        let same_site = self.same_site(mode, cookie_secure)?;
        if self.session_allow_ephemeral && !mode.is_debug() {
            return Err(SettingsError::EphemeralNotAllowed);
        }
        let key = load_session_key(&self.session_key_file(), mode, self.session_allow_ephemeral)?;
        Ok(SessionSettings {
            key,
            cookie_secure,
            same_site,
        })
    }

    fn same_site(&self, mode: BuildMode, cookie_secure: bool) -> Result<SameSite, SettingsError> {
        let default_same_site = if mode.is_debug() {
            SameSite::Lax
        } else {
            SameSite::Strict
        };
        let Some(value) = self.session_same_site.as_deref() else {
            return Ok(default_same_site);
        };

        match value.to_ascii_lowercase().as_str() {
            "lax" => Ok(SameSite::Lax),
            "strict" => Ok(SameSite::Strict),
            "none" => {
                if !cookie_secure {
                    if !mode.is_debug() {
                        return Err(SettingsError::InsecureSameSiteNone);
                    }
                    warn!("SameSite=None without a secure cookie; browsers may reject it");
                }
                Ok(SameSite::None)
            }
            _ if mode.is_debug() => {
                warn!(value, "invalid session SameSite policy, using default");
                Ok(default_same_site)
            }
            _ => Err(SettingsError::InvalidValue {
                name: "CONTACTS_SESSION_SAME_SITE",
                value: value.to_owned(),
                expected: SAMESITE_EXPECTED,
            }),
        }
    }
}

fn load_session_key(path: &Path, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SettingsError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if !mode.is_debug() && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SettingsError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            if length < DERIVE_MIN_LEN {
                bytes.zeroize();
                warn!(path = %path.display(), length, "session key too short to derive; using temporary key (dev only)");
                return Ok(Key::generate());
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SettingsError::KeyRead {
            path: path.to_path_buf(),
            source: error,
        }),
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) public_base_url: Url,
    pub(crate) cloudinary: Option<CloudinaryCredentials>,
    pub(crate) db_pool: DbPool,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, public_base_url: Url, db_pool: DbPool) -> Self {
        Self {
            key: session.key,
            cookie_secure: session.cookie_secure,
            same_site: session.same_site,
            bind_addr,
            public_base_url,
            cloudinary: None,
            db_pool,
        }
    }

    /// Enable avatar uploads through Cloudinary.
    #[must_use]
    pub fn with_cloudinary(mut self, credentials: Option<CloudinaryCredentials>) -> Self {
        self.cloudinary = credentials;
        self
    }
}
