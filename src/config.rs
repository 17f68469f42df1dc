//! Key ring configuration.
//!
//! Mirrors the usual application settings: an active `key`, an optional
//! `key_old` (single key or comma-separated list) and a `cipher` name. Key
//! strings may be plain or `base64:`-prefixed.

use core::fmt;

use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;
use crate::key::CipherKind;
use crate::keyring::KeyRing;

pub const ENV_KEY: &str = "ROTACRYPT_KEY";
pub const ENV_KEY_OLD: &str = "ROTACRYPT_KEY_OLD";
pub const ENV_CIPHER: &str = "ROTACRYPT_CIPHER";

#[derive(Clone, Deserialize)]
pub struct KeyRingConfig {
    pub key: String,
    #[serde(default)]
    pub key_old: Option<String>,
    #[serde(default)]
    pub cipher: CipherKind,
}

impl KeyRingConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            key_old: None,
            cipher: CipherKind::default(),
        }
    }

    pub fn with_old_key(mut self, key_old: impl Into<String>) -> Self {
        self.key_old = Some(key_old.into());
        self
    }

    pub fn with_cipher(mut self, cipher: CipherKind) -> Self {
        self.cipher = cipher;
        self
    }

    /// Read `ROTACRYPT_KEY`, `ROTACRYPT_KEY_OLD` and `ROTACRYPT_CIPHER`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(ENV_KEY)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingVar(ENV_KEY))?;
        let cipher = match lookup(ENV_CIPHER).filter(|c| !c.is_empty()) {
            Some(name) => name.parse()?,
            None => CipherKind::default(),
        };
        Ok(Self {
            key,
            key_old: lookup(ENV_KEY_OLD).filter(|old| !old.is_empty()),
            cipher,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Parse and validate every configured key.
    pub fn build(&self) -> Result<KeyRing, ConfigError> {
        let ring = KeyRing::parse(&self.key, self.key_old.as_deref(), self.cipher)?;
        info!(
            cipher = %self.cipher,
            active = %ring.active_key().fingerprint(),
            retired = ring.retired_keys().len(),
            rotation = ring.is_rotation_enabled(),
            "key ring loaded"
        );
        Ok(ring)
    }
}

impl fmt::Debug for KeyRingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRingConfig")
            .field("key", &"<redacted>")
            .field("key_old", &self.key_old.as_ref().map(|_| "<redacted>"))
            .field("cipher", &self.cipher)
            .finish()
    }
}
