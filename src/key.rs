//! Symmetric keys and cipher identities.

use core::fmt;
use core::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::ConfigError;
use crate::tag::KeyTag;

/// Marks a key string whose remainder is base64-encoded key material.
pub const BASE64_PREFIX: &str = "base64:";

/// Bytes of SHA-256 kept in a key fingerprint.
const FINGERPRINT_BYTES: usize = 8;

/// Cipher a key is meant for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CipherKind {
    #[serde(rename = "AES-128-GCM")]
    Aes128Gcm,
    #[default]
    #[serde(rename = "AES-256-GCM")]
    Aes256Gcm,
}

impl CipherKind {
    /// Required key length in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            Self::Aes128Gcm => 16,
            Self::Aes256Gcm => 32,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Aes128Gcm => "AES-128-GCM",
            Self::Aes256Gcm => "AES-256-GCM",
        }
    }
}

impl fmt::Display for CipherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AES-128-GCM" => Ok(Self::Aes128Gcm),
            "AES-256-GCM" => Ok(Self::Aes256Gcm),
            _ => Err(ConfigError::UnknownCipher(s.to_string())),
        }
    }
}

/// Raw key material bound to a cipher. Zeroized on drop.
///
/// Equality is constant-time over the key bytes.
#[derive(Clone)]
pub struct Key {
    bytes: Zeroizing<Vec<u8>>,
    cipher: CipherKind,
}

impl Key {
    /// Wrap raw bytes, checking the length against `cipher`.
    pub fn new(bytes: impl Into<Vec<u8>>, cipher: CipherKind) -> Result<Self, ConfigError> {
        let bytes = Zeroizing::new(bytes.into());
        if bytes.is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        if bytes.len() != cipher.key_len() {
            return Err(ConfigError::InvalidKeyLength {
                cipher: cipher.name(),
                expected: cipher.key_len(),
                got: bytes.len(),
            });
        }
        Ok(Self { bytes, cipher })
    }

    /// Parse a configured key string: plain text, or `base64:` followed by
    /// the encoded key.
    pub fn parse(s: &str, cipher: CipherKind) -> Result<Self, ConfigError> {
        match s.strip_prefix(BASE64_PREFIX) {
            Some(encoded) => {
                let decoded = Zeroizing::new(
                    STANDARD
                        .decode(encoded.trim())
                        .map_err(|_| ConfigError::InvalidBase64)?,
                );
                Self::new(decoded.as_slice(), cipher)
            }
            None => Self::new(s.as_bytes(), cipher),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn cipher(&self) -> CipherKind {
        self.cipher
    }

    /// Tag embedded in this key (empty for legacy keys).
    pub fn tag(&self) -> KeyTag {
        KeyTag::extract(&self.bytes)
    }

    /// Short hex digest identifying the key in logs.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.bytes.as_slice());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cipher == other.cipher && bool::from(self.bytes.as_slice().ct_eq(other.bytes.as_slice()))
    }
}

impl Eq for Key {}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("cipher", &self.cipher)
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = "wkHRWb5CGwDEl98VPx9I7L1234567890";
    const ROTATE_1: &str = "_V001_:|@|0dyABqn3OGcacvYGqypaKM";

    #[test]
    fn plain_key_parses() {
        let key = Key::parse(LEGACY, CipherKind::Aes256Gcm).unwrap();
        assert_eq!(key.as_bytes(), LEGACY.as_bytes());
        assert!(key.tag().is_empty());
    }

    #[test]
    fn base64_key_parses() {
        let encoded = format!("{BASE64_PREFIX}{}", STANDARD.encode(ROTATE_1));
        let key = Key::parse(&encoded, CipherKind::Aes256Gcm).unwrap();
        assert_eq!(key.as_bytes(), ROTATE_1.as_bytes());
        assert_eq!(key.tag().as_str(), "_V001_:");
    }

    #[test]
    fn bad_base64_rejected() {
        assert_eq!(
            Key::parse("base64:!!!not base64!!!", CipherKind::Aes256Gcm).unwrap_err(),
            ConfigError::InvalidBase64
        );
    }

    #[test]
    fn length_checked_against_cipher() {
        assert_eq!(
            Key::parse(LEGACY, CipherKind::Aes128Gcm).unwrap_err(),
            ConfigError::InvalidKeyLength {
                cipher: "AES-128-GCM",
                expected: 16,
                got: 32
            }
        );
        assert!(Key::parse("0123456789abcdef", CipherKind::Aes128Gcm).is_ok());
        assert_eq!(
            Key::parse("", CipherKind::Aes256Gcm).unwrap_err(),
            ConfigError::EmptyKey
        );
    }

    #[test]
    fn equality_covers_bytes_and_cipher() {
        let a = Key::parse(LEGACY, CipherKind::Aes256Gcm).unwrap();
        let b = Key::parse(LEGACY, CipherKind::Aes256Gcm).unwrap();
        let c = Key::parse(ROTATE_1, CipherKind::Aes256Gcm).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn debug_does_not_leak_material() {
        let key = Key::parse(LEGACY, CipherKind::Aes256Gcm).unwrap();
        let printed = format!("{key:?}");
        assert!(!printed.contains(LEGACY));
        assert!(printed.contains(&key.fingerprint()));
        assert_eq!(key.fingerprint().len(), FINGERPRINT_BYTES * 2);
    }

    #[test]
    fn cipher_kind_from_str() {
        assert_eq!("aes-128-gcm".parse::<CipherKind>().unwrap(), CipherKind::Aes128Gcm);
        assert_eq!("AES-256-GCM".parse::<CipherKind>().unwrap(), CipherKind::Aes256Gcm);
        assert_eq!(
            "AES-256-CBC".parse::<CipherKind>().unwrap_err(),
            ConfigError::UnknownCipher("AES-256-CBC".to_string())
        );
    }
}
