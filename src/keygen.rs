//! Rotating key generation.
//!
//! A generated key is `_<PREFIX>_:|@|` followed by random alphanumerics, padded
//! to the cipher's key length, and handed out both raw and as a `base64:` key
//! string.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand_core::{OsRng, RngCore};
use zeroize::Zeroizing;

use crate::error::ConfigError;
use crate::key::{CipherKind, Key, BASE64_PREFIX};
use crate::tag::{KeyTag, DELIMITER};

const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Largest multiple of the alphabet size that fits in a byte; bytes at or
/// above it are rejected so every character is equally likely.
const REJECT_AT: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// Output of [`generate`].
pub struct GeneratedKey {
    /// `base64:...`, suitable for configuration.
    pub encoded: Zeroizing<String>,
    /// The raw key text.
    pub decoded: Zeroizing<String>,
    pub tag: KeyTag,
    pub cipher: CipherKind,
}

impl GeneratedKey {
    pub fn key(&self) -> Result<Key, ConfigError> {
        Key::parse(&self.encoded, self.cipher)
    }
}

/// Generate a tagged key for `cipher`. `prefix` must be exactly 4 characters.
pub fn generate(prefix: &str, cipher: CipherKind) -> Result<GeneratedKey, ConfigError> {
    let tag = KeyTag::for_prefix(prefix)?;
    let head_len = tag.as_str().len() + DELIMITER.len();
    if head_len >= cipher.key_len() {
        return Err(ConfigError::InvalidKeyLength {
            cipher: cipher.name(),
            expected: cipher.key_len(),
            got: head_len,
        });
    }

    let mut raw = Zeroizing::new(String::with_capacity(cipher.key_len()));
    raw.push_str(tag.as_str());
    raw.push_str(DELIMITER);
    raw.extend(random_alphanumeric(cipher.key_len() - head_len).iter().map(|&b| char::from(b)));

    let encoded = Zeroizing::new(format!("{BASE64_PREFIX}{}", STANDARD.encode(raw.as_bytes())));
    Ok(GeneratedKey {
        encoded,
        decoded: raw,
        tag,
        cipher,
    })
}

fn random_alphanumeric(len: usize) -> Zeroizing<Vec<u8>> {
    let mut out = Zeroizing::new(Vec::with_capacity(len));
    let mut buf = [0u8; 64];
    while out.len() < len {
        OsRng.fill_bytes(&mut buf);
        for &b in buf.iter().filter(|&&b| b < REJECT_AT) {
            if out.len() == len {
                break;
            }
            out.push(ALPHABET[usize::from(b) % ALPHABET.len()]);
        }
    }
    out
}
