//! Rotation-aware encrypter.
//!
//! Encryption always uses the active key and prefixes its tag. Decryption
//! reads the tag back, picks the matching key from the [`KeyRing`], and hands
//! the rest of the value to the primitive [`Cipher`]:
//!
//! ```text
//! untagged value  ──► legacy key
//! "_V001_:..."    ──► active key if its tag is _V001_:, else first retired
//!                     key tagged _V001_:, else KeyResolutionFailed
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cipher::{AesGcmCipher, Cipher};
use crate::config::KeyRingConfig;
use crate::error::{Error, Result};
use crate::key::Key;
use crate::keyring::KeyRing;
use crate::tag::is_tagged_envelope;

/// Basic encrypt/decrypt capability.
///
/// The typed helpers serialize through JSON; the `_string` and `_bytes`
/// variants pass the plaintext through untouched.
pub trait Encrypter {
    fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<String>;

    fn decrypt_bytes(&self, ciphertext: &str) -> Result<Vec<u8>>;

    fn encrypt_string(&self, value: &str) -> Result<String> {
        self.encrypt_bytes(value.as_bytes())
    }

    fn decrypt_string(&self, ciphertext: &str) -> Result<String> {
        Ok(String::from_utf8(self.decrypt_bytes(ciphertext)?)?)
    }

    fn encrypt<T: Serialize + ?Sized>(&self, value: &T) -> Result<String>
    where
        Self: Sized,
    {
        let bytes = serde_json::to_vec(value)?;
        self.encrypt_bytes(&bytes)
    }

    fn decrypt<T: DeserializeOwned>(&self, ciphertext: &str) -> Result<T>
    where
        Self: Sized,
    {
        let bytes = self.decrypt_bytes(ciphertext)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// An [`Encrypter`] that can tell whether a value was produced by one of its
/// keys.
pub trait RotateEncrypter: Encrypter {
    /// Structural check only: the value carries a tag known to this ring.
    /// Untagged legacy values report `false`.
    fn is_encrypted(&self, value: &str) -> bool;
}

/// What [`RotationalEncrypter::inspect`] learned about a value without
/// decrypting it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inspection {
    /// No tag; would be decrypted with the legacy key.
    Legacy { key_fingerprint: String },
    /// Tag matched a key in the ring.
    Tagged {
        tag: String,
        key_fingerprint: String,
        active: bool,
    },
    /// Looks tagged, but no key in the ring carries this tag.
    UnknownTag { tag: String },
}

/// Encrypts with the active key, decrypts with whichever key produced the
/// value.
///
/// Built once at startup and shared; every method takes `&self` and nothing
/// is mutated after construction.
#[derive(Debug)]
pub struct RotationalEncrypter<C: Cipher = AesGcmCipher> {
    cipher: C,
    ring: KeyRing,
}

impl<C: Cipher> RotationalEncrypter<C> {
    /// Wrap an active cipher. Its key becomes the ring's active key.
    pub fn new(cipher: C, retired: Vec<Key>) -> Result<Self> {
        let ring = KeyRing::new(cipher.key().clone(), retired)?;
        Ok(Self { cipher, ring })
    }

    pub fn ring(&self) -> &KeyRing {
        &self.ring
    }

    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    /// Whether the active key carries a tag, i.e. whether values written now
    /// can be told apart after the next rotation.
    pub fn is_active_key_rotational(&self) -> bool {
        self.ring.is_rotation_enabled()
    }

    pub fn inspect(&self, value: &str) -> Inspection {
        if !is_tagged_envelope(value) {
            return Inspection::Legacy {
                key_fingerprint: self.ring.legacy_key().fingerprint(),
            };
        }
        match self.ring.resolve(value) {
            Ok((key, tag)) => Inspection::Tagged {
                tag: tag.to_string(),
                key_fingerprint: key.fingerprint(),
                active: key == self.ring.active_key(),
            },
            Err(_) => Inspection::UnknownTag {
                tag: value
                    .split_once(':')
                    .map(|(head, _)| format!("{head}:"))
                    .unwrap_or_default(),
            },
        }
    }

    fn decrypt_with(&self, key: &Key, payload: &str) -> Result<Vec<u8>> {
        if key == self.ring.active_key() {
            return self.cipher.decrypt(payload);
        }
        debug!(key = %key.fingerprint(), "decrypting with retired key");
        self.cipher.with_key(key.clone())?.decrypt(payload)
    }
}

impl RotationalEncrypter<AesGcmCipher> {
    /// AES-GCM encrypter over an already validated ring.
    pub fn from_ring(ring: KeyRing) -> Self {
        let cipher = AesGcmCipher::new(ring.active_key().clone());
        Self { cipher, ring }
    }

    pub fn from_config(config: &KeyRingConfig) -> Result<Self> {
        Ok(Self::from_ring(config.build()?))
    }
}

impl<C: Cipher> Encrypter for RotationalEncrypter<C> {
    fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<String> {
        let payload = self.cipher.encrypt(plaintext)?;
        let tag = self.ring.active_tag();
        let mut out = String::with_capacity(tag.as_str().len() + payload.len());
        out.push_str(tag.as_str());
        out.push_str(&payload);
        Ok(out)
    }

    fn decrypt_bytes(&self, ciphertext: &str) -> Result<Vec<u8>> {
        if !is_tagged_envelope(ciphertext) {
            return self.decrypt_with(self.ring.legacy_key(), ciphertext);
        }

        let (key, tag) = self.ring.resolve(ciphertext).map_err(|err| {
            debug!("no key in the ring matches the ciphertext tag");
            err
        })?;
        debug!(%tag, key = %key.fingerprint(), "resolved decryption key");

        let payload = tag.strip(ciphertext).ok_or(Error::KeyResolutionFailed)?;
        self.decrypt_with(key, payload)
    }
}

impl<C: Cipher> RotateEncrypter for RotationalEncrypter<C> {
    fn is_encrypted(&self, value: &str) -> bool {
        self.ring.matches_any(value)
    }
}
