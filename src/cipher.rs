//! Primitive authenticated cipher.
//!
//! The rotation layer only needs four things from a cipher: the key it is
//! bound to, encrypt, decrypt, and a way to get an equivalent cipher bound to
//! another key. [`AesGcmCipher`] is the implementation shipped with the crate.

use crate::error::Result;
use crate::key::Key;
use crate::{aead, wire};

/// Authenticated encryption bound to a single key.
pub trait Cipher: Send + Sync + Sized {
    /// Key this instance encrypts with.
    fn key(&self) -> &Key;

    /// Encrypt `plaintext` into a text payload.
    fn encrypt(&self, plaintext: &[u8]) -> Result<String>;

    /// Decrypt a payload produced by [`encrypt`](Self::encrypt). Fails with
    /// [`Error::DecryptionFailed`](crate::Error::DecryptionFailed) when the
    /// payload is malformed or does not authenticate.
    fn decrypt(&self, payload: &str) -> Result<Vec<u8>>;

    /// A new, independently owned instance bound to `key`. `self` is left
    /// untouched.
    fn with_key(&self, key: Key) -> Result<Self>;
}

/// AES-GCM with a random 96-bit nonce per message. Key size follows the
/// key's [`CipherKind`](crate::CipherKind).
#[derive(Clone, Debug)]
pub struct AesGcmCipher {
    key: Key,
}

impl AesGcmCipher {
    pub fn new(key: Key) -> Self {
        Self { key }
    }
}

impl Cipher for AesGcmCipher {
    fn key(&self) -> &Key {
        &self.key
    }

    fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        let nonce = aead::nonce()?;
        let aead_ct = aead::aead_seal(&self.key, &nonce, plaintext)?;
        wire::encode_payload(&nonce, &aead_ct)
    }

    fn decrypt(&self, payload: &str) -> Result<Vec<u8>> {
        let parts = wire::decode_payload(payload)?;
        aead::aead_open(&self.key, &parts.nonce, &parts.aead_ciphertext)
    }

    fn with_key(&self, key: Key) -> Result<Self> {
        Ok(Self::new(key))
    }
}
