//! AEAD: AES-GCM (128 or 256 bit, chosen by the key)

extern crate alloc;
use alloc::vec::Vec;

use aes_gcm::{
    aead::{Aead, KeyInit, Nonce},
    Aes128Gcm, Aes256Gcm,
};
use getrandom::getrandom;

use crate::error::Error;
use crate::key::{CipherKind, Key};
use crate::wire::NONCE_BYTES;

/// Generate a random 12-byte nonce. Used during encryption only.
pub fn nonce() -> Result<[u8; NONCE_BYTES], Error> {
    let mut n = [0u8; NONCE_BYTES];
    getrandom(&mut n).map_err(|_| Error::EncryptionFailed)?;
    Ok(n)
}

/// AEAD seal (encrypt path). Returns EncryptionFailed on failure.
pub fn aead_seal(key: &Key, nonce: &[u8; NONCE_BYTES], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
    match key.cipher() {
        CipherKind::Aes128Gcm => seal::<Aes128Gcm>(key.as_bytes(), nonce, plaintext),
        CipherKind::Aes256Gcm => seal::<Aes256Gcm>(key.as_bytes(), nonce, plaintext),
    }
}

/// AEAD open (decrypt path). Returns DecryptionFailed on failure.
pub fn aead_open(key: &Key, nonce: &[u8; NONCE_BYTES], ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
    match key.cipher() {
        CipherKind::Aes128Gcm => open::<Aes128Gcm>(key.as_bytes(), nonce, ciphertext),
        CipherKind::Aes256Gcm => open::<Aes256Gcm>(key.as_bytes(), nonce, ciphertext),
    }
}

fn seal<C: Aead + KeyInit>(key: &[u8], nonce: &[u8; NONCE_BYTES], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
    let cipher = C::new_from_slice(key).map_err(|_| Error::EncryptionFailed)?;
    cipher
        .encrypt(Nonce::<C>::from_slice(nonce), plaintext)
        .map_err(|_| Error::EncryptionFailed)
}

fn open<C: Aead + KeyInit>(key: &[u8], nonce: &[u8; NONCE_BYTES], ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
    let cipher = C::new_from_slice(key).map_err(|_| Error::DecryptionFailed)?;
    cipher
        .decrypt(Nonce::<C>::from_slice(nonce), ciphertext)
        .map_err(|_| Error::DecryptionFailed)
}
